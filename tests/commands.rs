//! Integration tests for chat command dispatch against a real store.

use group_stats_bot::{
    dispatch, Award, Caller, Command, CommandReply, Hints, Outcome, StatsStore,
};
use tempfile::TempDir;

fn setup() -> (TempDir, StatsStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = StatsStore::open(temp_dir.path().join("group_stats.json"));
    (temp_dir, store)
}

fn run(store: &StatsStore, caller: &Caller, text: &str) -> CommandReply {
    dispatch(store, caller, Command::parse(text).unwrap(), 5)
}

#[test]
fn win_command_records_for_caller_with_hints() {
    let (_dir, store) = setup();
    let caller = Caller::new("11").with_username("alice").with_first_name("Alice");

    match run(&store, &caller, "/win") {
        CommandReply::OutcomeRecorded {
            outcome,
            display_name,
            record,
        } => {
            assert_eq!(outcome, Outcome::Win);
            assert_eq!(display_name, "@alice");
            assert_eq!(record.wins, 1);
            assert!(record.last_game.is_some());
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn mvp_without_target_goes_to_caller() {
    let (_dir, store) = setup();
    let caller = Caller::new("11").with_first_name("Alice");

    let reply = run(&store, &caller, "/mvp");
    assert_eq!(
        reply,
        CommandReply::AwardGiven {
            award: Award::Mvp,
            target: "11".to_string(),
            display_name: "Alice".to_string(),
            self_award: true,
        }
    );
    assert_eq!(store.player("11").unwrap().mvp_count, 1);
}

#[test]
fn lvm_with_target_awards_known_player() {
    let (_dir, store) = setup();
    store.get_or_create_player("22", Hints::username("Bob"));
    let caller = Caller::new("11").with_username("alice");

    match run(&store, &caller, "/lvm @bob") {
        CommandReply::AwardGiven {
            target,
            self_award,
            display_name,
            ..
        } => {
            assert_eq!(target, "22");
            assert!(!self_award);
            assert_eq!(display_name, "@Bob");
        }
        other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(store.player("22").unwrap().lvm_count, 1);
    assert!(store.player("11").is_none());
}

#[test]
fn award_to_unknown_handle_creates_synthetic_player() {
    let (_dir, store) = setup();
    let caller = Caller::new("11");

    match run(&store, &caller, "/mvp @newcomer") {
        CommandReply::AwardGiven { target, .. } => assert_eq!(target, "user_1"),
        other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(store.find_by_handle("@NEWCOMER").as_deref(), Some("user_1"));
}

#[test]
fn role_command_lowercases_label() {
    let (_dir, store) = setup();
    let caller = Caller::new("11");
    run(&store, &caller, "/role Support");
    let reply = run(&store, &caller, "/role SUPPORT");
    assert_eq!(
        reply,
        CommandReply::RoleWinRecorded {
            role: "support".to_string(),
            wins: 2,
        }
    );
}

#[test]
fn stats_command_truncates_boards() {
    let (_dir, store) = setup();
    for i in 0..7 {
        let id = format!("{}", i);
        store.record_outcome(&id, Outcome::Win, Hints::default());
        store.record_award(&id, Award::Lvm, Hints::default());
    }
    let caller = Caller::new("0");

    match dispatch(&store, &caller, Command::Stats, 3) {
        CommandReply::Stats(overview) => {
            assert_eq!(overview.summary.total_games, 7);
            assert_eq!(overview.summary.total_lvm, 7);
            assert_eq!(overview.top.len(), 3);
            assert_eq!(overview.lvm.len(), 3);
            assert_eq!(overview.top[0].rank, 1);
            assert_eq!(overview.top[0].display_name, "Player 0");
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn me_command_registers_caller() {
    let (_dir, store) = setup();
    let caller = Caller::new("77").with_username("zed");

    match run(&store, &caller, "/me") {
        CommandReply::Profile {
            display_name,
            record,
        } => {
            assert_eq!(display_name, "@zed");
            assert_eq!(record.games(), 0);
        }
        other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(store.group_summary().total_players, 1);
}

#[test]
fn weekly_command_counts_recent_games() {
    let (_dir, store) = setup();
    let caller = Caller::new("1");
    run(&store, &caller, "/win");
    run(&store, &caller, "/lose");

    match run(&store, &caller, "/weekly") {
        CommandReply::Weekly(weekly) => {
            assert_eq!(weekly.weekly_wins, 1);
            assert_eq!(weekly.weekly_losses, 1);
            assert_eq!(weekly.weekly_winrate, 50.0);
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn reply_serializes_with_kind_tag() {
    let (_dir, store) = setup();
    let reply = run(&store, &Caller::new("1"), "/role mid");
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["kind"], "role_win_recorded");
    assert_eq!(json["role"], "mid");
    assert_eq!(json["wins"], 1);
}
