//! Leaderboards: rank players by win rate or by award count.

use crate::logic::identity::display_name;
use crate::models::{LeaderboardEntry, LeaderboardKind, PlayerId, PlayerRecord, RankedPlayer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Build the full ranking for `kind`. Truncation to a top-N is left to the caller.
///
/// - `WinRate`: players with at least one game, by win rate then games played.
/// - `Mvp` / `Lvm`: players with a non-zero count, by count then games played.
///
/// Remaining ties fall back to player id so the order is the same on every run.
pub fn leaderboard(
    players: &BTreeMap<PlayerId, PlayerRecord>,
    kind: LeaderboardKind,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = players
        .iter()
        .filter(|(_, p)| match kind.award() {
            None => p.games() > 0,
            Some(award) => p.award_count(award) > 0,
        })
        .map(|(id, p)| LeaderboardEntry::from_player(id, p))
        .collect();

    entries.sort_by(|a, b| {
        let primary = match kind {
            LeaderboardKind::WinRate => b.win_rate.total_cmp(&a.win_rate),
            LeaderboardKind::Mvp => b.mvp_count.cmp(&a.mvp_count),
            LeaderboardKind::Lvm => b.lvm_count.cmp(&a.lvm_count),
        };
        primary
            .then_with(|| b.total_games.cmp(&a.total_games))
            .then_with(|| tie_break(a, b))
    });
    entries
}

/// Number the first `top_n` entries and resolve their display names from `players`.
pub fn rank_entries(
    players: &BTreeMap<PlayerId, PlayerRecord>,
    entries: Vec<LeaderboardEntry>,
    top_n: usize,
) -> Vec<RankedPlayer> {
    entries
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, entry)| RankedPlayer {
            rank: i + 1,
            display_name: display_name(players, &entry.player_id),
            entry,
        })
        .collect()
}

fn tie_break(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    a.player_id.cmp(&b.player_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(wins: u32, losses: u32, mvp: u32, lvm: u32) -> PlayerRecord {
        PlayerRecord {
            wins,
            losses,
            mvp_count: mvp,
            lvm_count: lvm,
            ..PlayerRecord::default()
        }
    }

    fn ids(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.player_id.as_str()).collect()
    }

    #[test]
    fn win_rate_board_skips_players_without_games() {
        let mut players = BTreeMap::new();
        players.insert("idle".to_string(), player(0, 0, 3, 0));
        players.insert("a".to_string(), player(1, 1, 0, 0));
        let board = leaderboard(&players, LeaderboardKind::WinRate);
        assert_eq!(ids(&board), vec!["a"]);
        assert_eq!(board[0].win_rate, 50.0);
    }

    #[test]
    fn equal_win_rate_ranks_more_games_first() {
        let mut players = BTreeMap::new();
        players.insert("few".to_string(), player(1, 1, 0, 0));
        players.insert("many".to_string(), player(5, 5, 0, 0));
        players.insert("best".to_string(), player(3, 0, 0, 0));
        let board = leaderboard(&players, LeaderboardKind::WinRate);
        assert_eq!(ids(&board), vec!["best", "many", "few"]);
    }

    #[test]
    fn ranking_truncates_and_resolves_names() {
        let mut players = BTreeMap::new();
        let mut named = player(2, 0, 0, 0);
        named.username = Some("ace".to_string());
        players.insert("a".to_string(), named);
        players.insert("b".to_string(), player(1, 0, 0, 0));
        players.insert("c".to_string(), player(0, 1, 0, 0));

        let ranked = rank_entries(&players, leaderboard(&players, LeaderboardKind::WinRate), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].rank, ranked[0].display_name.as_str()), (1, "@ace"));
        assert_eq!((ranked[1].rank, ranked[1].display_name.as_str()), (2, "Player b"));
    }

    #[test]
    fn award_board_counts_only_that_award() {
        let mut players = BTreeMap::new();
        players.insert("a".to_string(), player(0, 0, 1, 4));
        players.insert("b".to_string(), player(2, 0, 1, 0));
        players.insert("c".to_string(), player(0, 0, 0, 1));
        assert_eq!(ids(&leaderboard(&players, LeaderboardKind::Mvp)), vec!["b", "a"]);
        assert_eq!(ids(&leaderboard(&players, LeaderboardKind::Lvm)), vec!["a", "c"]);
    }
}
