//! Group and weekly summaries.

use crate::models::{
    GroupSummary, GroupTotals, PlayerId, PlayerRecord, WeeklySummary, WEEK_LENGTH_DAYS,
};
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;

pub fn group_summary(players: &BTreeMap<PlayerId, PlayerRecord>) -> GroupSummary {
    let totals = GroupTotals::from_players(players);
    let group_winrate = if totals.total_games > 0 {
        f64::from(totals.group_wins) / f64::from(totals.total_games) * 100.0
    } else {
        0.0
    };
    GroupSummary {
        total_games: totals.total_games,
        total_wins: totals.group_wins,
        total_losses: totals.group_losses,
        group_winrate,
        active_players: players.values().filter(|p| p.games() > 0).count(),
        total_players: players.len(),
        total_mvp: totals.total_mvp,
        total_lvm: totals.total_lvm,
    }
}

/// Sum the weekly tallies of players who played within the week before `now`.
///
/// A tally can still hold games from just over a week ago: windows only roll over on the
/// next recorded game.
pub fn weekly_summary(
    players: &BTreeMap<PlayerId, PlayerRecord>,
    now: NaiveDateTime,
) -> WeeklySummary {
    let week_ago = now - Duration::days(WEEK_LENGTH_DAYS);
    let (wins, losses) = players
        .values()
        .filter(|p| p.last_game.is_some_and(|last| last > week_ago))
        .fold((0, 0), |(w, l), p| (w + p.weekly_wins, l + p.weekly_losses));
    WeeklySummary::new(wins, losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    #[test]
    fn empty_group_has_zero_winrate() {
        let summary = group_summary(&BTreeMap::new());
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.group_winrate, 0.0);
        assert_eq!(summary.total_players, 0);
    }

    #[test]
    fn weekly_summary_ignores_stale_windows() {
        let mut recent = PlayerRecord::new(at(1));
        recent.record_outcome(Outcome::Win, at(10));
        recent.record_outcome(Outcome::Win, at(11));
        recent.record_outcome(Outcome::Loss, at(12));
        let mut stale = PlayerRecord::new(at(1));
        stale.record_outcome(Outcome::Win, at(1));

        let mut players = BTreeMap::new();
        players.insert("recent".to_string(), recent);
        players.insert("stale".to_string(), stale);

        let weekly = weekly_summary(&players, at(14));
        assert_eq!((weekly.weekly_wins, weekly.weekly_losses), (2, 1));
        assert!((weekly.weekly_winrate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_summary_keeps_recent_player_with_old_window() {
        let mut p = PlayerRecord::new(at(1));
        p.record_outcome(Outcome::Win, at(1));
        p.record_outcome(Outcome::Win, at(7));
        assert_eq!(p.week_started, Some(at(1)));

        let mut players = BTreeMap::new();
        players.insert("p".to_string(), p);

        let weekly = weekly_summary(&players, at(9));
        assert_eq!((weekly.weekly_wins, weekly.weekly_losses), (2, 0));
    }
}
