//! Group-level aggregates and the query results built from player records.

use crate::models::player::{percent, Award, PlayerId, PlayerRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lobby-wide counters as written to the snapshot. Always derived from the player records.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupTotals {
    pub total_games: u32,
    pub group_wins: u32,
    pub group_losses: u32,
    pub total_mvp: u32,
    pub total_lvm: u32,
}

impl GroupTotals {
    /// Sum the counters of every player. `total_games == group_wins + group_losses` by construction.
    pub fn from_players(players: &BTreeMap<PlayerId, PlayerRecord>) -> Self {
        let mut totals = players.values().fold(Self::default(), |mut acc, p| {
            acc.group_wins += p.wins;
            acc.group_losses += p.losses;
            acc.total_mvp += p.mvp_count;
            acc.total_lvm += p.lvm_count;
            acc
        });
        totals.total_games = totals.group_wins + totals.group_losses;
        totals
    }
}

/// Summary shown by the stats command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    /// Percent, 0.0 when no games were recorded.
    pub group_winrate: f64,
    /// Players with at least one recorded game.
    pub active_players: usize,
    pub total_players: usize,
    pub total_mvp: u32,
    pub total_lvm: u32,
}

/// Wins and losses inside the best-effort weekly window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub weekly_wins: u32,
    pub weekly_losses: u32,
    pub weekly_winrate: f64,
}

impl WeeklySummary {
    pub fn new(weekly_wins: u32, weekly_losses: u32) -> Self {
        Self {
            weekly_wins,
            weekly_losses,
            weekly_winrate: percent(weekly_wins, weekly_wins + weekly_losses),
        }
    }
}

/// What a leaderboard ranks by.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardKind {
    /// Win rate, then games played. Players without games are left out.
    #[default]
    WinRate,
    /// MVP count, then games played.
    Mvp,
    /// LVM count, then games played.
    Lvm,
}

impl LeaderboardKind {
    /// The award this board counts, if it is an award board.
    pub fn award(self) -> Option<Award> {
        match self {
            LeaderboardKind::WinRate => None,
            LeaderboardKind::Mvp => Some(Award::Mvp),
            LeaderboardKind::Lvm => Some(Award::Lvm),
        }
    }
}

impl From<Award> for LeaderboardKind {
    fn from(award: Award) -> Self {
        match award {
            Award::Mvp => LeaderboardKind::Mvp,
            Award::Lvm => LeaderboardKind::Lvm,
        }
    }
}

/// One ranked row. Presentation (names, truncation) is up to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
    pub win_rate: f64,
    pub mvp_count: u32,
    pub lvm_count: u32,
}

impl LeaderboardEntry {
    pub fn from_player(id: &str, p: &PlayerRecord) -> Self {
        Self {
            player_id: id.to_string(),
            wins: p.wins,
            losses: p.losses,
            total_games: p.games(),
            win_rate: p.win_rate(),
            mvp_count: p.mvp_count,
            lvm_count: p.lvm_count,
        }
    }
}

/// Leaderboard row with the player's display name resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub rank: usize,
    pub display_name: String,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Group summary plus the top of the win-rate and LVM boards, all read from one state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsOverview {
    pub summary: GroupSummary,
    pub top: Vec<RankedPlayer>,
    pub lvm: Vec<RankedPlayer>,
}
