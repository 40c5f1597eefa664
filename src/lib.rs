//! Group stats bot: library with the stats store, queries and chat command handling.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    dispatch, display_name, find_by_handle, group_summary, leaderboard, rank_entries,
    weekly_summary, Caller, Command, CommandReply, ParseError,
};
pub use models::{
    Award, GroupSummary, GroupTotals, Hints, LeaderboardEntry, LeaderboardKind, Outcome, PlayerId,
    PlayerRecord, RankedPlayer, RoleStats, Snapshot, StatsOverview, WeeklySummary,
};
pub use store::{SnapshotError, SnapshotFile, StatsStore, DEFAULT_STATS_FILE};
