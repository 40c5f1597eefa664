//! Data structures for the stats bot: player records, group aggregates, the persisted snapshot.

mod group;
mod player;
mod snapshot;

pub use group::{
    GroupSummary, GroupTotals, LeaderboardEntry, LeaderboardKind, RankedPlayer, StatsOverview,
    WeeklySummary,
};
pub use player::{
    normalize_handle, normalize_role, Award, Hints, Outcome, PlayerId, PlayerRecord, RoleStats,
    WEEK_LENGTH_DAYS,
};
pub use snapshot::{Snapshot, SYNTHETIC_ID_PREFIX};
