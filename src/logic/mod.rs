//! Stats queries and chat command handling.

pub mod commands;
mod identity;
mod leaderboard;
mod summary;

pub use commands::{dispatch, Caller, Command, CommandReply, ParseError};
pub use identity::{display_name, find_by_handle};
pub use leaderboard::{leaderboard, rank_entries};
pub use summary::{group_summary, weekly_summary};
