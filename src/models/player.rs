//! PlayerRecord, Outcome, Award and the per-role counters.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a player as handed to us by the chat transport (or a synthetic `user_<n>`).
pub type PlayerId = String;

/// Length of the best-effort weekly window.
pub const WEEK_LENGTH_DAYS: i64 = 7;

/// Result of one game for one player.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

/// Per-game awards handed out by the group.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Award {
    /// Most valuable player.
    Mvp,
    /// Least valuable player.
    Lvm,
}

/// Counters kept under a role label. Only wins are ever recorded.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleStats {
    pub wins: u32,
    pub losses: u32,
}

/// Optional display fields observed alongside an identity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Hints<'a> {
    pub username: Option<&'a str>,
    pub first_name: Option<&'a str>,
}

impl<'a> Hints<'a> {
    pub fn new(username: Option<&'a str>, first_name: Option<&'a str>) -> Self {
        Self { username, first_name }
    }

    pub fn username(username: &'a str) -> Self {
        Self {
            username: Some(username),
            first_name: None,
        }
    }
}

/// Everything we know about one player. Missing fields in a stored document default to zero/empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub wins: u32,
    pub losses: u32,
    pub mvp_count: u32,
    pub lvm_count: u32,
    /// Role label (lower-case) -> counters.
    pub role_stats: BTreeMap<String, RoleStats>,
    /// None until the first recorded win or loss.
    pub last_game: Option<NaiveDateTime>,
    pub join_date: NaiveDateTime,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub weekly_wins: u32,
    pub weekly_losses: u32,
    /// Start of the current weekly window; None until the first recorded game.
    pub week_started: Option<NaiveDateTime>,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new(NaiveDateTime::default())
    }
}

impl PlayerRecord {
    /// Fresh record with zeroed counters, first seen at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            wins: 0,
            losses: 0,
            mvp_count: 0,
            lvm_count: 0,
            role_stats: BTreeMap::new(),
            last_game: None,
            join_date: now,
            username: None,
            first_name: None,
            weekly_wins: 0,
            weekly_losses: 0,
            week_started: None,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win rate in percent; 0.0 when no games were recorded.
    pub fn win_rate(&self) -> f64 {
        percent(self.wins, self.games())
    }

    pub fn award_count(&self, award: Award) -> u32 {
        match award {
            Award::Mvp => self.mvp_count,
            Award::Lvm => self.lvm_count,
        }
    }

    /// Apply non-empty hints that differ from what is stored. Returns true when anything changed.
    pub fn apply_hints(&mut self, hints: Hints<'_>) -> bool {
        let mut changed = false;
        if let Some(username) = non_empty(hints.username) {
            if self.username.as_deref() != Some(username) {
                self.username = Some(username.to_string());
                changed = true;
            }
        }
        if let Some(first_name) = non_empty(hints.first_name) {
            if self.first_name.as_deref() != Some(first_name) {
                self.first_name = Some(first_name.to_string());
                changed = true;
            }
        }
        changed
    }

    /// Record a win or loss at `now`, rolling the weekly window if it has expired.
    pub fn record_outcome(&mut self, outcome: Outcome, now: NaiveDateTime) {
        let window_expired = match self.week_started {
            Some(start) => now - start >= Duration::days(WEEK_LENGTH_DAYS),
            None => true,
        };
        if window_expired {
            self.weekly_wins = 0;
            self.weekly_losses = 0;
            self.week_started = Some(now);
        }
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.weekly_wins += 1;
            }
            Outcome::Loss => {
                self.losses += 1;
                self.weekly_losses += 1;
            }
        }
        self.last_game = Some(now);
    }

    pub fn record_award(&mut self, award: Award) {
        match award {
            Award::Mvp => self.mvp_count += 1,
            Award::Lvm => self.lvm_count += 1,
        }
    }

    /// Record a win under `role` (see [`normalize_role`]). Returns the role's new win count.
    pub fn record_role_win(&mut self, role: &str) -> u32 {
        let stats = self.role_stats.entry(normalize_role(role)).or_default();
        stats.wins += 1;
        stats.wins
    }

    /// Handle normalised for lookups: lower-case, without leading '@'.
    pub fn normalized_handle(&self) -> Option<String> {
        self.username.as_deref().map(normalize_handle)
    }
}

/// Lower-case a handle and strip surrounding whitespace and leading '@'.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}

/// Role labels are keyed trimmed and lower-case.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

pub(crate) fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(total) * 100.0
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
