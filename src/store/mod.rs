//! StatsStore: in-memory player and group counters, persisted as one JSON snapshot.
//!
//! Every mutation takes the write lock, updates the counters and rewrites the whole
//! snapshot before releasing it. Write failures are logged and otherwise ignored; the
//! in-memory state stays the source of truth for the life of the process.

mod persistence;

pub use persistence::{SnapshotError, SnapshotFile};

use crate::logic::{
    display_name, find_by_handle, group_summary, leaderboard, rank_entries, weekly_summary,
};
use crate::models::{
    normalize_role, Award, GroupSummary, Hints, LeaderboardEntry, LeaderboardKind, Outcome,
    PlayerId, PlayerRecord, RankedPlayer, Snapshot, StatsOverview, WeeklySummary,
    SYNTHETIC_ID_PREFIX,
};
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_STATS_FILE: &str = "group_stats.json";

struct StoreState {
    snapshot: Snapshot,
    /// Sequence number for the next synthetic `user_<n>` identity.
    next_synthetic: u64,
}

impl StoreState {
    fn new(snapshot: Snapshot) -> Self {
        let next_synthetic = snapshot.next_synthetic_seq();
        Self {
            snapshot,
            next_synthetic,
        }
    }

    /// Existing record for `id` (hints applied) or a fresh one. The flag is true when anything changed.
    fn entry(&mut self, id: &str, hints: Hints<'_>, now: NaiveDateTime) -> (&mut PlayerRecord, bool) {
        let users = &mut self.snapshot.users;
        let created = !users.contains_key(id);
        let record = users
            .entry(id.to_string())
            .or_insert_with(|| PlayerRecord::new(now));
        let updated = record.apply_hints(hints);
        (record, created || updated)
    }

    fn mint_synthetic_id(&mut self) -> PlayerId {
        loop {
            let id = format!("{}{}", SYNTHETIC_ID_PREFIX, self.next_synthetic);
            self.next_synthetic += 1;
            if !self.snapshot.users.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Player and group statistics backed by a snapshot file.
pub struct StatsStore {
    file: SnapshotFile,
    state: RwLock<StoreState>,
}

impl StatsStore {
    /// Load the snapshot at `path`. A missing or unreadable file yields an empty store.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let file = SnapshotFile::new(path);
        let snapshot = match file.load() {
            Ok(Some(mut snapshot)) => {
                if snapshot.reconcile() {
                    log::warn!(
                        "Group totals in {} did not match player records; using recomputed totals",
                        file.path().display()
                    );
                }
                log::info!(
                    "Loaded stats for {} player(s) from {}",
                    snapshot.users.len(),
                    file.path().display()
                );
                snapshot
            }
            Ok(None) => {
                log::info!("No stats file at {}; starting empty", file.path().display());
                Snapshot::default()
            }
            Err(e) => {
                log::warn!(
                    "Could not load stats from {} ({}); starting empty",
                    file.path().display(),
                    e
                );
                Snapshot::default()
            }
        };
        Self {
            file,
            state: RwLock::new(StoreState::new(snapshot)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewrite the snapshot from `state`. Called with the write lock held.
    fn persist(&self, state: &mut StoreState) {
        state.snapshot.reconcile();
        match self.file.save(&state.snapshot) {
            Ok(()) => log::debug!(
                "Saved stats for {} player(s) to {}",
                state.snapshot.users.len(),
                self.file.path().display()
            ),
            Err(e) => log::error!(
                "Failed to save stats to {}: {}",
                self.file.path().display(),
                e
            ),
        }
    }

    /// Rewrite the snapshot file with the current state.
    pub fn save(&self) {
        let mut state = self.write();
        self.persist(&mut state);
    }

    /// Record for `id`, created with zeroed counters if absent. Newer display hints replace stored ones.
    pub fn get_or_create_player(&self, id: &str, hints: Hints<'_>) -> PlayerRecord {
        let mut state = self.write();
        let (record, changed) = state.entry(id, hints, Local::now().naive_local());
        let record = record.clone();
        if changed {
            self.persist(&mut state);
        }
        record
    }

    /// Record for `id` without creating one.
    pub fn player(&self, id: &str) -> Option<PlayerRecord> {
        self.read().snapshot.users.get(id).cloned()
    }

    /// Count a win or loss for `id`. Returns the updated record.
    pub fn record_outcome(&self, id: &str, outcome: Outcome, hints: Hints<'_>) -> PlayerRecord {
        let now = Local::now().naive_local();
        let mut state = self.write();
        let (record, _) = state.entry(id, hints, now);
        record.record_outcome(outcome, now);
        let record = record.clone();
        self.persist(&mut state);
        record
    }

    /// Count an MVP or LVM award for `id`. Returns the updated record.
    pub fn record_award(&self, id: &str, award: Award, hints: Hints<'_>) -> PlayerRecord {
        let mut state = self.write();
        let (record, _) = state.entry(id, hints, Local::now().naive_local());
        record.record_award(award);
        let record = record.clone();
        self.persist(&mut state);
        record
    }

    /// Award a player known only by handle. Unknown handles get a synthetic `user_<n>` identity.
    /// Returns the awarded identity, or None for an empty handle.
    pub fn record_award_by_handle(&self, handle: &str, award: Award) -> Option<PlayerId> {
        let handle = handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return None;
        }
        let now = Local::now().naive_local();
        let mut state = self.write();
        // a known player keeps their own display fields; only new identities take the typed handle
        let (id, hints) = match find_by_handle(&state.snapshot.users, handle) {
            Some(id) => (id, Hints::default()),
            None => {
                let id = state.mint_synthetic_id();
                log::info!("Registering @{} as {}", handle, id);
                (id, Hints::username(handle))
            }
        };
        let (record, _) = state.entry(&id, hints, now);
        record.record_award(award);
        self.persist(&mut state);
        Some(id)
    }

    /// Count a win under `role` (case-insensitive). Returns the role's win count, or None for an empty label.
    pub fn record_role_win(&self, id: &str, role: &str) -> Option<u32> {
        let role = normalize_role(role);
        if role.is_empty() {
            return None;
        }
        let mut state = self.write();
        let (record, _) = state.entry(id, Hints::default(), Local::now().naive_local());
        let wins = record.record_role_win(&role);
        self.persist(&mut state);
        Some(wins)
    }

    /// Identity whose handle matches, ignoring case and a leading '@'.
    pub fn find_by_handle(&self, handle: &str) -> Option<PlayerId> {
        find_by_handle(&self.read().snapshot.users, handle)
    }

    pub fn display_name(&self, id: &str) -> String {
        display_name(&self.read().snapshot.users, id)
    }

    pub fn leaderboard(&self, kind: LeaderboardKind) -> Vec<LeaderboardEntry> {
        leaderboard(&self.read().snapshot.users, kind)
    }

    /// Top `limit` rows of a board with display names, read under one lock.
    pub fn ranked_leaderboard(&self, kind: LeaderboardKind, limit: usize) -> Vec<RankedPlayer> {
        let state = self.read();
        let players = &state.snapshot.users;
        rank_entries(players, leaderboard(players, kind), limit)
    }

    /// Summary plus the top `top_n` of the win-rate and LVM boards, read under one lock.
    pub fn stats_overview(&self, top_n: usize) -> StatsOverview {
        let state = self.read();
        let players = &state.snapshot.users;
        StatsOverview {
            summary: group_summary(players),
            top: rank_entries(players, leaderboard(players, LeaderboardKind::WinRate), top_n),
            lvm: rank_entries(players, leaderboard(players, LeaderboardKind::Lvm), top_n),
        }
    }

    pub fn group_summary(&self) -> GroupSummary {
        group_summary(&self.read().snapshot.users)
    }

    pub fn weekly_summary(&self) -> WeeklySummary {
        weekly_summary(&self.read().snapshot.users, Local::now().naive_local())
    }

    /// Copy of the full document, group totals included.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.read().snapshot.clone();
        snapshot.reconcile();
        snapshot
    }
}
