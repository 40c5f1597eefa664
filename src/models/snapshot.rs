//! The persisted document: every player record plus the group aggregate.

use crate::models::group::GroupTotals;
use crate::models::player::{PlayerId, PlayerRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of identities minted for players known only by handle.
pub const SYNTHETIC_ID_PREFIX: &str = "user_";

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub users: BTreeMap<PlayerId, PlayerRecord>,
    pub group: GroupTotals,
}

impl Snapshot {
    pub fn new(users: BTreeMap<PlayerId, PlayerRecord>) -> Self {
        let group = GroupTotals::from_players(&users);
        Self { users, group }
    }

    /// Re-derive `group` from `users`. Returns true if the stored aggregate disagreed.
    pub fn reconcile(&mut self) -> bool {
        let derived = GroupTotals::from_players(&self.users);
        let stale = derived != self.group;
        self.group = derived;
        stale
    }

    /// Next free synthetic sequence number: one past the largest `user_<n>` in use.
    pub fn next_synthetic_seq(&self) -> u64 {
        self.users
            .keys()
            .filter_map(|id| id.strip_prefix(SYNTHETIC_ID_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_seq_skips_past_existing_ids() {
        let mut users = BTreeMap::new();
        users.insert("user_3".to_string(), PlayerRecord::default());
        users.insert("user_x".to_string(), PlayerRecord::default());
        users.insert("12345".to_string(), PlayerRecord::default());
        assert_eq!(Snapshot::new(users).next_synthetic_seq(), 4);
        assert_eq!(Snapshot::default().next_synthetic_seq(), 1);
    }

    #[test]
    fn reconcile_replaces_stale_group_totals() {
        let mut record = PlayerRecord::default();
        record.wins = 2;
        record.losses = 1;
        record.mvp_count = 1;
        let mut snapshot = Snapshot::default();
        snapshot.users.insert("a".to_string(), record);
        snapshot.group.total_games = 99;

        assert!(snapshot.reconcile());
        assert_eq!(snapshot.group.total_games, 3);
        assert_eq!(snapshot.group.group_wins, 2);
        assert_eq!(snapshot.group.total_mvp, 1);
        assert!(!snapshot.reconcile());
    }

    #[test]
    fn missing_fields_default_when_parsing() {
        let json = r#"{"users": {"42": {"wins": 3, "username": "foo", "extra": true}}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let p = &snapshot.users["42"];
        assert_eq!(p.wins, 3);
        assert_eq!(p.losses, 0);
        assert!(p.role_stats.is_empty());
        assert_eq!(snapshot.group, GroupTotals::default());
    }
}
