//! Handle lookup and display names.

use crate::models::{normalize_handle, PlayerId, PlayerRecord};
use std::collections::BTreeMap;

/// First player whose handle matches, ignoring case and a leading '@'.
pub fn find_by_handle(players: &BTreeMap<PlayerId, PlayerRecord>, handle: &str) -> Option<PlayerId> {
    let wanted = normalize_handle(handle);
    if wanted.is_empty() {
        return None;
    }
    players
        .iter()
        .find(|(_, p)| p.normalized_handle().as_deref() == Some(wanted.as_str()))
        .map(|(id, _)| id.clone())
}

/// "@handle", else the personal name, else "Player <id>". Unknown ids get the fallback.
pub fn display_name(players: &BTreeMap<PlayerId, PlayerRecord>, id: &str) -> String {
    let Some(p) = players.get(id) else {
        return fallback_name(id);
    };
    match (p.username.as_deref(), p.first_name.as_deref()) {
        (Some(username), _) if !username.is_empty() => {
            format!("@{}", username.trim_start_matches('@'))
        }
        (_, Some(first_name)) if !first_name.is_empty() => first_name.to_string(),
        _ => fallback_name(id),
    }
}

fn fallback_name(id: &str) -> String {
    format!("Player {}", id)
}
