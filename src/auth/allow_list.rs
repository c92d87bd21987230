// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Steam id allow-list.

use std::collections::HashSet;

use super::claims::SteamId;

/// Set of Steam ids permitted to use the API.
///
/// An empty list allows every verified Steam user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    ids: HashSet<SteamId>,
}

impl AllowList {
    pub fn new(ids: impl IntoIterator<Item = SteamId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list of SteamID64 values. Blank entries are skipped.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut ids = HashSet::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let id = entry
                .parse::<SteamId>()
                .map_err(|_| format!("'{entry}' is not a valid Steam id"))?;
            ids.insert(id);
        }
        Ok(Self { ids })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no restriction is configured.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check `steam_id` against the list.
    pub fn permits(&self, steam_id: SteamId) -> bool {
        self.ids.is_empty() || self.ids.contains(&steam_id)
    }
}
