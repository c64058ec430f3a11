use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Branch;

/// One entry of installed.json
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledSniffer {
    pub branch: Branch,
}

/// Sniffers this tool has installed, keyed by package name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct InstalledSniffers {
    sniffers: BTreeMap<String, InstalledSniffer>,
}

impl InstalledSniffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sniffers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&InstalledSniffer> {
        self.sniffers.get(name)
    }

    /// Insert or overwrite the entry for `name`.
    pub fn insert(&mut self, name: &str, branch: Branch) {
        self.sniffers
            .insert(name.to_string(), InstalledSniffer { branch });
    }

    pub fn len(&self) -> usize {
        self.sniffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sniffers.is_empty()
    }
}
