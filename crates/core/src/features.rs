//! Feature flag lookup.
//!
//! Keys without a stored toggle resolve to a fallback chosen by the caller
//! when the set is built. There is no process-wide default.

use std::collections::BTreeMap;

use crate::models::FeatureToggle;

/// A snapshot of feature toggles plus the value used for unknown keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlags {
    fallback: bool,
    toggles: BTreeMap<String, bool>,
}

impl FeatureFlags {
    /// An empty set where every key resolves to `fallback`.
    #[must_use]
    pub const fn new(fallback: bool) -> Self {
        Self {
            fallback,
            toggles: BTreeMap::new(),
        }
    }

    /// Build from stored toggles. Later duplicates win.
    #[must_use]
    pub fn from_toggles(toggles: impl IntoIterator<Item = FeatureToggle>, fallback: bool) -> Self {
        Self {
            fallback,
            toggles: toggles.into_iter().map(|t| (t.key, t.enabled)).collect(),
        }
    }

    /// Stored value for `key`, or the fallback.
    #[must_use]
    pub fn is_enabled(&self, key: &str) -> bool {
        self.toggles.get(key).copied().unwrap_or(self.fallback)
    }

    pub fn set(&mut self, key: impl Into<String>, enabled: bool) {
        self.toggles.insert(key.into(), enabled);
    }

    #[must_use]
    pub const fn fallback(&self) -> bool {
        self.fallback
    }

    /// Stored toggles in key order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureToggle> + '_ {
        self.toggles.iter().map(|(key, &enabled)| FeatureToggle {
            key: key.clone(),
            enabled,
        })
    }
}
