//! Stored feature toggle rows.

use serde::{Deserialize, Serialize};

/// An admin-controlled on/off switch (e.g. `spin_wheel`, `flash_deals`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggle {
    pub key: String,
    pub enabled: bool,
}
