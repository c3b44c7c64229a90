//! Page-view instrumentation events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionId;

/// One page load reported by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    /// Browsing session the event belongs to.
    pub session_id: SessionId,
    /// Path that was viewed, when reported.
    #[serde(default)]
    pub path: Option<String>,
    /// When the page was loaded.
    pub created_at: DateTime<Utc>,
}
