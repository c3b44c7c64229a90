//! QR code records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{QrCodeId, QrKind, ShortCode};

/// A QR code and the short link it encodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub id: QrCodeId,
    /// Unique lookup key; the path segment of the printed URL.
    pub short_code: ShortCode,
    /// Current destination. Mutable for dynamic and temporary codes.
    pub target_url: String,
    pub kind: QrKind,
    /// Rendering parameters (colours, logo, error correction). Opaque here.
    #[serde(default)]
    pub settings: serde_json::Value,
    /// Number of successful resolutions.
    pub scan_count: i64,
    /// Expiry instant. Only honoured for [`QrKind::Temporary`].
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl QrCode {
    /// Whether the code has lapsed at `now`.
    ///
    /// Static and dynamic codes never expire, even if `expires_at` is set.
    /// A temporary code without an expiry behaves like a dynamic one.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            QrKind::Static | QrKind::Dynamic => false,
            QrKind::Temporary => self.expires_at.is_some_and(|expires_at| now >= expires_at),
        }
    }
}
