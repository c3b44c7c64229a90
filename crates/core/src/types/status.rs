//! Closed enums for order status and QR code kind.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown enum label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Order lifecycle status.
///
/// Analytics only ever sees a snapshot of this value; transitions are owned by
/// the checkout and dispatch flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Packed,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Placed,
        Self::Packed,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Machine-readable label (matches the database enum).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Packed => "packed",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order counts towards revenue.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "order status",
                value: s.to_owned(),
            })
    }
}

/// How a QR code resolves its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "qr_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum QrKind {
    /// Fixed destination. `expires_at` is ignored.
    Static,
    /// Stable short code, editable destination. `expires_at` is ignored.
    Dynamic,
    /// Like `Dynamic`, but stops resolving once `expires_at` has passed.
    Temporary,
}

impl QrKind {
    /// Machine-readable label (matches the database enum).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Temporary => "temporary",
        }
    }

    /// Whether the destination may be edited after creation.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::Static)
    }
}

impl std::fmt::Display for QrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QrKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "dynamic" => Ok(Self::Dynamic),
            "temporary" => Ok(Self::Temporary),
            _ => Err(ParseEnumError {
                kind: "qr kind",
                value: s.to_owned(),
            }),
        }
    }
}
