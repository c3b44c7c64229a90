//! Short code type used as the path segment of QR redirect URLs.

use core::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Characters a generated short code is drawn from.
///
/// Lowercase only: codes are matched case-insensitively, so mixed case would
/// only shrink the effective alphabet.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Errors that can occur when parsing a [`ShortCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortCodeError {
    /// The input is shorter than the minimum length.
    #[error("short code must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("short code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9]`.
    #[error("short code may only contain letters and digits")]
    InvalidCharacter,
}

/// A compact token mapping to a QR code record.
///
/// ## Constraints
///
/// - Length: 4-32 characters
/// - ASCII letters and digits only
/// - Stored lowercase, so `AbC123` and `abc123` are the same code
///
/// ## Examples
///
/// ```
/// use freshcart_core::ShortCode;
///
/// let code = ShortCode::parse(" Promo2024 ").unwrap();
/// assert_eq!(code.as_str(), "promo2024");
///
/// assert!(ShortCode::parse("ab").is_err());        // too short
/// assert!(ShortCode::parse("spin-wheel").is_err()); // hyphen
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Minimum length accepted by [`ShortCode::parse`].
    pub const MIN_LENGTH: usize = 4;
    /// Maximum length accepted by [`ShortCode::parse`].
    pub const MAX_LENGTH: usize = 32;
    /// Length of codes produced by [`ShortCode::generate`].
    pub const GENERATED_LENGTH: usize = 8;

    /// Parse and normalize a short code.
    ///
    /// Surrounding whitespace is trimmed and the code is lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is outside 4-32 characters or
    /// contains anything but ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self, ShortCodeError> {
        let trimmed = s.trim();

        if trimmed.len() < Self::MIN_LENGTH {
            return Err(ShortCodeError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ShortCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ShortCodeError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Generate a random code of [`Self::GENERATED_LENGTH`] characters.
    ///
    /// Uniqueness is not checked here; the `qr_codes.short_code` unique
    /// constraint rejects collisions and the caller retries.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..Self::GENERATED_LENGTH)
            .filter_map(|_| ALPHABET.choose(rng).copied().map(char::from))
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShortCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ShortCode {
    type Err = ShortCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = ShortCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShortCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShortCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShortCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
