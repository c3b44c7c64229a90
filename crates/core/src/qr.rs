//! QR short-link resolution.
//!
//! Resolution is check-found, check-not-expired, then count the scan. A
//! lookup that ends in [`Resolution::Expired`] or [`Resolution::NotFound`]
//! leaves the store untouched.
//!
//! [`Resolution::decide`] is the shared rule. [`QrStore`] and [`resolve`] are
//! synchronous and serve in-process stores only ([`MemoryQrStore`], the CLI
//! and tests). The storefront resolves against Postgres in its own handler:
//! it calls `decide` and then a guarded `UPDATE` that counts the scan and
//! re-checks expiry in one statement.

use std::collections::HashMap;
use std::convert::Infallible;

use chrono::{DateTime, Utc};
use url::Url;

use crate::models::QrCode;
use crate::types::{QrCodeId, ShortCode};

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Send the visitor to this URL.
    RedirectTo(String),
    /// The code exists but is a lapsed temporary code.
    Expired,
    /// No code with that value exists.
    NotFound,
}

impl Resolution {
    /// Decide what a lookup result means at `now`, without side effects.
    #[must_use]
    pub fn decide(code: Option<&QrCode>, now: DateTime<Utc>) -> Self {
        match code {
            None => Self::NotFound,
            Some(code) if code.is_expired_at(now) => Self::Expired,
            Some(code) => Self::RedirectTo(code.target_url.clone()),
        }
    }

    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::RedirectTo(_))
    }
}

/// Errors that can occur when validating a redirect target.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetUrlError {
    /// The target is not an absolute URL.
    #[error("invalid target url: {0}")]
    Invalid(#[from] url::ParseError),
    /// Only `http` and `https` targets can be redirected to.
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
}

/// Parse a redirect target, accepting absolute `http(s)` URLs only.
///
/// # Errors
///
/// Returns [`TargetUrlError`] if the input does not parse or uses another scheme.
pub fn validate_target_url(raw: &str) -> Result<Url, TargetUrlError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TargetUrlError::UnsupportedScheme(other.to_owned())),
    }
}

/// In-process storage the resolver reads codes from and reports scans to.
///
/// Database-backed resolution does not go through this trait; see the module
/// docs.
pub trait QrStore {
    type Error;

    /// Fetch the current record for `code`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the lookup fails.
    fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<QrCode>, Self::Error>;

    /// Add one to the code's scan counter.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the update fails.
    fn increment_scan_count(&mut self, id: QrCodeId) -> Result<(), Self::Error>;
}

/// Resolve `raw_code` against `store` at `now`.
///
/// Input that is not a valid short code resolves to [`Resolution::NotFound`].
/// The target URL is read from the store on every call, so edits to a
/// dynamic code take effect on the next scan.
///
/// # Errors
///
/// Returns the store's error if either the lookup or the increment fails.
pub fn resolve<S: QrStore + ?Sized>(
    store: &mut S,
    raw_code: &str,
    now: DateTime<Utc>,
) -> Result<Resolution, S::Error> {
    let Ok(code) = ShortCode::parse(raw_code) else {
        return Ok(Resolution::NotFound);
    };

    let record = store.find_by_short_code(&code)?;
    let resolution = Resolution::decide(record.as_ref(), now);

    if let (Resolution::RedirectTo(_), Some(record)) = (&resolution, &record) {
        store.increment_scan_count(record.id)?;
    }

    Ok(resolution)
}

/// In-process [`QrStore`] backed by hash maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryQrStore {
    codes: HashMap<QrCodeId, QrCode>,
    by_short_code: HashMap<ShortCode, QrCodeId>,
}

impl MemoryQrStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a code. Returns `false` if a different record
    /// already owns the short code.
    ///
    /// Replacing a record under a new short code retires the old one.
    pub fn insert(&mut self, code: QrCode) -> bool {
        if self
            .by_short_code
            .get(&code.short_code)
            .is_some_and(|existing| *existing != code.id)
        {
            return false;
        }
        if let Some(previous) = self
            .codes
            .get(&code.id)
            .filter(|previous| previous.short_code != code.short_code)
        {
            self.by_short_code.remove(&previous.short_code);
        }
        self.by_short_code.insert(code.short_code.clone(), code.id);
        self.codes.insert(code.id, code);
        true
    }

    /// Point a code at a new destination. Returns `false` if the id is unknown.
    pub fn set_target_url(&mut self, id: QrCodeId, target_url: impl Into<String>) -> bool {
        self.codes.get_mut(&id).is_some_and(|code| {
            code.target_url = target_url.into();
            true
        })
    }

    #[must_use]
    pub fn get(&self, id: QrCodeId) -> Option<&QrCode> {
        self.codes.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl QrStore for MemoryQrStore {
    type Error = Infallible;

    fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<QrCode>, Self::Error> {
        Ok(self
            .by_short_code
            .get(code)
            .and_then(|id| self.codes.get(id))
            .cloned())
    }

    fn increment_scan_count(&mut self, id: QrCodeId) -> Result<(), Self::Error> {
        if let Some(code) = self.codes.get_mut(&id) {
            code.scan_count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::types::QrKind;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn code(short: &str, kind: QrKind, target: &str) -> QrCode {
        QrCode {
            id: QrCodeId::generate(),
            short_code: ShortCode::parse(short).unwrap(),
            target_url: target.to_string(),
            kind,
            settings: serde_json::json!({ "foreground": "#000000" }),
            scan_count: 0,
            expires_at: None,
            created_at: now() - TimeDelta::days(30),
        }
    }

    #[test]
    fn test_static_code_redirects_and_counts() {
        let mut store = MemoryQrStore::new();
        let qr = code("abc123", QrKind::Static, "https://x.test/menu");
        let id = qr.id;
        assert!(store.insert(qr));

        let outcome = resolve(&mut store, "abc123", now()).unwrap();
        assert_eq!(outcome, Resolution::RedirectTo("https://x.test/menu".to_string()));
        assert_eq!(store.get(id).unwrap().scan_count, 1);
    }

    #[test]
    fn test_expired_temporary_code_has_no_side_effects() {
        let mut store = MemoryQrStore::new();
        let mut qr = code("promo1", QrKind::Temporary, "https://x.test/promo");
        qr.expires_at = Some(now() - TimeDelta::days(1));
        let id = qr.id;
        store.insert(qr);

        assert_eq!(resolve(&mut store, "promo1", now()).unwrap(), Resolution::Expired);
        assert_eq!(store.get(id).unwrap().scan_count, 0);
    }

    #[test]
    fn test_temporary_code_before_expiry_redirects() {
        let mut store = MemoryQrStore::new();
        let mut qr = code("promo2", QrKind::Temporary, "https://x.test/promo");
        qr.expires_at = Some(now() + TimeDelta::hours(1));
        store.insert(qr);

        assert!(resolve(&mut store, "promo2", now()).unwrap().is_redirect());
    }

    #[test]
    fn test_dynamic_code_follows_updated_target() {
        let mut store = MemoryQrStore::new();
        let qr = code("dyn1", QrKind::Dynamic, "https://x.test/a");
        let id = qr.id;
        store.insert(qr);

        assert_eq!(
            resolve(&mut store, "dyn1", now()).unwrap(),
            Resolution::RedirectTo("https://x.test/a".to_string())
        );
        assert!(store.set_target_url(id, "https://x.test/b"));
        assert_eq!(
            resolve(&mut store, "dyn1", now()).unwrap(),
            Resolution::RedirectTo("https://x.test/b".to_string())
        );
        assert_eq!(store.get(id).unwrap().scan_count, 2);
    }

    #[test]
    fn test_unknown_and_malformed_codes_are_not_found() {
        let mut store = MemoryQrStore::new();
        store.insert(code("abc123", QrKind::Static, "https://x.test/menu"));

        assert_eq!(resolve(&mut store, "zzz999", now()).unwrap(), Resolution::NotFound);
        assert_eq!(resolve(&mut store, "no/slashes", now()).unwrap(), Resolution::NotFound);
        assert_eq!(resolve(&mut store, "", now()).unwrap(), Resolution::NotFound);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut store = MemoryQrStore::new();
        store.insert(code("abc123", QrKind::Static, "https://x.test/menu"));
        assert!(resolve(&mut store, "ABC123", now()).unwrap().is_redirect());
    }

    #[test]
    fn test_validate_target_url() {
        assert_eq!(
            validate_target_url(" https://x.test/menu ").unwrap().as_str(),
            "https://x.test/menu"
        );
        assert!(matches!(
            validate_target_url("javascript:alert(1)"),
            Err(TargetUrlError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_target_url("/relative"),
            Err(TargetUrlError::Invalid(_))
        ));
    }

    #[test]
    fn test_reinsert_with_new_short_code_retires_old_one() {
        let mut store = MemoryQrStore::new();
        let qr = code("oldcode", QrKind::Dynamic, "https://x.test/menu");
        let id = qr.id;
        assert!(store.insert(qr.clone()));

        let renamed = QrCode {
            short_code: ShortCode::parse("newcode").unwrap(),
            ..qr
        };
        assert!(store.insert(renamed));

        assert_eq!(resolve(&mut store, "oldcode", now()).unwrap(), Resolution::NotFound);
        assert_eq!(store.get(id).unwrap().scan_count, 0);
        assert!(resolve(&mut store, "newcode", now()).unwrap().is_redirect());
        assert_eq!(store.get(id).unwrap().scan_count, 1);
        assert_eq!(store.len(), 1);

        // the retired code is free for another record
        assert!(store.insert(code("oldcode", QrKind::Static, "https://x.test/2")));
    }

    #[test]
    fn test_insert_rejects_duplicate_short_code() {
        let mut store = MemoryQrStore::new();
        assert!(store.insert(code("dupe", QrKind::Static, "https://x.test/1")));
        assert!(!store.insert(code("dupe", QrKind::Static, "https://x.test/2")));
        assert_eq!(store.len(), 1);
    }
}
