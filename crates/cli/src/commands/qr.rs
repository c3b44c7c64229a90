//! QR code helpers.
//!
//! # Usage
//!
//! ```bash
//! # Print five fresh short codes
//! fc-cli qr generate --count 5
//!
//! # Check how a code in an exported list would resolve
//! fc-cli qr resolve --input qr_codes.json PROMO2024
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use freshcart_core::models::QrCode;
use freshcart_core::{MemoryQrStore, QrStore, Resolution, ShortCode, resolve};
use thiserror::Error;

/// Errors that can occur in QR commands.
#[derive(Debug, Error)]
pub enum QrError {
    #[error("Failed to read codes: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid codes file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate short code in input: {0}")]
    DuplicateCode(ShortCode),
}

/// Generate `count` random short codes.
///
/// Uniqueness against the database is only enforced on insert, so these are
/// suggestions for vanity-free codes.
pub fn generate(count: usize) -> Vec<ShortCode> {
    let mut rng = rand::rng();
    (0..count).map(|_| ShortCode::generate(&mut rng)).collect()
}

/// Load `codes` into an in-memory store and resolve `raw` at `now`.
///
/// # Errors
///
/// Returns [`QrError::DuplicateCode`] if two records share a short code.
pub fn resolve_in(
    codes: Vec<QrCode>,
    raw: &str,
    now: DateTime<Utc>,
) -> Result<(Resolution, Option<i64>), QrError> {
    let mut store = MemoryQrStore::new();
    for code in codes {
        let short_code = code.short_code.clone();
        if !store.insert(code) {
            return Err(QrError::DuplicateCode(short_code));
        }
    }

    let resolution = match resolve(&mut store, raw, now) {
        Ok(resolution) => resolution,
        Err(never) => match never {},
    };
    let scans = ShortCode::parse(raw)
        .ok()
        .and_then(|code| store.find_by_short_code(&code).ok().flatten())
        .map(|qr| qr.scan_count);
    Ok((resolution, scans))
}

/// Print `count` generated codes, one per line.
pub fn run_generate(count: usize) {
    #[allow(clippy::print_stdout)]
    {
        for code in generate(count) {
            println!("{code}");
        }
    }
}

/// Resolve `raw` against the codes in the JSON file at `path` and print the
/// outcome.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn run_resolve(path: &Path, raw: &str) -> Result<(), QrError> {
    let content = tokio::fs::read_to_string(path).await?;
    let codes: Vec<QrCode> = serde_json::from_str(&content)?;
    tracing::info!(codes = codes.len(), "Loaded QR codes");

    let (resolution, scans) = resolve_in(codes, raw, Utc::now())?;

    let line = match resolution {
        Resolution::RedirectTo(target) => {
            format!("307 -> {target} (scan_count now {})", scans.unwrap_or_default())
        }
        Resolution::Expired => "410 expired".to_owned(),
        Resolution::NotFound => "404 not found".to_owned(),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use freshcart_core::{QrCodeId, QrKind};

    use super::*;

    fn code(short: &str, kind: QrKind, expires_at: Option<DateTime<Utc>>) -> QrCode {
        QrCode {
            id: QrCodeId::generate(),
            short_code: ShortCode::parse(short).unwrap(),
            target_url: "https://freshcart.example/deals".to_owned(),
            kind,
            settings: serde_json::Value::Null,
            scan_count: 0,
            expires_at,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_generate_count() {
        let codes = generate(3);
        assert_eq!(codes.len(), 3);
        assert!(
            codes
                .iter()
                .all(|c| c.as_str().len() == ShortCode::GENERATED_LENGTH)
        );
    }

    #[test]
    fn test_resolve_in_counts_scan() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let (resolution, scans) =
            resolve_in(vec![code("promo", QrKind::Static, None)], "PROMO", now).unwrap();
        assert!(resolution.is_redirect());
        assert_eq!(scans, Some(1));
    }

    #[test]
    fn test_resolve_in_expired() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let expired = code("flash", QrKind::Temporary, Some(now));
        let (resolution, scans) = resolve_in(vec![expired], "flash", now).unwrap();
        assert_eq!(resolution, Resolution::Expired);
        assert_eq!(scans, Some(0));
    }

    #[test]
    fn test_resolve_in_rejects_duplicates() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let codes = vec![
            code("promo", QrKind::Static, None),
            code("promo", QrKind::Dynamic, None),
        ];
        assert!(matches!(
            resolve_in(codes, "promo", now),
            Err(QrError::DuplicateCode(_))
        ));
    }
}
