//! QR code management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use freshcart_core::models::QrCode;
use freshcart_core::{QrCodeId, QrKind, ShortCode, validate_target_url};
use serde::Deserialize;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::db::qr_codes::{self, NewQrCode};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Attempts at drawing an unused short code before giving up.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Body for creating a QR code.
#[derive(Debug, Deserialize)]
pub struct CreateQrCode {
    pub target_url: String,
    pub kind: QrKind,
    /// Vanity code. Generated when absent.
    #[serde(default)]
    pub short_code: Option<String>,
    #[serde(default)]
    pub settings: serde_json::Value,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body for editing a QR code. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateQrCode {
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn check_expiry(kind: QrKind, expires_at: Option<DateTime<Utc>>) -> Result<()> {
    if expires_at.is_some() && kind != QrKind::Temporary {
        return Err(AppError::BadRequest(
            "expires_at only applies to temporary codes".to_string(),
        ));
    }
    Ok(())
}

impl CreateQrCode {
    /// Normalized target URL and optional vanity code.
    fn validate(&self) -> Result<(String, Option<ShortCode>)> {
        let target = validate_target_url(&self.target_url)?;
        check_expiry(self.kind, self.expires_at)?;
        let short_code = self.short_code.as_deref().map(ShortCode::parse).transpose()?;
        Ok((target.into(), short_code))
    }
}

impl UpdateQrCode {
    /// Normalized target URL, if one is being set.
    fn validate(&self, kind: QrKind) -> Result<Option<String>> {
        if self.target_url.is_none() && self.expires_at.is_none() {
            return Err(AppError::BadRequest("nothing to update".to_string()));
        }
        check_expiry(kind, self.expires_at)?;

        let Some(raw) = &self.target_url else {
            return Ok(None);
        };
        if !kind.is_editable() {
            return Err(AppError::BadRequest(
                "static codes cannot be retargeted".to_string(),
            ));
        }
        Ok(Some(validate_target_url(raw)?.into()))
    }
}

async fn insert(
    state: &AppState,
    body: &CreateQrCode,
    target_url: &str,
    short_code: &ShortCode,
) -> std::result::Result<QrCode, RepositoryError> {
    qr_codes::insert(
        state.pool(),
        NewQrCode {
            short_code,
            target_url,
            kind: body.kind,
            settings: &body.settings,
            expires_at: body.expires_at,
        },
    )
    .await
}

/// List every QR code, newest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<QrCode>>> {
    Ok(Json(qr_codes::list(state.pool()).await?))
}

/// Create a QR code, generating a short code unless one was supplied.
#[instrument(skip(state, body), fields(kind = %body.kind))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateQrCode>,
) -> Result<(StatusCode, Json<QrCode>)> {
    let (target_url, vanity) = body.validate()?;

    if let Some(code) = vanity {
        let qr = insert(&state, &body, &target_url, &code).await?;
        tracing::info!(short_code = %qr.short_code, "QR code created");
        return Ok((StatusCode::CREATED, Json(qr)));
    }

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = ShortCode::generate(&mut rand::rng());
        match insert(&state, &body, &target_url, &code).await {
            Ok(qr) => {
                tracing::info!(short_code = %qr.short_code, attempt, "QR code created");
                return Ok((StatusCode::CREATED, Json(qr)));
            }
            Err(RepositoryError::Conflict(_)) => {
                tracing::warn!(short_code = %code, attempt, "Short code collision, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(format!(
        "no unused short code after {MAX_CODE_ATTEMPTS} attempts"
    )))
}

/// Edit a code's target or expiry.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<QrCodeId>,
    Json(body): Json<UpdateQrCode>,
) -> Result<Json<QrCode>> {
    let existing = qr_codes::get(state.pool(), id).await?;
    let target_url = body.validate(existing.kind)?;

    let qr = qr_codes::update(state.pool(), id, target_url.as_deref(), body.expires_at).await?;
    tracing::info!(short_code = %qr.short_code, "QR code updated");
    Ok(Json(qr))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn create_body(kind: QrKind, expires_at: Option<DateTime<Utc>>) -> CreateQrCode {
        CreateQrCode {
            target_url: "https://freshcart.test/deals".to_string(),
            kind,
            short_code: None,
            settings: serde_json::Value::Null,
            expires_at,
        }
    }

    fn tomorrow() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_create_validates_target_and_code() {
        let mut body = create_body(QrKind::Dynamic, None);
        body.short_code = Some("Summer24".to_string());
        let (target, code) = body.validate().unwrap();
        assert_eq!(target, "https://freshcart.test/deals");
        assert_eq!(code.unwrap().as_str(), "summer24");

        body.target_url = "ftp://freshcart.test".to_string();
        assert!(matches!(body.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_create_rejects_bad_vanity_code() {
        let mut body = create_body(QrKind::Static, None);
        body.short_code = Some("no".to_string());
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_expiry_only_for_temporary() {
        assert!(create_body(QrKind::Temporary, Some(tomorrow())).validate().is_ok());
        assert!(create_body(QrKind::Dynamic, Some(tomorrow())).validate().is_err());
        assert!(create_body(QrKind::Temporary, None).validate().is_ok());
    }

    #[test]
    fn test_static_codes_cannot_be_retargeted() {
        let body = UpdateQrCode {
            target_url: Some("https://freshcart.test/new".to_string()),
            expires_at: None,
        };
        assert!(matches!(
            body.validate(QrKind::Static),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            body.validate(QrKind::Dynamic).unwrap().as_deref(),
            Some("https://freshcart.test/new")
        );
    }

    #[test]
    fn test_empty_update_rejected() {
        let body = UpdateQrCode {
            target_url: None,
            expires_at: None,
        };
        assert!(body.validate(QrKind::Dynamic).is_err());
    }

    #[test]
    fn test_extend_temporary_expiry() {
        let body = UpdateQrCode {
            target_url: None,
            expires_at: Some(tomorrow()),
        };
        assert_eq!(body.validate(QrKind::Temporary).unwrap(), None);
        assert!(body.validate(QrKind::Static).is_err());
    }

    #[test]
    fn test_create_body_defaults() {
        let body: CreateQrCode =
            serde_json::from_str(r#"{"target_url":"https://x.test","kind":"static"}"#).unwrap();
        assert!(body.short_code.is_none());
        assert!(body.expires_at.is_none());
        assert_eq!(body.settings, serde_json::Value::Null);
    }
}
