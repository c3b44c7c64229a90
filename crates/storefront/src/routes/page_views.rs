//! Page-view beacon.

use axum::{Json, extract::State, http::StatusCode};
use freshcart_core::SessionId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::page_views;
use crate::error::{AppError, Result};
use crate::state::AppState;

const MAX_SESSION_ID_LENGTH: usize = 128;
const MAX_PATH_LENGTH: usize = 2048;

/// Body sent by the browser on every page load.
#[derive(Debug, Deserialize)]
pub struct PageViewRequest {
    pub session_id: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl PageViewRequest {
    fn validate(self) -> std::result::Result<(SessionId, Option<String>), AppError> {
        let session_id = self.session_id.trim();
        if session_id.is_empty() {
            return Err(AppError::BadRequest("session_id is required".to_string()));
        }
        if session_id.len() > MAX_SESSION_ID_LENGTH {
            return Err(AppError::BadRequest("session_id is too long".to_string()));
        }
        if self.path.as_ref().is_some_and(|p| p.len() > MAX_PATH_LENGTH) {
            return Err(AppError::BadRequest("path is too long".to_string()));
        }
        Ok((SessionId::from(session_id), self.path))
    }
}

/// Record a page view.
#[instrument(skip(state, body))]
pub async fn record(
    State(state): State<AppState>,
    Json(body): Json<PageViewRequest>,
) -> Result<StatusCode> {
    let (session_id, path) = body.validate()?;
    page_views::insert(state.pool(), &session_id, path.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(session_id: &str, path: Option<&str>) -> PageViewRequest {
        PageViewRequest {
            session_id: session_id.to_string(),
            path: path.map(String::from),
        }
    }

    #[test]
    fn test_valid_request() {
        let (session_id, path) = request(" sess-1 ", Some("/products")).validate().unwrap();
        assert_eq!(session_id.as_str(), "sess-1");
        assert_eq!(path.as_deref(), Some("/products"));
    }

    #[test]
    fn test_blank_session_rejected() {
        assert!(matches!(
            request("  ", None).validate(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_oversized_fields_rejected() {
        let long_session = "s".repeat(MAX_SESSION_ID_LENGTH + 1);
        assert!(request(&long_session, None).validate().is_err());

        let long_path = "/".repeat(MAX_PATH_LENGTH + 1);
        assert!(request("sess-1", Some(&long_path)).validate().is_err());
    }

    #[test]
    fn test_path_is_optional_in_json() {
        let body: PageViewRequest = serde_json::from_str(r#"{"session_id":"abc"}"#).unwrap();
        assert!(body.path.is_none());
    }
}
