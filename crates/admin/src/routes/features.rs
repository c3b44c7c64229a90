//! Feature toggle handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use freshcart_core::FeatureFlags;
use freshcart_core::models::FeatureToggle;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::features;
use crate::error::{AppError, Result};
use crate::state::AppState;

const MAX_KEY_LENGTH: usize = 64;

/// Stored toggles plus the value unknown keys resolve to.
#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub fallback: bool,
    pub toggles: Vec<FeatureToggle>,
}

#[derive(Debug, Deserialize)]
pub struct SetFeature {
    pub enabled: bool,
}

/// Keys are `snake_case` identifiers, e.g. `spin_wheel`.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("invalid feature key: {key}")))
    }
}

async fn load_flags(state: &AppState) -> Result<FeatureFlags> {
    let toggles = features::list(state.pool()).await?;
    Ok(FeatureFlags::from_toggles(
        toggles,
        state.config().feature_default_enabled,
    ))
}

/// List stored toggles.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<FeaturesResponse>> {
    let flags = load_flags(&state).await?;
    Ok(Json(FeaturesResponse {
        fallback: flags.fallback(),
        toggles: flags.iter().collect(),
    }))
}

/// Effective value of one key, falling back when nothing is stored.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<FeatureToggle>> {
    validate_key(&key)?;
    let flags = load_flags(&state).await?;
    let enabled = flags.is_enabled(&key);
    Ok(Json(FeatureToggle { key, enabled }))
}

/// Turn a feature on or off.
#[instrument(skip(state))]
pub async fn set(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SetFeature>,
) -> Result<Json<FeatureToggle>> {
    validate_key(&key)?;
    let toggle = features::upsert(state.pool(), &key, body.enabled).await?;
    tracing::info!(key = %toggle.key, enabled = toggle.enabled, "Feature toggled");
    Ok(Json(toggle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("spin_wheel").is_ok());
        assert!(validate_key("flash_deals_2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("Spin-Wheel").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }
}
