//! Axum route handlers for the Menu API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::language::Language;
use crate::pipeline::orchestrator::MenuPlan;
use crate::state::AppState;

const API_KEY_PREFIX: &str = "sk-";

#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    pub request_text: String,
    #[serde(default)]
    pub language: Language,
    /// Caller's own provider key. Falls back to the server key.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// POST /api/v1/menus
///
/// Runs the full pipeline and returns the plan with its correction warnings.
pub async fn handle_create_menus(
    State(state): State<AppState>,
    Json(request): Json<MenuRequest>,
) -> Result<Json<MenuPlan>, AppError> {
    if request.request_text.trim().is_empty() {
        return Err(AppError::Validation(
            "request_text cannot be empty".to_string(),
        ));
    }

    let api_key = select_api_key(
        request.api_key.as_deref(),
        state.config.anthropic_api_key.as_deref(),
    )?;

    let plan = state
        .menu_pipeline(api_key)
        .run(&request.request_text, request.language)
        .await?;

    Ok(Json(plan))
}

/// Picks the request key over the server key and checks its format before any model call.
fn select_api_key<'a>(
    requested: Option<&'a str>,
    fallback: Option<&'a str>,
) -> Result<&'a str, AppError> {
    let key = requested
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or(fallback)
        .ok_or_else(|| AppError::Unauthorized("An API key is required".to_string()))?;

    if !key.starts_with(API_KEY_PREFIX) {
        return Err(AppError::Unauthorized(
            "Please enter a correct API key".to_string(),
        ));
    }
    Ok(key)
}
