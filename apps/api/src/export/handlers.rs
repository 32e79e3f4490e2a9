//! Axum route handler for PDF export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::{render_menu_pdf, sanitize_filename, ExportOptions};
use crate::models::menu::DailyMenu;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub menu: DailyMenu,
    #[serde(default)]
    pub diet_name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /api/v1/menus/export
///
/// Renders one daily menu as a PDF attachment.
pub async fn handle_export_menu(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    if request.menu.meals.is_empty() {
        return Err(AppError::Validation("menu has no meals".to_string()));
    }

    let filename = sanitize_filename(request.filename.as_deref());
    let options = ExportOptions {
        diet_name: request.diet_name,
        generated_on: Utc::now().date_naive(),
        font_path: state.config.export_font_path.clone(),
    };
    let menu = request.menu;

    let pdf = tokio::task::spawn_blocking(move || render_menu_pdf(&menu, &options))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(pdf),
    )
        .into_response())
}
