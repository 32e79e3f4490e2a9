//! Axum route handlers for the Diet catalog API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::diet::DietProfile;
use crate::models::language::Language;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DietsQuery {
    #[serde(default)]
    pub lang: Language,
}

#[derive(Debug, Serialize)]
pub struct DietListing {
    pub index: usize,
    #[serde(flatten)]
    pub diet: DietProfile,
}

/// GET /api/v1/diets?lang=en|uk
pub async fn handle_list_diets(
    State(state): State<AppState>,
    Query(query): Query<DietsQuery>,
) -> Json<Vec<DietListing>> {
    let listings = state
        .catalog
        .entries(query.lang)
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, diet)| DietListing { index, diet })
        .collect();
    Json(listings)
}
