//! Indication resolver: maps a classification index onto the diet used for menu generation.
//!
//! Pure and infallible: every index, valid or not, yields a `DietSelection`.

use serde::Serialize;
use tracing::warn;

use crate::catalog::DietCatalog;
use crate::models::indication::{IndicationChoice, IndicationMatch};
use crate::models::language::Language;
use crate::models::profile::UserProfile;

/// The diet handed to menu generation. Catalog-internal fields (indications,
/// purpose, eating regime) are not carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietSelection {
    pub choice: IndicationChoice,
    pub diet_name: String,
    pub recommendations: String,
}

pub fn resolve(
    catalog: &DietCatalog,
    matched: &IndicationMatch,
    profile: &UserProfile,
) -> DietSelection {
    let choice = matched.choice(catalog.len());

    if let IndicationChoice::Catalog(index) = choice {
        if let Some(diet) = catalog.get(index, Language::En) {
            return DietSelection {
                choice,
                diet_name: diet.diet_name.clone(),
                recommendations: diet.recommendations.clone(),
            };
        }
    }

    if !matched.is_sentinel() {
        warn!(
            "Classification returned index {} outside catalog of {} entries, using general diet",
            matched.indication_index,
            catalog.len()
        );
    }

    fallback(profile)
}

/// General profile keyed off the user's own health description.
fn fallback(profile: &UserProfile) -> DietSelection {
    let health = profile
        .health_info
        .as_deref()
        .unwrap_or("general wellbeing");

    DietSelection {
        choice: IndicationChoice::NoMatch,
        diet_name: format!("General diet for '{health}'"),
        recommendations: format!(
            "No standard therapeutic diet matches exactly. Compose balanced, gentle, \
             physiologically complete nutrition suitable for a person with: {health}. \
             Prefer boiled, steamed and baked dishes; avoid fried, smoked and very spicy food."
        ),
    }
}
