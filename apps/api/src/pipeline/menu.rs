//! Stage 3: generates candidate daily menus for the selected diet.
//!
//! Optional user constraints are assembled into the prompt only when present:
//! an empty exclusion list adds no exclusion sentence, and so on.

use serde::Serialize;
use tracing::info;

use crate::catalog::resolver::DietSelection;
use crate::errors::AppError;
use crate::llm_client::structured::{call_structured, Parsed, Schema};
use crate::llm_client::LanguageModel;
use crate::models::menu::{MenuList, MEALS_PER_MENU, MENU_OPTIONS};
use crate::models::profile::UserProfile;
use crate::pipeline::prompts::{
    ADD_CONDITION, ALLERGY_CONDITION, CALORIE_CONDITION, DIET_TYPE_CONDITION, EXCLUDE_CONDITION,
    MENU_PROMPT, MENU_SYSTEM, OTHER_RESTRICTIONS_CONDITION,
};

/// Where the user lives, for realistic local prices.
#[derive(Debug, Clone, Serialize)]
pub struct MenuSettings {
    pub country: String,
    pub currency: String,
}

pub async fn generate_menus(
    model: &dyn LanguageModel,
    diet: &DietSelection,
    profile: &UserProfile,
    settings: &MenuSettings,
) -> Result<Parsed<MenuList>, AppError> {
    let prompt = build_menu_prompt(diet, profile, settings)?;

    let parsed = call_structured::<MenuList>(model, "menu", &prompt, MENU_SYSTEM).await?;

    info!(
        "Generated {} menus with {} meals and {} dishes for '{}'",
        parsed.value.menus.len(),
        parsed.value.meal_count(),
        parsed.value.dish_count(),
        diet.diet_name
    );

    Ok(parsed)
}

pub fn build_menu_prompt(
    diet: &DietSelection,
    profile: &UserProfile,
    settings: &MenuSettings,
) -> Result<String, AppError> {
    let diet_json = serde_json::to_string_pretty(&serde_json::json!({
        "diet_name": diet.diet_name,
        "recommendations": diet.recommendations,
    }))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize diet: {e}")))?;

    let conditions = build_conditions(profile)?;

    Ok(MENU_PROMPT.render(&[
        ("diet_json", &diet_json),
        ("diet_name", &diet.diet_name),
        ("menu_options", &MENU_OPTIONS.to_string()),
        ("meals_per_menu", &MEALS_PER_MENU.to_string()),
        ("country", &settings.country),
        ("currency", &settings.currency),
        ("conditions", &conditions),
        ("schema", MenuList::SHAPE),
    ])?)
}

/// Conditional instruction assembly. Each sentence appears only when its field is set.
fn build_conditions(profile: &UserProfile) -> Result<String, AppError> {
    let mut lines = Vec::new();

    if !profile.allergies.is_empty() || !profile.intolerances.is_empty() {
        lines.push(ALLERGY_CONDITION.render(&[
            ("allergies", &join_or_none(&profile.allergies)),
            ("intolerances", &join_or_none(&profile.intolerances)),
        ])?);
    }
    if !profile.exclude.is_empty() {
        lines.push(EXCLUDE_CONDITION.render(&[("exclude", &profile.exclude.join(", "))])?);
    }
    if !profile.add.is_empty() {
        lines.push(ADD_CONDITION.render(&[("add", &profile.add.join(", "))])?);
    }
    if let Some(kcal) = profile.calorie_target {
        lines.push(CALORIE_CONDITION.render(&[("calorie_target", &kcal.to_string())])?);
    }
    if let Some(diet_type) = &profile.diet_type {
        lines.push(DIET_TYPE_CONDITION.render(&[("diet_type", diet_type)])?);
    }
    if let Some(other) = &profile.other_restrictions {
        lines.push(OTHER_RESTRICTIONS_CONDITION.render(&[("other_restrictions", other)])?);
    }

    Ok(lines.join("\n"))
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::models::indication::IndicationChoice;

    fn diet() -> DietSelection {
        DietSelection {
            choice: IndicationChoice::Catalog(0),
            diet_name: "Diet No. 1".to_string(),
            recommendations: "Boiled and mashed food.".to_string(),
        }
    }

    fn settings() -> MenuSettings {
        MenuSettings {
            country: "Ukraine".to_string(),
            currency: "UAH".to_string(),
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            health_info: Some("gastritis".to_string()),
            allergies: vec!["peanuts".to_string(), "soy".to_string()],
            exclude: vec!["onions".to_string()],
            add: vec!["apples".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_carries_diet_counts_and_currency() {
        let prompt = build_menu_prompt(&diet(), &profile(), &settings()).unwrap();
        assert!(prompt.contains("\"diet_name\": \"Diet No. 1\""));
        assert!(prompt.contains("recommendations of 'Diet No. 1'"));
        assert!(prompt.contains("list of 3 balanced daily menu options"));
        assert!(prompt.contains("exactly 5 meals"));
        assert!(prompt.contains("located in Ukraine"));
        assert!(prompt.contains("in UAH"));
        assert!(!prompt.contains("indications"));
    }

    #[test]
    fn test_conditions_present_when_fields_set() {
        let prompt = build_menu_prompt(&diet(), &profile(), &settings()).unwrap();
        assert!(prompt.contains("allergies: 'peanuts, soy' or intolerances: 'none'"));
        assert!(prompt.contains("must not contain products such as: onions"));
        assert!(prompt.contains("include products such as: apples"));
    }

    #[test]
    fn test_conditions_absent_when_fields_empty() {
        let bare = UserProfile {
            health_info: Some("gastritis".to_string()),
            ..Default::default()
        };
        let prompt = build_menu_prompt(&diet(), &bare, &settings()).unwrap();
        assert!(!prompt.contains("allergies:"));
        assert!(!prompt.contains("must not contain products"));
        assert!(!prompt.contains("include products"));
        assert!(!prompt.contains("kcal"));
    }

    #[test]
    fn test_exclusion_without_addition() {
        let profile = UserProfile {
            health_info: Some("gout".to_string()),
            exclude: vec!["liver".to_string()],
            ..Default::default()
        };
        let conditions = build_conditions(&profile).unwrap();
        assert!(conditions.contains("liver"));
        assert!(!conditions.contains("Be sure to include"));
    }

    #[test]
    fn test_optional_scalar_conditions() {
        let profile = UserProfile {
            health_info: Some("obesity".to_string()),
            calorie_target: Some(1600),
            diet_type: Some("vegetarian".to_string()),
            other_restrictions: Some("no spicy food".to_string()),
            ..Default::default()
        };
        let conditions = build_conditions(&profile).unwrap();
        assert!(conditions.contains("approximately 1600 kcal"));
        assert!(conditions.contains("type of diet: vegetarian"));
        assert!(conditions.contains("restrictions: no spicy food"));
    }

    #[tokio::test]
    async fn test_generate_parses_menu_list() {
        let model = ScriptedModel::new(vec![MenuList::SHAPE]);
        let menus = generate_menus(&model, &diet(), &profile(), &settings())
            .await
            .unwrap();
        assert_eq!(menus.value.menus.len(), 1);
        assert!(!menus.repaired);
        assert_eq!(model.calls(), 1);
    }
}
