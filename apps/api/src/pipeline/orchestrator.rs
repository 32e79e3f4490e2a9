//! End-to-end menu request: extract → classify → resolve → generate → check → translate.
//!
//! Stages run strictly in sequence; the first failure ends the request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::catalog::resolver::resolve;
use crate::catalog::DietCatalog;
use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::models::indication::{IndicationChoice, IndicationMatch};
use crate::models::language::Language;
use crate::models::menu::{DailyMenu, MenuList};
use crate::models::profile::UserProfile;
use crate::pipeline::checks::{run_checks, MenuWarning};
use crate::pipeline::classify::classify_indication;
use crate::pipeline::extract::extract_profile;
use crate::pipeline::menu::{generate_menus, MenuSettings};
use crate::translation::{translate_menus, Translator};

/// Everything a client needs to present the result of one request.
#[derive(Debug, Clone, Serialize)]
pub struct MenuPlan {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub language: Language,
    pub user_profile: UserProfile,
    pub indication: IndicationMatch,
    pub diet_choice: IndicationChoice,
    pub diet_name: String,
    pub menus: Vec<DailyMenu>,
    pub warnings: Vec<MenuWarning>,
    /// Stages whose first completion failed validation and went through repair.
    pub repaired_stages: Vec<&'static str>,
}

pub struct MenuPipeline {
    /// Stages 1 and 2.
    extraction_model: Arc<dyn LanguageModel>,
    /// Stage 3.
    menu_model: Arc<dyn LanguageModel>,
    catalog: Arc<DietCatalog>,
    settings: MenuSettings,
    translator: Option<Arc<dyn Translator>>,
}

impl MenuPipeline {
    pub fn new(
        extraction_model: Arc<dyn LanguageModel>,
        menu_model: Arc<dyn LanguageModel>,
        catalog: Arc<DietCatalog>,
        settings: MenuSettings,
    ) -> Self {
        Self {
            extraction_model,
            menu_model,
            catalog,
            settings,
            translator: None,
        }
    }

    /// Enables output in languages other than English.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub async fn run(&self, request_text: &str, language: Language) -> Result<MenuPlan, AppError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("menu_request", %request_id, language = language.code());
        self.run_stages(request_id, request_text, language)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        request_id: Uuid,
        request_text: &str,
        language: Language,
    ) -> Result<MenuPlan, AppError> {
        if request_text.trim().is_empty() {
            return Err(AppError::Validation(
                "request_text cannot be empty".to_string(),
            ));
        }
        if language.needs_translation() && self.translator.is_none() {
            return Err(unsupported_language(language));
        }

        let mut repaired_stages = Vec::new();

        let extracted = extract_profile(self.extraction_model.as_ref(), request_text).await?;
        if extracted.repaired {
            repaired_stages.push("extract");
        }
        let profile = extracted.value;
        let health_info = profile.health_info.as_deref().unwrap_or_default();

        let indications = self.catalog.indication_list();
        let classified =
            classify_indication(self.extraction_model.as_ref(), health_info, &indications).await?;
        if classified.repaired {
            repaired_stages.push("classify");
        }
        let matched = classified.value;

        let diet = resolve(&self.catalog, &matched, &profile);
        info!("Diet selected: {} ({:?})", diet.diet_name, diet.choice);

        let generated =
            generate_menus(self.menu_model.as_ref(), &diet, &profile, &self.settings).await?;
        if generated.repaired {
            repaired_stages.push("menu");
        }
        let mut menus = generated.value;
        let warnings = run_checks(&mut menus, &profile);

        let (menus, diet_name) = self
            .localize(menus, &diet.diet_name, diet.choice, language)
            .await?;

        info!(
            "Menu plan ready: {} menus, {} warnings, {} repaired stages",
            menus.menus.len(),
            warnings.len(),
            repaired_stages.len()
        );

        Ok(MenuPlan {
            request_id,
            generated_at: Utc::now(),
            language,
            user_profile: profile,
            indication: matched,
            diet_choice: diet.choice,
            diet_name,
            menus: menus.menus,
            warnings,
            repaired_stages,
        })
    }

    /// Menus are generated in English. Catalog diets carry their own localized
    /// name; the general fallback name goes through the translator with the menus.
    async fn localize(
        &self,
        menus: MenuList,
        diet_name: &str,
        choice: IndicationChoice,
        language: Language,
    ) -> Result<(MenuList, String), AppError> {
        if !language.needs_translation() {
            return Ok((menus, diet_name.to_string()));
        }

        let Some(translator) = &self.translator else {
            return Err(unsupported_language(language));
        };

        let menus = translate_menus(translator.as_ref(), &menus, language).await?;

        let localized_name = match choice {
            IndicationChoice::Catalog(index) => self
                .catalog
                .get(index, language)
                .map(|d| d.diet_name.clone()),
            IndicationChoice::NoMatch => None,
        };
        let diet_name = match localized_name {
            Some(name) => name,
            None => translator
                .translate_batch(&[diet_name.to_string()], language)
                .await?
                .pop()
                .unwrap_or_else(|| diet_name.to_string()),
        };

        Ok((menus, diet_name))
    }
}

fn unsupported_language(language: Language) -> AppError {
    AppError::Validation(format!("language '{}' is not available", language.code()))
}
