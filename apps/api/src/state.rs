use std::sync::Arc;

use reqwest::Client;

use crate::catalog::DietCatalog;
use crate::config::Config;
use crate::llm_client::{LanguageModel, LlmClient};
use crate::pipeline::menu::MenuSettings;
use crate::pipeline::orchestrator::MenuPipeline;
use crate::translation::LlmTranslator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<DietCatalog>,
    /// Pooled HTTP client shared by every per-request `LlmClient`.
    pub http: Client,
}

impl AppState {
    /// Builds the pipeline for one request. Clients are bound to the caller's key.
    pub fn menu_pipeline(&self, api_key: &str) -> MenuPipeline {
        let extraction: Arc<dyn LanguageModel> =
            Arc::new(self.model(api_key, &self.config.extraction_model));
        let menu: Arc<dyn LanguageModel> = Arc::new(self.model(api_key, &self.config.menu_model));

        MenuPipeline::new(
            extraction.clone(),
            menu,
            self.catalog.clone(),
            MenuSettings {
                country: self.config.menu_country.clone(),
                currency: self.config.menu_currency.clone(),
            },
        )
        .with_translator(Arc::new(LlmTranslator::new(extraction)))
    }

    fn model(&self, api_key: &str, model: &str) -> LlmClient {
        LlmClient::new(self.http.clone(), api_key.to_string(), model)
            .with_max_attempts(self.config.llm_max_attempts)
    }
}

#[cfg(test)]
pub fn test_state() -> AppState {
    AppState {
        config: Config {
            anthropic_api_key: None,
            extraction_model: "claude-haiku-4-5".to_string(),
            menu_model: "claude-sonnet-4-5".to_string(),
            llm_max_attempts: 1,
            llm_timeout_secs: 5,
            diet_catalog_path: None,
            menu_country: "Ukraine".to_string(),
            menu_currency: "UAH".to_string(),
            export_font_path: None,
            port: 0,
            rust_log: "info".to_string(),
        },
        catalog: Arc::new(DietCatalog::embedded().expect("embedded catalog")),
        http: Client::new(),
    }
}
