pub mod prompts;
pub mod tree;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::structured::{call_structured, Schema};
use crate::llm_client::LanguageModel;
use crate::models::language::Language;
use crate::models::menu::MenuList;
use prompts::{TRANSLATE_PROMPT, TRANSLATE_SYSTEM};
use tree::{collect_string_leaves, is_translatable, map_string_leaves};

/// Largest number of strings sent to the model in one translation call.
pub const TRANSLATION_BATCH_SIZE: usize = 60;

/// Translates a batch of strings. The output has the same length and order as the input.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_batch(
        &self,
        texts: &[String],
        target: Language,
    ) -> Result<Vec<String>, AppError>;
}

#[derive(Debug, Deserialize)]
struct TranslatedBatch {
    translations: Vec<String>,
}

impl Schema for TranslatedBatch {
    const SHAPE: &'static str = r#"{"translations": ["Breakfast", "Oatmeal with baked apple"]}"#;
}

/// Translator backed by a language model, chunked by `TRANSLATION_BATCH_SIZE`.
pub struct LlmTranslator {
    model: Arc<dyn LanguageModel>,
}

impl LlmTranslator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    async fn translate_chunk(
        &self,
        chunk: &[String],
        target: Language,
    ) -> Result<Vec<String>, AppError> {
        let texts = serde_json::to_string_pretty(chunk)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize texts: {e}")))?;

        let prompt = TRANSLATE_PROMPT.render(&[
            ("language", target.english_name()),
            ("count", &chunk.len().to_string()),
            ("texts", &texts),
            ("schema", TranslatedBatch::SHAPE),
        ])?;

        let parsed = call_structured::<TranslatedBatch>(
            self.model.as_ref(),
            "translate",
            &prompt,
            TRANSLATE_SYSTEM,
        )
        .await?;

        let translations = parsed.value.translations;
        if translations.len() != chunk.len() {
            return Err(AppError::MalformedOutput(format!(
                "translate: expected {} strings, got {}",
                chunk.len(),
                translations.len()
            )));
        }
        Ok(translations)
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        target: Language,
    ) -> Result<Vec<String>, AppError> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(TRANSLATION_BATCH_SIZE) {
            out.extend(self.translate_chunk(chunk, target).await?);
        }
        Ok(out)
    }
}

/// Translates every text leaf of `menus` into `target`. Numbers, keys and
/// non-alphabetic strings pass through unchanged.
pub async fn translate_menus(
    translator: &dyn Translator,
    menus: &MenuList,
    target: Language,
) -> Result<MenuList, AppError> {
    let value = serde_json::to_value(menus)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize menus: {e}")))?;

    let sources: Vec<String> = collect_string_leaves(&value)
        .into_iter()
        .filter(|s| is_translatable(s))
        .map(String::from)
        .collect();

    if sources.is_empty() {
        return Ok(menus.clone());
    }

    let translated = translator.translate_batch(&sources, target).await?;
    if translated.len() != sources.len() {
        return Err(AppError::MalformedOutput(format!(
            "translate: expected {} strings, got {}",
            sources.len(),
            translated.len()
        )));
    }

    let mut replacements = translated.into_iter();
    let value = map_string_leaves(value, &mut |leaf| {
        if !is_translatable(&leaf) {
            return Ok(leaf);
        }
        replacements
            .next()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("translation leaf count drifted")))
    })?;

    let mut translated: MenuList = serde_json::from_value(value).map_err(|e| {
        AppError::MalformedOutput(format!("translated menus no longer parse: {e}"))
    })?;

    // Currency codes stay as generated.
    for (menu, original) in translated.menus.iter_mut().zip(&menus.menus) {
        menu.currency.clone_from(&original.currency);
    }

    info!(
        "Translated {} strings into {}",
        sources.len(),
        target.english_name()
    );
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::llm_client::structured::parse_completion;
    use crate::llm_client::testing::ScriptedModel;

    /// Prefixes every string, recording batch sizes.
    struct PrefixTranslator {
        batches: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Translator for PrefixTranslator {
        async fn translate_batch(
            &self,
            texts: &[String],
            target: Language,
        ) -> Result<Vec<String>, AppError> {
            self.batches.lock().unwrap().push(texts.len());
            Ok(texts
                .iter()
                .map(|t| format!("[{}] {t}", target.code()))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_translate_menus_preserves_structure_and_prices() {
        let menus = parse_completion::<MenuList>(MenuList::SHAPE).unwrap();
        let translator = PrefixTranslator {
            batches: Mutex::new(Vec::new()),
        };

        let translated = translate_menus(&translator, &menus, Language::Uk)
            .await
            .unwrap();

        assert_eq!(translated.menus.len(), menus.menus.len());
        assert_eq!(translated.meal_count(), menus.meal_count());
        assert_eq!(translated.dish_count(), menus.dish_count());

        let dish = &translated.menus[0].meals[0].dishes[0];
        assert_eq!(dish.name, "[uk] Oatmeal with baked apple");
        assert_eq!(dish.price, menus.menus[0].meals[0].dishes[0].price);
        assert_eq!(dish.ingredients.len(), 4);
        assert_eq!(translated.menus[0].total_price, menus.menus[0].total_price);
        assert_eq!(translated.menus[0].currency, "UAH");
    }

    /// Tags text on the way into Ukrainian and strips the tag on the way back.
    struct TaggingTranslator;

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate_batch(
            &self,
            texts: &[String],
            target: Language,
        ) -> Result<Vec<String>, AppError> {
            Ok(texts
                .iter()
                .map(|t| match target {
                    Language::En => t.strip_prefix("[uk] ").unwrap_or(t).to_string(),
                    Language::Uk => format!("[uk] {t}"),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_translate_there_and_back_keeps_counts() {
        let menus = parse_completion::<MenuList>(MenuList::SHAPE).unwrap();

        let ukrainian = translate_menus(&TaggingTranslator, &menus, Language::Uk)
            .await
            .unwrap();
        assert_ne!(ukrainian, menus);

        let english = translate_menus(&TaggingTranslator, &ukrainian, Language::En)
            .await
            .unwrap();

        assert_eq!(english.menus.len(), menus.menus.len());
        assert_eq!(english.meal_count(), menus.meal_count());
        assert_eq!(english.dish_count(), menus.dish_count());
        assert_eq!(english, menus);
    }

    #[tokio::test]
    async fn test_llm_translator_chunks_large_batches() {
        let texts: Vec<String> = (0..61).map(|i| format!("text {i}")).collect();
        let first: Vec<String> = texts[..60].iter().map(|t| t.to_uppercase()).collect();
        let model = Arc::new(ScriptedModel::new(vec![
            serde_json::json!({ "translations": first }).to_string(),
            r#"{"translations": ["TEXT 60"]}"#.to_string(),
        ]));

        let translator = LlmTranslator::new(model.clone());
        let out = translator
            .translate_batch(&texts, Language::Uk)
            .await
            .unwrap();

        assert_eq!(out.len(), 61);
        assert_eq!(out[60], "TEXT 60");
        assert_eq!(model.calls(), 2);
        assert!(model.prompts()[0].contains("into Ukrainian"));
        assert!(model.prompts()[0].contains("exactly 60 strings"));
    }

    #[tokio::test]
    async fn test_llm_translator_rejects_length_mismatch() {
        let model = Arc::new(ScriptedModel::new(vec![r#"{"translations": ["one"]}"#]));
        let translator = LlmTranslator::new(model);
        let texts = vec!["a".to_string(), "b".to_string()];
        let err = translator
            .translate_batch(&texts, Language::Uk)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedOutput(_)));
    }
}
