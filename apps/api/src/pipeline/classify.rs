//! Stage 2: picks the catalog entry whose indications best match the user's health description.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::structured::{call_structured, Parsed, Schema};
use crate::llm_client::LanguageModel;
use crate::models::indication::{IndicationMatch, NO_MATCH_INDEX};
use crate::pipeline::prompts::{CLASSIFY_PROMPT, CLASSIFY_SYSTEM};

/// Runs the classification stage against `(index, indications)` rows.
/// The rows are expected to end with the `NO_MATCH_INDEX` sentinel row.
pub async fn classify_indication(
    model: &dyn LanguageModel,
    health_info: &str,
    indications: &[(i64, &str)],
) -> Result<Parsed<IndicationMatch>, AppError> {
    let prompt = CLASSIFY_PROMPT.render(&[
        ("indications", &format_indications(indications)),
        ("health_info", health_info),
        ("no_match_index", &NO_MATCH_INDEX.to_string()),
        ("schema", IndicationMatch::SHAPE),
    ])?;

    let parsed =
        call_structured::<IndicationMatch>(model, "classify", &prompt, CLASSIFY_SYSTEM).await?;

    info!(
        "Indication classified: index={} ({})",
        parsed.value.indication_index, parsed.value.explanation
    );

    Ok(parsed)
}

fn format_indications(indications: &[(i64, &str)]) -> String {
    indications
        .iter()
        .map(|(index, text)| format!("{index}: {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DietCatalog;
    use crate::llm_client::testing::ScriptedModel;

    #[test]
    fn test_format_indications_one_row_per_line() {
        let rows = [(0, "gastritis"), (1, "diabetes"), (NO_MATCH_INDEX, "none")];
        assert_eq!(
            format_indications(&rows),
            "0: gastritis\n1: diabetes\n99: none"
        );
    }

    #[tokio::test]
    async fn test_classification_prompt_lists_catalog_and_sentinel() {
        let catalog = DietCatalog::embedded().unwrap();
        let rows = catalog.indication_list();
        let model = ScriptedModel::new(vec![
            r#"{"indication_index": 0, "explanation": "esophagitis and gastritis are listed"}"#,
        ]);

        let matched = classify_indication(&model, "esophagitis, gastritis", &rows)
            .await
            .unwrap();
        assert_eq!(matched.value.indication_index, 0);
        assert!(!matched.repaired);

        let prompt = &model.prompts()[0];
        assert!(prompt.contains("0: Peptic ulcer"));
        assert!(prompt.contains("99: If it doesn't exactly match any other."));
        assert!(prompt.contains("'esophagitis, gastritis'"));
        assert!(prompt.contains("return indication_index 99"));
    }

    #[tokio::test]
    async fn test_null_index_goes_through_repair() {
        let model = ScriptedModel::new(vec![
            r#"{"indication_index": null, "explanation": "no match"}"#,
            r#"{"indication_index": 99, "explanation": "no match"}"#,
        ]);
        let matched = classify_indication(&model, "sunburn", &[(0, "gout"), (99, "none")])
            .await
            .unwrap();
        assert!(matched.value.is_sentinel());
        assert!(matched.repaired);
        assert_eq!(model.calls(), 2);
    }
}
