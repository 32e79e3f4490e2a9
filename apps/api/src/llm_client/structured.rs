//! Structured calls: prompt → completion → typed record, with one repair pass.
//!
//! ```text
//! call ──parse ok──────────────────────────────▶ PARSED (repaired = false)
//!   │
//!   └─parse failed─▶ REPAIRING ──parse ok──────▶ PARSED (repaired = true)
//!                        │
//!                        └─parse failed────────▶ AppError::MalformedOutput
//! ```
//!
//! Transport errors are never repaired; they propagate from whichever call fails.

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, REPAIR_PROMPT};
use crate::llm_client::{strip_json_fences, LanguageModel};

/// A record the model is asked to produce.
pub trait Schema: DeserializeOwned {
    /// Example JSON shape embedded in prompts and in the repair instruction.
    const SHAPE: &'static str;

    /// Semantic checks run after deserialization. A failure counts as a parse failure.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A successfully parsed record and whether it needed the repair pass.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub repaired: bool,
}

/// Deserializes and validates a raw completion.
pub fn parse_completion<T: Schema>(completion: &str) -> Result<T, String> {
    let value: T = serde_json::from_str(strip_json_fences(completion)).map_err(|e| e.to_string())?;
    value.validate()?;
    Ok(value)
}

/// Sends `prompt`, parses the completion as `T`, and on failure runs a single repair pass.
pub async fn call_structured<T: Schema>(
    model: &dyn LanguageModel,
    stage: &str,
    prompt: &str,
    system: &str,
) -> Result<Parsed<T>, AppError> {
    let completion = model.complete(prompt, system).await?;

    let first_error = match parse_completion::<T>(&completion) {
        Ok(value) => {
            return Ok(Parsed {
                value,
                repaired: false,
            })
        }
        Err(e) => e,
    };

    warn!(
        "{} output failed schema validation ({}), running repair pass on {}",
        stage,
        first_error,
        model.model_id()
    );

    let repair_prompt = REPAIR_PROMPT
        .render(&[
            ("schema", T::SHAPE),
            ("error", &first_error),
            ("completion", &completion),
        ])?;

    let repaired = model.complete(&repair_prompt, JSON_ONLY_SYSTEM).await?;

    match parse_completion::<T>(&repaired) {
        Ok(value) => {
            info!("{} output repaired", stage);
            Ok(Parsed {
                value,
                repaired: true,
            })
        }
        Err(second_error) => Err(AppError::MalformedOutput(format!(
            "{stage}: {second_error} (first attempt: {first_error})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::LlmError;

    #[derive(Debug, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Schema for Point {
        const SHAPE: &'static str = r#"{"x": 1, "y": 2}"#;

        fn validate(&self) -> Result<(), String> {
            if self.x < 0 {
                return Err("x must be non-negative".to_string());
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_valid_completion_needs_no_repair() {
        let model = ScriptedModel::new(vec![r#"{"x": 1, "y": 2}"#]);
        let parsed: Parsed<Point> = call_structured(&model, "test", "p", "s").await.unwrap();
        assert!(!parsed.repaired);
        assert_eq!((parsed.value.x, parsed.value.y), (1, 2));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_completion_parses() {
        let model = ScriptedModel::new(vec!["```json\n{\"x\": 3, \"y\": 4}\n```"]);
        let parsed: Parsed<Point> = call_structured(&model, "test", "p", "s").await.unwrap();
        assert_eq!(parsed.value.y, 4);
    }

    #[tokio::test]
    async fn test_malformed_completion_is_repaired_once() {
        let model = ScriptedModel::new(vec![r#"{"x": 1, "y": "#, r#"{"x": 1, "y": 5}"#]);
        let parsed: Parsed<Point> = call_structured(&model, "test", "p", "s").await.unwrap();
        assert!(parsed.repaired);
        assert_eq!(parsed.value.y, 5);
        assert_eq!(model.calls(), 2);

        let repair_prompt = &model.prompts()[1];
        assert!(repair_prompt.contains(r#"{"x": 1, "y": "#));
        assert!(repair_prompt.contains(Point::SHAPE));
    }

    #[tokio::test]
    async fn test_validation_failure_triggers_repair() {
        let model = ScriptedModel::new(vec![r#"{"x": -1, "y": 0}"#, r#"{"x": 1, "y": 0}"#]);
        let parsed: Parsed<Point> = call_structured(&model, "test", "p", "s").await.unwrap();
        assert!(parsed.repaired);
        assert!(model.prompts()[1].contains("x must be non-negative"));
    }

    #[tokio::test]
    async fn test_second_failure_is_terminal_without_third_call() {
        let model = ScriptedModel::new(vec!["not json", "still not json", r#"{"x": 1, "y": 1}"#]);
        let result: Result<Parsed<Point>, _> = call_structured(&model, "test", "p", "s").await;
        assert!(matches!(result, Err(AppError::MalformedOutput(_))));
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_repaired() {
        let model = ScriptedModel::from_results(vec![Err(LlmError::Unauthorized(
            "bad key".to_string(),
        ))]);
        let result: Result<Parsed<Point>, _> = call_structured(&model, "test", "p", "s").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(model.calls(), 1);
    }
}
