// Shared prompt constants and the named-slot template used by every stage.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

use std::sync::OnceLock;

use handlebars::Handlebars;
use serde_json::{Map, Value};
use thiserror::Error;

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Repair pass prompt. Sent once when a completion fails schema validation.
pub const REPAIR_PROMPT: PromptTemplate = PromptTemplate::new(
    "repair",
    r#"The following output was supposed to be a JSON value matching this schema:

{{schema}}

It failed validation with this error:
{{error}}

Malformed output:
{{completion}}

Return ONLY the corrected JSON value. Keep every piece of information that is present in the output, fix the structure and types so that it matches the schema exactly, and do not add commentary."#,
);

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{template}' failed to render: {reason}")]
    Render {
        template: &'static str,
        reason: String,
    },
}

/// A prompt with `{{named}}` slots, rendered through handlebars in strict mode.
///
/// Values are inserted verbatim (no HTML escaping) and never re-expanded.
/// A slot without a value is an error.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    name: &'static str,
    text: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let data: Map<String, Value> = values
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();

        registry()
            .render_template(self.text, &data)
            .map_err(|e| TemplateError::Render {
                template: self.name,
                reason: e.to_string(),
            })
    }
}

fn registry() -> &'static Handlebars<'static> {
    static REGISTRY: OnceLock<Handlebars<'static>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
    })
}
