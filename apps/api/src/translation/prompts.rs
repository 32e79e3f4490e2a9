// Prompt templates for batch translation of menu text.

use crate::llm_client::prompts::PromptTemplate;

pub const TRANSLATE_SYSTEM: &str = "You are a professional translator of culinary and \
    medical texts. You translate faithfully and never add, drop or merge items. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Slots: language, count, texts, schema
pub const TRANSLATE_PROMPT: PromptTemplate = PromptTemplate::new(
    "translate",
    r#"Translate each string in the following JSON array into {{language}}.
Dish names must stay recognisable as real dishes; keep quantities and units as they are.

{{texts}}

Return a JSON object with this EXACT schema (no extra fields). The "translations" array must contain exactly {{count}} strings, in the same order as the input:
{{schema}}"#,
);
