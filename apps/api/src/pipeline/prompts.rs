// All LLM prompt templates for the menu pipeline.
// Reuses the shared template type and JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::PromptTemplate;

/// System prompt for profile extraction.
pub const EXTRACT_SYSTEM: &str = "You are a specialist in processing requests from people who \
    describe themselves in order to be assigned a therapeutic diet. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Stage 1. Slots: schema, user_message
pub const EXTRACT_PROMPT: PromptTemplate = PromptTemplate::new(
    "extract",
    r#"Some user messages are incorrect or contain false information, so first check whether the message is an adequate description of: the user's health problems, allergies, food intolerances, wishes, foods to exclude, foods to add, diet type, calorie target, number of meals per day and other restrictions.

The message is INADEQUATE if it contains many grammatical, lexical or semantic errors, errors in medical terms, non-existent medical terms, invented made-up diseases, or humorous diseases. For an inadequate message set EVERY field to null.

If the message is adequate, extract the relevant information. Use null for anything the message does not mention and [] for empty food lists. Lists contain plain food names, one per item, always written in English even when the message is in another language. Write health_info in English as well.

Return a JSON object with this EXACT schema (no extra fields):
{{schema}}

User message: '{{user_message}}'"#,
);

/// System prompt for indication classification.
pub const CLASSIFY_SYSTEM: &str = "You are a specialist in matching a person's health \
    information to available medical indications for therapeutic diets. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Stage 2. Slots: schema, indications, health_info, no_match_index
pub const CLASSIFY_PROMPT: PromptTemplate = PromptTemplate::new(
    "classify",
    r#"List of medical indications (index: indications):
{{indications}}

User health information: '{{health_info}}'

Write the index of the diet whose indications best describe and correspond to the user's health information. Some lines are similar; choose the one that is closest in meaning. Close but not word-for-word phrasing is a match. If nothing in the list reasonably matches, return indication_index {{no_match_index}}. Never return null.

Return a JSON object with this EXACT schema (no extra fields):
{{schema}}"#,
);

/// System prompt for menu generation.
pub const MENU_SYSTEM: &str = "You are a dietary cook. Your work is very important, so do it \
    responsibly and carefully: do not invent non-existent dishes and follow the dietary \
    recommendations exactly. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Stage 3. Slots: diet_json, diet_name, menu_options, meals_per_menu,
/// country, currency, conditions, schema
pub const MENU_PROMPT: PromptTemplate = PromptTemplate::new(
    "menu",
    r#"Diet:
{{diet_json}}

Taking into account the dietary recommendations of '{{diet_name}}', create a list of {{menu_options}} balanced daily menu options. Each daily menu must consist of exactly {{meals_per_menu}} meals, numbered from 1. The user is located in {{country}}; give realistic prices for every dish in {{currency}}. Each meal's total_price is the sum of its dish prices and each menu's total_price is the sum of its meal totals.
{{conditions}}
Return a JSON object with this EXACT schema (no extra fields), containing {{menu_options}} menus:
{{schema}}"#,
);

/// Slots: allergies, intolerances
pub const ALLERGY_CONDITION: PromptTemplate = PromptTemplate::new(
    "allergy_condition",
    "No dish may contain products that can cause the user's allergies: '{{allergies}}' or intolerances: '{{intolerances}}'. Do not list them among the ingredients.",
);

/// Slots: exclude
pub const EXCLUDE_CONDITION: PromptTemplate = PromptTemplate::new(
    "exclude_condition",
    "As an additional condition from the client, the menu must not contain products such as: {{exclude}}.",
);

/// Slots: add
pub const ADD_CONDITION: PromptTemplate = PromptTemplate::new(
    "add_condition",
    "Be sure to include products such as: {{add}}, as long as the diet allows them.",
);

/// Slots: calorie_target
pub const CALORIE_CONDITION: PromptTemplate = PromptTemplate::new(
    "calorie_condition",
    "Each daily menu should provide approximately {{calorie_target}} kcal.",
);

/// Slots: diet_type
pub const DIET_TYPE_CONDITION: PromptTemplate = PromptTemplate::new(
    "diet_type_condition",
    "The user follows this type of diet: {{diet_type}}.",
);

/// Slots: other_restrictions
pub const OTHER_RESTRICTIONS_CONDITION: PromptTemplate = PromptTemplate::new(
    "other_restrictions_condition",
    "Also respect these restrictions: {{other_restrictions}}.",
);
