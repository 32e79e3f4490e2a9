use serde::{Deserialize, Serialize};

/// Response language selected by the caller. Menus are always generated in
/// English; any other language is produced by the translation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "english", alias = "English")]
    En,
    #[serde(alias = "ukrainian", alias = "Ukrainian")]
    Uk,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
        }
    }

    /// English name, used inside translation prompts.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Uk => "Ukrainian",
        }
    }

    pub fn needs_translation(&self) -> bool {
        *self != Language::En
    }
}
