use serde::{Deserialize, Serialize};

use crate::llm_client::structured::Schema;

/// Reserved classification index meaning "no catalog entry matches".
/// The catalog is validated to hold fewer entries than this.
pub const NO_MATCH_INDEX: i64 = 99;

/// Classification result: which catalog entry best fits the user's health description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicationMatch {
    pub indication_index: i64,
    #[serde(default)]
    pub explanation: String,
}

/// Interpreted form of `IndicationMatch::indication_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum IndicationChoice {
    Catalog(usize),
    NoMatch,
}

impl IndicationMatch {
    /// Bounds-checks the raw index against a catalog of `catalog_len` entries.
    /// Anything that is not a valid position (including the sentinel) is `NoMatch`.
    pub fn choice(&self, catalog_len: usize) -> IndicationChoice {
        match usize::try_from(self.indication_index) {
            Ok(i) if i < catalog_len && self.indication_index != NO_MATCH_INDEX => {
                IndicationChoice::Catalog(i)
            }
            _ => IndicationChoice::NoMatch,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.indication_index == NO_MATCH_INDEX
    }
}

impl Schema for IndicationMatch {
    const SHAPE: &'static str = r#"{
  "indication_index": 3,
  "explanation": "The user describes chronic gastritis, which matches entry 3 most closely."
}"#;
}
