//! Diet catalog: the static, bilingual list of therapeutic diets.
//!
//! Loaded once at startup (embedded JSON, or `DIET_CATALOG_PATH`) and shared
//! read-only. Both language lists describe the same diets in the same order,
//! so an index from classification is valid in either language.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::diet::DietProfile;
use crate::models::indication::NO_MATCH_INDEX;
use crate::models::language::Language;

pub mod handlers;
pub mod resolver;

const EMBEDDED_CATALOG: &str = include_str!("../../data/diets.json");

/// Description attached to the sentinel row of the indication list.
pub const NO_MATCH_DESCRIPTION: &str = "If it doesn't exactly match any other.";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read diet catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse diet catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("diet catalog is empty")]
    Empty,

    #[error("diet catalog language lists differ in length (en={en}, uk={uk})")]
    LengthMismatch { en: usize, uk: usize },

    #[error("diet catalog has {0} entries; indices must stay below the no-match index 99")]
    TooLarge(usize),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DietCatalog {
    en: Vec<DietProfile>,
    uk: Vec<DietProfile>,
}

impl DietCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Reads the catalog from `path`, or falls back to the embedded one.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?),
            None => Self::embedded(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: DietCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.en.is_empty() {
            return Err(CatalogError::Empty);
        }
        if self.en.len() != self.uk.len() {
            return Err(CatalogError::LengthMismatch {
                en: self.en.len(),
                uk: self.uk.len(),
            });
        }
        if self.en.len() as i64 >= NO_MATCH_INDEX {
            return Err(CatalogError::TooLarge(self.en.len()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.en.len()
    }

    pub fn entries(&self, language: Language) -> &[DietProfile] {
        match language {
            Language::En => &self.en,
            Language::Uk => &self.uk,
        }
    }

    pub fn get(&self, index: usize, language: Language) -> Option<&DietProfile> {
        self.entries(language).get(index)
    }

    /// `(index, indications)` rows for classification, English, terminated by the
    /// no-match sentinel row.
    pub fn indication_list(&self) -> Vec<(i64, &str)> {
        self.en
            .iter()
            .enumerate()
            .map(|(i, diet)| (i as i64, diet.indications.as_str()))
            .chain(std::iter::once((NO_MATCH_INDEX, NO_MATCH_DESCRIPTION)))
            .collect()
    }
}
