use serde::{Deserialize, Serialize};

/// One therapeutic diet from the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietProfile {
    pub diet_name: String,
    /// Conditions this diet is prescribed for. Used only for classification.
    pub indications: String,
    pub purpose: String,
    pub eating_regime: String,
    /// Recommended and allowed foods, plus foods to avoid.
    pub recommendations: String,
}
