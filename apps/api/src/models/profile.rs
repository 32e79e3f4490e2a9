//! User profile extracted from the free-text request.
//!
//! Models fill absent values in many ways (`null`, `"None"`, `""`, a comma list
//! where an array was asked for). Deserialization normalises all of them so the
//! rest of the pipeline sees one shape: `None` for absent text, an empty `Vec`
//! for absent lists.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::llm_client::structured::Schema;

/// Strings that mean "nothing here".
const NULL_MARKERS: &[&str] = &[
    "",
    "none",
    "null",
    "nil",
    "n/a",
    "na",
    "unknown",
    "not specified",
    "not mentioned",
    "not provided",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient_text")]
    pub health_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub allergies: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub intolerances: Vec<String>,
    /// Foods the user wants left out.
    #[serde(default, deserialize_with = "lenient_list")]
    pub exclude: Vec<String>,
    /// Foods the user wants included.
    #[serde(default, deserialize_with = "lenient_list")]
    pub add: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub calorie_target: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub diet_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub meals_per_day: Option<u8>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub other_restrictions: Option<String>,
}

impl UserProfile {
    /// Every food term the menu must not contain.
    pub fn forbidden_foods(&self) -> impl Iterator<Item = &str> {
        self.allergies
            .iter()
            .chain(&self.intolerances)
            .chain(&self.exclude)
            .map(String::as_str)
    }

    pub fn has_health_info(&self) -> bool {
        self.health_info.is_some()
    }
}

impl Schema for UserProfile {
    const SHAPE: &'static str = r#"{
  "health_info": "esophagitis, gastritis",
  "allergies": ["peanuts", "soy"],
  "intolerances": ["lactose"],
  "exclude": ["onions"],
  "add": ["apples"],
  "calorie_target": 1800,
  "diet_type": "vegetarian",
  "meals_per_day": 5,
  "other_restrictions": "no fried food"
}"#;
}

fn normalize_text(s: &str) -> Option<String> {
    let trimmed = s.trim().trim_matches(|c| c == '.' || c == '"' || c == '\'').trim();
    if NULL_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => normalize_text(&s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|v| v.as_str().and_then(normalize_text))
                .collect::<Vec<_>>()
                .join(", ");
            normalize_text(&joined)
        }
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s
            .split([',', ';'])
            .filter_map(normalize_text)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().and_then(normalize_text))
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_number<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
where
    D: Deserializer<'de>,
    N: TryFrom<u64>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let number = match raw {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f.round() as u64)),
        Some(Value::String(s)) => s
            .trim()
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| !part.is_empty())
            .and_then(|digits| digits.parse::<u64>().ok()),
        _ => None,
    };
    Ok(number
        .filter(|n| *n > 0)
        .and_then(|n| N::try_from(n).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile_deserializes() {
        let json = r#"{
            "health_info": "esophagitis and gastritis",
            "allergies": ["peanuts", "soy"],
            "intolerances": [],
            "exclude": ["onions"],
            "add": ["apples"],
            "calorie_target": 2000,
            "diet_type": null,
            "meals_per_day": 5,
            "other_restrictions": null
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(
            profile.health_info.as_deref(),
            Some("esophagitis and gastritis")
        );
        assert_eq!(profile.allergies, vec!["peanuts", "soy"]);
        assert!(profile.intolerances.is_empty());
        assert_eq!(profile.exclude, vec!["onions"]);
        assert_eq!(profile.add, vec!["apples"]);
        assert_eq!(profile.calorie_target, Some(2000));
        assert_eq!(profile.meals_per_day, Some(5));
        assert!(profile.diet_type.is_none());
    }

    #[test]
    fn test_none_strings_become_absent() {
        let json = r#"{
            "health_info": "None",
            "allergies": "None",
            "intolerances": "",
            "exclude": null,
            "add": "N/A"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.health_info.is_none());
        assert!(profile.allergies.is_empty());
        assert!(profile.intolerances.is_empty());
        assert!(profile.exclude.is_empty());
        assert!(profile.add.is_empty());
    }

    #[test]
    fn test_comma_separated_list_is_split() {
        let json = r#"{"health_info": "gastritis", "allergies": "peanuts, soy; tree nuts"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.allergies, vec!["peanuts", "soy", "tree nuts"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn test_numeric_fields_accept_strings() {
        let json = r#"{"calorie_target": "about 1800 kcal", "meals_per_day": "4"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.calorie_target, Some(1800));
        assert_eq!(profile.meals_per_day, Some(4));
    }

    #[test]
    fn test_out_of_range_meal_count_is_dropped() {
        let profile: UserProfile = serde_json::from_str(r#"{"meals_per_day": 900}"#).unwrap();
        assert!(profile.meals_per_day.is_none());
    }

    #[test]
    fn test_forbidden_foods_chains_all_lists() {
        let profile = UserProfile {
            allergies: vec!["peanuts".to_string()],
            intolerances: vec!["lactose".to_string()],
            exclude: vec!["onions".to_string()],
            ..Default::default()
        };
        let forbidden: Vec<&str> = profile.forbidden_foods().collect();
        assert_eq!(forbidden, vec!["peanuts", "lactose", "onions"]);
    }

    #[test]
    fn test_shape_is_a_valid_profile() {
        let profile: UserProfile = serde_json::from_str(UserProfile::SHAPE).unwrap();
        assert!(profile.has_health_info());
    }
}
