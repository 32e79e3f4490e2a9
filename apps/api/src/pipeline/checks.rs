//! Post-generation checks applied to every `MenuList` before it leaves the pipeline.
//!
//! The model is asked to respect exclusions and to sum its prices, but neither is
//! guaranteed. These checks make both hold and report every correction.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::menu::{Dish, MenuList, MEALS_PER_MENU, MENU_OPTIONS};
use crate::models::profile::UserProfile;

/// A correction or anomaly found after generation. Returned to the client with the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuWarning {
    /// A dish mentioned a forbidden food and was removed.
    ExcludedDish {
        menu: usize,
        meal_number: u32,
        dish: String,
        term: String,
    },
    /// A meal lost every dish to exclusion enforcement.
    EmptyMeal { menu: usize, meal_number: u32 },
    /// A total disagreed with the sum of its parts. `meal_number` is absent for menu totals.
    TotalCorrected {
        menu: usize,
        meal_number: Option<u32>,
        reported: Decimal,
        computed: Decimal,
    },
    MenuCount { expected: usize, actual: usize },
    MealCount {
        menu: usize,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for MenuWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuWarning::ExcludedDish {
                menu,
                meal_number,
                dish,
                term,
            } => write!(
                f,
                "menu {menu}, meal {meal_number}: removed '{dish}' (mentions '{term}')"
            ),
            MenuWarning::EmptyMeal { menu, meal_number } => {
                write!(f, "menu {menu}, meal {meal_number}: no dishes left")
            }
            MenuWarning::TotalCorrected {
                menu,
                meal_number: Some(n),
                reported,
                computed,
            } => write!(
                f,
                "menu {menu}, meal {n}: total {reported} corrected to {computed}"
            ),
            MenuWarning::TotalCorrected {
                menu,
                meal_number: None,
                reported,
                computed,
            } => write!(f, "menu {menu}: total {reported} corrected to {computed}"),
            MenuWarning::MenuCount { expected, actual } => {
                write!(f, "expected {expected} menus, got {actual}")
            }
            MenuWarning::MealCount {
                menu,
                expected,
                actual,
            } => write!(f, "menu {menu}: expected {expected} meals, got {actual}"),
        }
    }
}

/// Runs every check in order: shape, exclusions, then totals.
pub fn run_checks(list: &mut MenuList, profile: &UserProfile) -> Vec<MenuWarning> {
    let forbidden: Vec<&str> = profile.forbidden_foods().collect();

    let mut warnings = check_shape(list);
    warnings.extend(enforce_exclusions(list, &forbidden));
    warnings.extend(recompute_totals(list));

    for warning in &warnings {
        warn!("Menu check: {warning}");
    }
    warnings
}

pub fn check_shape(list: &MenuList) -> Vec<MenuWarning> {
    let mut warnings = Vec::new();
    if list.menus.len() != MENU_OPTIONS {
        warnings.push(MenuWarning::MenuCount {
            expected: MENU_OPTIONS,
            actual: list.menus.len(),
        });
    }
    for (i, menu) in list.menus.iter().enumerate() {
        if menu.meals.len() != MEALS_PER_MENU {
            warnings.push(MenuWarning::MealCount {
                menu: i + 1,
                expected: MEALS_PER_MENU,
                actual: menu.meals.len(),
            });
        }
    }
    warnings
}

/// Removes every dish whose name or ingredients mention a forbidden term.
pub fn enforce_exclusions(list: &mut MenuList, forbidden: &[&str]) -> Vec<MenuWarning> {
    let terms: Vec<(&str, Vec<String>)> = forbidden
        .iter()
        .map(|t| (*t, normalize_words(t)))
        .filter(|(_, words)| !words.is_empty())
        .collect();

    let mut warnings = Vec::new();
    if terms.is_empty() {
        return warnings;
    }

    for (i, menu) in list.menus.iter_mut().enumerate() {
        for meal in &mut menu.meals {
            let before = meal.dishes.len();
            meal.dishes.retain(|dish| match offending_term(dish, &terms) {
                Some(term) => {
                    warnings.push(MenuWarning::ExcludedDish {
                        menu: i + 1,
                        meal_number: meal.meal_number,
                        dish: dish.name.clone(),
                        term: term.to_string(),
                    });
                    false
                }
                None => true,
            });
            if before > 0 && meal.dishes.is_empty() {
                warnings.push(MenuWarning::EmptyMeal {
                    menu: i + 1,
                    meal_number: meal.meal_number,
                });
            }
        }
    }
    warnings
}

fn offending_term<'a>(dish: &Dish, terms: &[(&'a str, Vec<String>)]) -> Option<&'a str> {
    let fields =
        std::iter::once(dish.name.as_str()).chain(dish.ingredients.iter().map(String::as_str));
    for field in fields {
        let words = normalize_words(field);
        if let Some((term, _)) = terms.iter().find(|(_, t)| mentions(&words, t)) {
            return Some(*term);
        }
    }
    None
}

/// True if `term` occurs as a run of consecutive words, each matching by prefix.
fn mentions(words: &[String], term: &[String]) -> bool {
    if term.len() > words.len() {
        return false;
    }
    words
        .windows(term.len())
        .any(|window| window.iter().zip(term).all(|(w, t)| w.starts_with(t.as_str())))
}

fn normalize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| singularize(&w.to_lowercase()))
        .collect()
}

/// Reduces a word to a comparison key: regular plurals lose their ending
/// and a trailing "ie" becomes "y", so "cookies" and "cookie" agree.
fn singularize(word: &str) -> String {
    if word.chars().count() <= 3 {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies").filter(|s| s.chars().count() > 1) {
        return format!("{stem}y");
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["ch", "sh", "ss", "x", "to"].iter().any(|end| stem.ends_with(end)) {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("ie") {
        return format!("{stem}y");
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

/// Recomputes meal and menu totals and `meals_number`.
/// Differences above one hundredth are reported.
pub fn recompute_totals(list: &mut MenuList) -> Vec<MenuWarning> {
    let tolerance = Decimal::new(1, 2);
    let mut warnings = Vec::new();

    for (i, menu) in list.menus.iter_mut().enumerate() {
        for meal in &mut menu.meals {
            let computed = meal.dish_total();
            if (computed - meal.total_price).abs() > tolerance {
                warnings.push(MenuWarning::TotalCorrected {
                    menu: i + 1,
                    meal_number: Some(meal.meal_number),
                    reported: meal.total_price,
                    computed,
                });
            }
            meal.total_price = computed;
        }

        let computed = menu.meal_total();
        if (computed - menu.total_price).abs() > tolerance {
            warnings.push(MenuWarning::TotalCorrected {
                menu: i + 1,
                meal_number: None,
                reported: menu.total_price,
                computed,
            });
        }
        menu.total_price = computed;
        menu.meals_number = u32::try_from(menu.meals.len()).ok();
    }
    warnings
}
