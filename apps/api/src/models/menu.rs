//! Menu records produced by the generation stage.
//!
//! Totals arrive from the model and are NOT trusted: `pipeline::checks`
//! recomputes them from dish prices before anything is returned.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::llm_client::structured::Schema;

/// Number of candidate menus requested per generation.
pub const MENU_OPTIONS: usize = 3;
/// Number of meals in each candidate menu.
pub const MEALS_PER_MENU: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub cooking_instructions: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_number: u32,
    #[serde(default)]
    pub description: String,
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub total_price: Decimal,
}

impl Meal {
    pub fn dish_total(&self) -> Decimal {
        self.dishes.iter().map(|d| d.price).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMenu {
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub meals_number: Option<u32>,
    #[serde(default)]
    pub total_price: Decimal,
    pub currency: String,
}

impl DailyMenu {
    pub fn meal_total(&self) -> Decimal {
        self.meals.iter().map(|m| m.total_price).sum()
    }

    pub fn dishes(&self) -> impl Iterator<Item = &Dish> {
        self.meals.iter().flat_map(|m| m.dishes.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuList {
    pub menus: Vec<DailyMenu>,
}

impl MenuList {
    pub fn meal_count(&self) -> usize {
        self.menus.iter().map(|m| m.meals.len()).sum()
    }

    pub fn dish_count(&self) -> usize {
        self.menus.iter().map(|m| m.dishes().count()).sum()
    }
}

impl Schema for MenuList {
    const SHAPE: &'static str = r#"{
  "menus": [
    {
      "meals": [
        {
          "meal_number": 1,
          "description": "Breakfast",
          "dishes": [
            {
              "name": "Oatmeal with baked apple",
              "ingredients": ["rolled oats", "water", "apple", "honey"],
              "cooking_instructions": "Simmer the oats in water for 10 minutes, add the baked apple and honey.",
              "price": 35.0
            }
          ],
          "total_price": 35.0
        }
      ],
      "meals_number": 1,
      "total_price": 35.0,
      "currency": "UAH"
    }
  ]
}"#;

    fn validate(&self) -> Result<(), String> {
        if self.menus.is_empty() {
            return Err("menus must contain at least one daily menu".to_string());
        }
        for (m, menu) in self.menus.iter().enumerate() {
            if menu.meals.is_empty() {
                return Err(format!("menus[{m}].meals must not be empty"));
            }
            if menu.currency.trim().is_empty() {
                return Err(format!("menus[{m}].currency must not be empty"));
            }
            for (k, meal) in menu.meals.iter().enumerate() {
                if meal.dishes.is_empty() {
                    return Err(format!("menus[{m}].meals[{k}].dishes must not be empty"));
                }
                for (d, dish) in meal.dishes.iter().enumerate() {
                    if dish.name.trim().is_empty() {
                        return Err(format!("menus[{m}].meals[{k}].dishes[{d}].name is empty"));
                    }
                    if dish.price.is_sign_negative() && !dish.price.is_zero() {
                        return Err(format!(
                            "menus[{m}].meals[{k}].dishes[{d}].price must not be negative"
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
