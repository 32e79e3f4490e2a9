//! Pure pagination of a daily menu into positioned text lines.
//!
//! Coordinates are millimetres from the bottom-left corner of an A4 page, the
//! same origin the PDF writer uses. Nothing here touches the PDF library, so the
//! page-break logic is testable on its own.

use chrono::NaiveDate;

use super::font_metrics::{get_metrics, FontFace};
use crate::models::menu::DailyMenu;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;

const PT_TO_MM: f32 = 25.4 / 72.0;
const LINE_SPACING: f32 = 1.3;

const TITLE_PT: f32 = 18.0;
const HEADING_PT: f32 = 14.0;
const SUBHEADING_PT: f32 = 11.5;
const BODY_PT: f32 = 10.0;

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub face: FontFace,
    pub size_pt: f32,
    pub x_mm: f32,
    pub y_mm: f32,
}

/// Lines grouped by page, in reading order.
pub type PagedLines = Vec<Vec<PlacedLine>>;

/// Document-level text that is not part of the menu itself.
#[derive(Debug, Clone)]
pub struct DocumentHeader<'a> {
    pub diet_name: Option<&'a str>,
    pub generated_on: NaiveDate,
}

struct Cursor {
    pages: PagedLines,
    y_mm: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn text_width_pt() -> f32 {
        (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / PT_TO_MM
    }

    /// Word-wraps `text` and places each line, breaking pages at the bottom margin.
    fn paragraph(&mut self, text: &str, face: FontFace, size_pt: f32) {
        let line_height = size_pt * LINE_SPACING * PT_TO_MM;
        for line in get_metrics(face).wrap(text, size_pt, Self::text_width_pt()) {
            if self.y_mm - line_height < MARGIN_MM {
                self.pages.push(Vec::new());
                self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            self.y_mm -= line_height;
            if let Some(page) = self.pages.last_mut() {
                page.push(PlacedLine {
                    text: line,
                    face,
                    size_pt,
                    x_mm: MARGIN_MM,
                    y_mm: self.y_mm,
                });
            }
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y_mm -= mm;
    }
}

pub fn layout_menu(menu: &DailyMenu, header: &DocumentHeader<'_>) -> PagedLines {
    let mut cursor = Cursor::new();
    let currency = menu.currency.as_str();

    cursor.paragraph("Diet Plan", FontFace::Bold, TITLE_PT);
    if let Some(name) = header.diet_name.filter(|n| !n.trim().is_empty()) {
        cursor.paragraph(name, FontFace::Bold, SUBHEADING_PT);
    }
    cursor.paragraph(
        &format!("Generated: {}", header.generated_on.format("%Y-%m-%d")),
        FontFace::Regular,
        BODY_PT,
    );
    cursor.gap(2.0);
    cursor.paragraph(
        &format!("Total Price: {} {currency}", menu.total_price),
        FontFace::Bold,
        SUBHEADING_PT,
    );
    cursor.gap(4.0);

    for meal in &menu.meals {
        let heading = if meal.description.trim().is_empty() {
            format!("Meal {}", meal.meal_number)
        } else {
            format!("Meal {}: {}", meal.meal_number, meal.description)
        };
        cursor.paragraph(&heading, FontFace::Bold, HEADING_PT);
        cursor.gap(1.5);

        for dish in &meal.dishes {
            cursor.paragraph(&format!("Dish: {}", dish.name), FontFace::Bold, BODY_PT);
            if !dish.ingredients.is_empty() {
                cursor.paragraph(
                    &format!("Ingredients: {}", dish.ingredients.join(", ")),
                    FontFace::Regular,
                    BODY_PT,
                );
            }
            if !dish.cooking_instructions.trim().is_empty() {
                cursor.paragraph(
                    &format!("Cooking Instructions: {}", dish.cooking_instructions),
                    FontFace::Regular,
                    BODY_PT,
                );
            }
            cursor.paragraph(
                &format!("Price: {} {currency}", dish.price),
                FontFace::Regular,
                BODY_PT,
            );
            cursor.gap(1.5);
        }

        cursor.paragraph(
            &format!("Total Price: {} {currency}", meal.total_price),
            FontFace::Bold,
            BODY_PT,
        );
        cursor.gap(4.0);
    }

    cursor.pages
}
