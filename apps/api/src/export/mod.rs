//! PDF export of a single daily menu.
//!
//! Layout is computed by `layout::layout_menu`; this module only draws the placed
//! lines with `printpdf`. The builtin Helvetica faces cover Latin-1 only, so a
//! TrueType font (`EXPORT_FONT_PATH`) is needed for Ukrainian output.

pub mod font_metrics;
pub mod handlers;
pub mod layout;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tracing::debug;

use crate::errors::AppError;
use crate::models::menu::DailyMenu;
use font_metrics::FontFace;
use layout::{layout_menu, DocumentHeader, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

pub const DEFAULT_FILENAME: &str = "diet_plan.pdf";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub diet_name: Option<String>,
    pub generated_on: NaiveDate,
    /// TrueType font used for every line. Builtin Helvetica when absent.
    pub font_path: Option<PathBuf>,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Builtin fonts cannot encode characters beyond Latin-1.
    latin1_only: bool,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<Self, AppError> {
        match font_path {
            Some(path) => {
                let file = File::open(path).map_err(|e| {
                    AppError::Export(format!("cannot open font {}: {e}", path.display()))
                })?;
                let font = doc
                    .add_external_font(BufReader::new(file))
                    .map_err(|e| AppError::Export(format!("cannot load font: {e}")))?;
                Ok(Self {
                    regular: font.clone(),
                    bold: font,
                    latin1_only: false,
                })
            }
            None => Ok(Self {
                regular: doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| AppError::Export(e.to_string()))?,
                bold: doc
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|e| AppError::Export(e.to_string()))?,
                latin1_only: true,
            }),
        }
    }

    fn face(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

/// Renders `menu` as an A4 PDF document.
pub fn render_menu_pdf(menu: &DailyMenu, options: &ExportOptions) -> Result<Vec<u8>, AppError> {
    let header = DocumentHeader {
        diet_name: options.diet_name.as_deref(),
        generated_on: options.generated_on,
    };
    let pages = layout_menu(menu, &header);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Diet Plan",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc, options.font_path.as_deref())?;

    for (i, lines) in pages.iter().enumerate() {
        let (page, layer) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);

        for line in lines {
            let text = if fonts.latin1_only {
                latin1_lossy(&line.text)
            } else {
                line.text.clone()
            };
            layer.use_text(
                text,
                line.size_pt,
                Mm(line.x_mm),
                Mm(line.y_mm),
                fonts.face(line.face),
            );
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| AppError::Export(format!("cannot serialize PDF: {e}")))?;

    debug!("Rendered {} pages, {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}

/// Replaces characters the builtin fonts cannot encode with `?`.
fn latin1_lossy(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

/// Reduces a client-supplied filename to a safe `*.pdf` basename.
/// Falls back to `DEFAULT_FILENAME` when nothing usable remains.
pub fn sanitize_filename(requested: Option<&str>) -> String {
    let base = requested
        .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name))
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if cleaned.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned.to_string()
    } else {
        format!("{cleaned}.pdf")
    }
}
