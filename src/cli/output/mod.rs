pub mod analysis;

use ansi_term::Colour;

use crate::store::entities::CategoryDef;

/// `135` minutes becomes `2h 15m`.
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Paints a category name with its palette color when the palette defines
/// one; unknown categories print plain.
pub fn paint_category(name: &str, palette: &[CategoryDef]) -> String {
    palette
        .iter()
        .find(|c| c.name == name)
        .and_then(|c| c.rgb())
        .map(|(r, g, b)| Colour::RGB(r, g, b).paint(name).to_string())
        .unwrap_or_else(|| name.to_string())
}
