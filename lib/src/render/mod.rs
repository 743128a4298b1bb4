//! SVG output for the presenters, drawn with `plotters`.

use plotters::style::RGBColor;

mod bars;
mod scatter;
mod table;
mod trend;

pub use bars::ranking_bars;
pub use scatter::scatter_plot;
pub use table::ranking_table;
pub use trend::trend_lines;

const GRAY: RGBColor = RGBColor(0x99, 0x99, 0x99);

/// Parses `#RRGGBB`
pub fn hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(hex.get(at..at + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

pub(crate) fn color_or_gray(hex: &str) -> RGBColor {
    hex_color(hex).unwrap_or(GRAY)
}

/// File-name friendly form of a label, e.g. `HSR Distance` -> `hsr_distance`
pub fn slug(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Axis bounds with a little headroom on both sides
pub(crate) fn padded(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.08 } else { max.abs().max(1.0) * 0.1 };
    (min - pad, max + pad)
}
