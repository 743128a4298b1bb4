use super::{color_or_gray, hex_color};
use crate::{config::DashboardConfig, ranking::Ranking, Error, Result};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;

const ROW_HEIGHT: i32 = 28;
const TOP: i32 = 70;
const LEFT: i32 = 30;
const VALUE_COLUMN: i32 = 430;
const WIDTH: u32 = 640;

/// Ranked table image: one line per team, the focal team in its own color
/// and bold.
pub fn ranking_table<P: AsRef<Path>>(
    ranking: &Ranking,
    config: &DashboardConfig,
    path: P,
) -> Result<()> {
    let n = ranking.entries.len() as i32;
    if n == 0 {
        return Err(Error::Empty(format!("{} has no rows", ranking.title())));
    }
    let height = (TOP + ROW_HEIGHT * (n + 1) + 30) as u32;
    let palette = &config.palette;
    let neutral = color_or_gray(&palette.neutral);
    let background = hex_color(&palette.background).unwrap_or(WHITE);

    let root = SVGBackend::new(path.as_ref(), (WIDTH, height)).into_drawing_area();
    root.fill(&background).map_err(Error::render)?;

    let regular = FontDesc::new(FontFamily::SansSerif, 15.0, FontStyle::Normal);
    let bold = FontDesc::new(FontFamily::SansSerif, 15.0, FontStyle::Bold);
    let title = FontDesc::new(FontFamily::SansSerif, 22.0, FontStyle::Bold);

    root.draw(&Text::new(ranking.title(), (LEFT, 22), title.color(&neutral)))
        .map_err(Error::render)?;

    let header_y = TOP;
    root.draw(&Text::new("Rank / Team", (LEFT, header_y), bold.color(&neutral)))
        .map_err(Error::render)?;
    root.draw(&Text::new(
        ranking.value_label(),
        (VALUE_COLUMN, header_y),
        bold.color(&neutral),
    ))
    .map_err(Error::render)?;

    let rule = |y: i32, style: ShapeStyle| {
        root.draw(&PathElement::new(vec![(LEFT - 10, y), (WIDTH as i32 - 20, y)], style))
            .map_err(Error::render)
    };
    rule(header_y + ROW_HEIGHT - 6, BLACK.stroke_width(2))?;

    let separator = RGBColor(0xBB, 0xBB, 0xBB);
    let dotted = |y: i32| -> Result<()> {
        for x in (LEFT - 10..WIDTH as i32 - 20).step_by(6) {
            root.draw(&Circle::new((x, y), 1, separator.filled()))
                .map_err(Error::render)?;
        }
        Ok(())
    };

    let focal_color = ranking
        .focal()
        .map(|e| config.team_color(&e.team).unwrap_or(&palette.focal_fallback))
        .map(color_or_gray)
        .unwrap_or(neutral);

    for (k, entry) in ranking.entries.iter().enumerate() {
        let y = header_y + ROW_HEIGHT * (k as i32 + 1);
        let (color, font) = if entry.focal {
            (focal_color, &bold)
        } else {
            (neutral, &regular)
        };
        let label = format!("{:>3}   {}", entry.rank, entry.team);
        root.draw(&Text::new(label, (LEFT, y), font.color(&color)))
            .map_err(Error::render)?;
        root.draw(&Text::new(
            format!("{:.2}", entry.value),
            (VALUE_COLUMN, y),
            font.color(&color),
        ))
        .map_err(Error::render)?;
        if (k as i32) < n - 1 {
            dotted(y + ROW_HEIGHT - 6)?;
        }
    }
    rule(header_y + ROW_HEIGHT * (n + 1) - 6, BLACK.stroke_width(2))?;

    root.present().map_err(Error::render)?;
    log::info!("Wrote ranking table to {}", path.as_ref().display());
    Ok(())
}
