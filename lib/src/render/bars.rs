use super::color_or_gray;
use crate::{config::DashboardConfig, ranking::Ranking, Error, Result};
use plotters::prelude::*;
use std::path::Path;

/// Horizontal bar chart of a ranking, best team on top, bars in team colors.
pub fn ranking_bars<P: AsRef<Path>>(
    ranking: &Ranking,
    config: &DashboardConfig,
    path: P,
) -> Result<()> {
    let n = ranking.entries.len();
    if n == 0 {
        return Err(Error::Empty(format!("{} has no rows", ranking.title())));
    }

    // Segment 0 is the bottom row
    let labels: Vec<String> = ranking.entries.iter().rev().map(|e| e.team.clone()).collect();
    let top = ranking.entries.iter().map(|e| e.value).fold(0.0, f64::max);
    let x_max = if top > 0.0 { top * 1.1 } else { 1.0 };
    let height = (n as u32 * 26 + 140).max(320);

    let root = SVGBackend::new(path.as_ref(), (960, height)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(ranking.title(), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(230)
        .build_cartesian_2d(0f64..x_max, (0..n as i32 - 1).into_segmented())
        .map_err(Error::render)?;

    let value_label = ranking.value_label();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(value_label.as_str())
        .draw()
        .map_err(Error::render)?;

    chart
        .draw_series(ranking.entries.iter().enumerate().map(|(idx, entry)| {
            let row = (n - 1 - idx) as i32;
            let hex = config
                .team_color(&entry.team)
                .unwrap_or(&config.palette.unknown_team);
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(row)),
                    (entry.value, SegmentValue::Exact(row + 1)),
                ],
                color_or_gray(hex).filled(),
            );
            bar.set_margin(3, 3, 0, 0);
            bar
        }))
        .map_err(Error::render)?;

    chart
        .draw_series(ranking.entries.iter().enumerate().map(|(idx, entry)| {
            let row = (n - 1 - idx) as i32;
            Text::new(
                format!("{:.1}", entry.value),
                (entry.value, SegmentValue::CenterOf(row)),
                ("sans-serif", 12),
            )
        }))
        .map_err(Error::render)?;

    root.present().map_err(Error::render)?;
    log::info!("Wrote {} bars to {}", n, path.as_ref().display());
    Ok(())
}
