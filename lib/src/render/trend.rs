use super::{color_or_gray, padded};
use crate::{config::DashboardConfig, trend::Trend, Error, Result};
use plotters::prelude::*;
use std::path::Path;

/// Line chart of a team's matchday series, with the opponents' values as a
/// second gray line when present.
pub fn trend_lines<P: AsRef<Path>>(trend: &Trend, config: &DashboardConfig, path: P) -> Result<()> {
    if trend.points.is_empty() {
        return Err(Error::Empty(format!("{} has no matchdays", trend.team)));
    }
    let opponents = trend.opponents.as_deref().unwrap_or_default();

    let last = trend
        .points
        .iter()
        .map(|p| p.matchday)
        .chain(opponents.iter().map(|p| p.matchday))
        .max()
        .unwrap_or(1);
    let (y0, y1) = padded(
        trend
            .points
            .iter()
            .map(|p| p.value)
            .chain(opponents.iter().map(|p| p.value)),
    );

    let team_color = color_or_gray(
        config
            .team_color(&trend.team)
            .unwrap_or(&config.palette.focal_fallback),
    );
    let opponent_color = color_or_gray(&config.palette.unknown_team);

    let root = SVGBackend::new(path.as_ref(), (1100, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{}: {} by matchday", trend.team, trend.metric),
            ("sans-serif", 22),
        )
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(0.5f64..(last as f64 + 0.5), y0..y1)
        .map_err(Error::render)?;

    chart
        .configure_mesh()
        .x_desc("Matchday")
        .y_desc(trend.metric.as_str())
        .x_labels(last as usize)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()
        .map_err(Error::render)?;

    let series: Vec<(f64, f64)> = trend
        .points
        .iter()
        .map(|p| (p.matchday as f64, p.value))
        .collect();
    chart
        .draw_series(LineSeries::new(series.clone(), team_color.stroke_width(3)))
        .map_err(Error::render)?
        .label(trend.team.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], team_color.stroke_width(3)));
    chart
        .draw_series(series.iter().map(|&(x, y)| Circle::new((x, y), 4, team_color.filled())))
        .map_err(Error::render)?;

    if !opponents.is_empty() {
        let series: Vec<(f64, f64)> = opponents
            .iter()
            .map(|p| (p.matchday as f64, p.value))
            .collect();
        chart
            .draw_series(LineSeries::new(series.clone(), opponent_color.stroke_width(2)))
            .map_err(Error::render)?
            .label("Opponent")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], opponent_color.stroke_width(2))
            });
        chart
            .draw_series(opponents.iter().map(|p| {
                Text::new(
                    p.team.clone(),
                    (p.matchday as f64, p.value),
                    ("sans-serif", 10),
                )
            }))
            .map_err(Error::render)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(Error::render)?;

    root.present().map_err(Error::render)?;
    log::info!("Wrote trend for {} to {}", trend.team, path.as_ref().display());
    Ok(())
}
