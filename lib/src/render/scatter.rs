use super::{color_or_gray, padded};
use crate::{
    scatter::{ColorScheme, Scatter, ScatterPoint},
    Error, Result,
};
use itertools::Itertools;
use plotters::prelude::*;
use std::path::Path;

pub fn scatter_plot<P: AsRef<Path>>(scatter: &Scatter, path: P) -> Result<()> {
    if scatter.points.is_empty() {
        return Err(Error::Empty(scatter.title()));
    }
    let (x0, x1) = padded(scatter.points.iter().map(|p| p.x));
    let (y0, y1) = padded(scatter.points.iter().map(|p| p.y));

    let root = SVGBackend::new(path.as_ref(), (1100, 720)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(scatter.title(), ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(Error::render)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} (avg)", scatter.x_metric))
        .y_desc(format!("{} (avg)", scatter.y_metric))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()
        .map_err(Error::render)?;

    // Highlighted bucket last so it sits on top of the others
    let groups = scatter
        .points
        .iter()
        .map(|p| p.group.as_str())
        .unique()
        .sorted_by_key(|group| scatter.points.iter().any(|p| p.group == *group && p.emphasized))
        .collect::<Vec<_>>();

    for group in groups {
        let members: Vec<&ScatterPoint> = scatter.points.iter().filter(|p| p.group == group).collect();
        let color = color_or_gray(&members[0].color);
        let size = if members[0].emphasized { 9 } else { 6 };
        chart
            .draw_series(
                members
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), size, color.filled())),
            )
            .map_err(Error::render)?
            .label(group)
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    let annotate = scatter.scheme != ColorScheme::Highlight;
    chart
        .draw_series(
            scatter
                .points
                .iter()
                .filter(|p| annotate || p.emphasized)
                .map(|p| Text::new(p.team.clone(), (p.x, p.y), ("sans-serif", 11))),
        )
        .map_err(Error::render)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(Error::render)?;

    root.present().map_err(Error::render)?;
    log::info!(
        "Wrote {} scatter points to {}",
        scatter.points.len(),
        path.as_ref().display()
    );
    Ok(())
}
