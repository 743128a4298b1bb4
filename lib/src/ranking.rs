//! Best-to-worst team rankings over a single metric.
//!
//! Total, Average and Max rank the largest value first; Min ranks the
//! smallest first. Equal values are ordered by team name. Meter metrics
//! summed with Total are converted to kilometers before sorting, so the
//! sorted value and the displayed value are always the same number.

use crate::{
    config::{Metric, Unit},
    summary::TeamSummaryDf,
    Error, Reduction, Result, TEAM,
};
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub rank: usize,
    pub team: String,
    pub value: f64,
    pub focal: bool,
}

#[derive(Debug, Clone)]
pub struct Ranking {
    pub metric: String,
    pub reduction: Reduction,
    pub unit: Option<&'static str>,
    pub entries: Vec<RankEntry>,
    /// `Team` and `<metric>` columns in rank order
    pub table: DataFrame,
}

impl Ranking {
    pub fn title(&self) -> String {
        format!("{} {} Rankings", self.metric, self.reduction)
    }

    /// Metric label including the display unit, e.g. `Distance (km)`
    pub fn value_label(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} ({})", self.metric, unit),
            None => self.metric.clone(),
        }
    }

    pub fn focal(&self) -> Option<&RankEntry> {
        self.entries.iter().find(|e| e.focal)
    }
}

fn display_unit(metric: &Metric, reduction: Reduction) -> (Option<&'static str>, f64) {
    match (metric.unit, reduction) {
        (Unit::Meters, Reduction::Total) => (Some("km"), 1000.0),
        (Unit::Meters, _) => (Some("m"), 1.0),
        (Unit::Count, _) => (None, 1.0),
    }
}

pub fn rank(summary: &TeamSummaryDf, metric: &Metric, focal_team: Option<&str>) -> Result<Ranking> {
    log::trace!("ranking::rank {}", metric.name);
    let reduction = summary.reduction();
    if summary.is_empty() {
        return Err(Error::Empty(format!("no teams to rank by {}", metric.name)));
    }
    crate::require_columns(summary, &[TEAM, metric.name.as_str()])?;

    let (unit, divisor) = display_unit(metric, reduction);
    let descending = !reduction.ascending();
    let table = summary
        .lazy()
        .select([col(TEAM), (col(&metric.name) / lit(divisor)).alias(&metric.name)])
        .filter(col(&metric.name).is_not_null())
        .sort(
            [metric.name.as_str(), TEAM],
            SortMultipleOptions::default()
                .with_order_descending_multi([descending, false])
                .with_maintain_order(true),
        )
        .collect()?;

    if table.height() == 0 {
        return Err(Error::Empty(format!("every {} value is missing", metric.name)));
    }

    let teams = table.column(TEAM)?.str()?;
    let values = table.column(&metric.name)?.f64()?;
    let entries: Vec<RankEntry> = teams
        .into_iter()
        .zip(values.into_iter())
        .enumerate()
        .filter_map(|(i, (team, value))| {
            let team = team?;
            Some(RankEntry {
                rank: i + 1,
                team: team.to_string(),
                value: value?,
                focal: focal_team == Some(team),
            })
        })
        .collect();
    log::debug!("{} teams ranked by {} {}", entries.len(), metric.name, reduction);

    Ok(Ranking {
        metric: metric.name.clone(),
        reduction,
        unit,
        entries,
        table,
    })
}
