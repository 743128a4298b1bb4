use crate::{
    config::DashboardConfig,
    loader::RawDf,
    ranking::{self, Ranking},
    Reduction, Result, TEAM,
};
use polars::prelude::*;

/// Metrics charted on every league page
pub const OVERVIEW_METRICS: [&str; 2] = ["Distance", "Sprint Count"];

/// Total-per-team rankings for the fixed league page charts. Each chart
/// succeeds or fails on its own.
pub fn league_overview(raw: &RawDf, config: &DashboardConfig) -> Vec<(String, Result<Ranking>)> {
    OVERVIEW_METRICS
        .iter()
        .map(|name| (name.to_string(), total_ranking(raw, name, config)))
        .collect()
}

fn total_ranking(raw: &RawDf, name: &str, config: &DashboardConfig) -> Result<Ranking> {
    let metric = config.metric(name)?;
    let metrics = vec![metric.name.clone()];
    let summary = raw
        .match_rows(&metrics)?
        .reduce(&metrics, Reduction::Total)?;
    ranking::rank(&summary, metric, None)
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub head: DataFrame,
    pub teams: usize,
    pub rows: usize,
}

pub fn preview(raw: &RawDf, rows: usize) -> Result<Preview> {
    if raw.height() == 0 {
        return Ok(Preview {
            head: DataFrame::empty(),
            teams: 0,
            rows: 0,
        });
    }
    let teams = raw.column(TEAM)?.n_unique()?;
    Ok(Preview {
        head: raw.head(Some(rows)),
        teams,
        rows: raw.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{League, MATCH_ID};

    fn raw() -> RawDf {
        let df = df!(
            TEAM => &["A", "A", "B", "B", "C"],
            MATCH_ID => &["m1", "m2", "m1", "m3", "m2"],
            "Distance" => &[100500.0, 101000.0, 99000.0, 98000.0, 102000.0],
            "Sprint Count" => &[150.0, 140.0, 160.0, 170.0, 120.0]
        )
        .unwrap();
        RawDf::tagged(df, League::J1, &DashboardConfig::default().metric_names()).unwrap()
    }

    #[test]
    fn distance_in_km_and_sprints_descending() {
        let charts = league_overview(&raw(), &DashboardConfig::default());
        assert_eq!(charts.len(), 2);

        let (name, distance) = &charts[0];
        assert_eq!(name, "Distance");
        let distance = distance.as_ref().unwrap();
        assert_eq!(distance.unit, Some("km"));
        assert_eq!(distance.entries[0].team, "A");
        assert_eq!(distance.entries[0].value, 201.5);

        let (_, sprints) = &charts[1];
        let teams: Vec<&str> = sprints
            .as_ref()
            .unwrap()
            .entries
            .iter()
            .map(|e| e.team.as_str())
            .collect();
        assert_eq!(teams, vec!["B", "A", "C"]);
    }

    #[test]
    fn a_missing_column_only_fails_its_chart() {
        let df = df!(
            TEAM => &["A", "B"],
            MATCH_ID => &["m1", "m1"],
            "Distance" => &[100.0, 200.0]
        )
        .unwrap();
        let raw = RawDf::tagged(df, League::J2, &DashboardConfig::default().metric_names()).unwrap();

        let charts = league_overview(&raw, &DashboardConfig::default());
        assert!(charts[0].1.is_ok());
        assert!(matches!(
            &charts[1].1,
            Err(crate::Error::MissingColumn(name)) if name == "Sprint Count"
        ));
    }

    #[test]
    fn preview_counts_teams_and_rows() {
        let preview = preview(&raw(), 2).unwrap();
        assert_eq!(preview.head.height(), 2);
        assert_eq!(preview.teams, 3);
        assert_eq!(preview.rows, 5);

        let empty = super::preview(&RawDf::empty(), 5).unwrap();
        assert_eq!(empty.rows, 0);
    }
}
