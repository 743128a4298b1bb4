use crate::{matches::MatchDf, require_columns, Reduction, Result, LEAGUE, TEAM};
use itertools::Itertools;
use polars::prelude::*;
use std::ops::Deref;

/// One row per team: a single reduction of its match rows.
#[derive(Clone)]
pub struct TeamSummaryDf {
    df: DataFrame,
    reduction: Reduction,
}

impl Deref for TeamSummaryDf {
    type Target = DataFrame;

    fn deref(&self) -> &DataFrame {
        &self.df
    }
}

impl TeamSummaryDf {
    pub(crate) fn reduce(matches: &MatchDf, metrics: &[String], reduction: Reduction) -> Result<Self> {
        log::trace!("summary::reduce {}", reduction);
        if matches.is_empty() {
            return Ok(Self {
                df: DataFrame::empty(),
                reduction,
            });
        }

        let metrics: Vec<&str> = metrics.iter().map(String::as_str).unique().collect();
        let mut required = vec![TEAM];
        required.extend(&metrics);
        require_columns(matches, &required)?;

        let mut keys = vec![col(TEAM)];
        if matches.get_column_names().contains(&LEAGUE) {
            keys.push(col(LEAGUE));
        }
        let aggs: Vec<Expr> = metrics.iter().map(|m| reduction.apply(col(m))).collect();

        let df = matches.lazy().group_by_stable(keys).agg(aggs).collect()?;
        log::debug!("{} teams reduced by {}", df.height(), reduction);
        Ok(Self { df, reduction })
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    pub fn lazy(&self) -> LazyFrame {
        self.df.clone().lazy()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader::RawDf, League, MATCH_ID};

    /// A plays m1 (10000) and m2 (12000); B plays m1 (9000) and m3 (11000)
    fn matches() -> MatchDf {
        let df = df!(
            TEAM => &["A", "A", "B", "B"],
            MATCH_ID => &["m1", "m2", "m1", "m3"],
            "Distance" => &[10000.0, 12000.0, 9000.0, 11000.0]
        )
        .unwrap();
        RawDf::tagged(df, League::J1, &metrics())
            .unwrap()
            .match_rows(&metrics())
            .unwrap()
    }

    fn metrics() -> Vec<String> {
        vec!["Distance".to_string()]
    }

    fn values(summary: &TeamSummaryDf) -> Vec<(String, f64)> {
        let teams = summary.column(TEAM).unwrap().str().unwrap();
        let values = summary.column("Distance").unwrap().f64().unwrap();
        teams
            .into_iter()
            .zip(values.into_iter())
            .map(|(t, v)| (t.unwrap().to_string(), v.unwrap()))
            .collect()
    }

    #[test]
    fn each_reduction_collapses_matches_per_team() {
        let cases = [
            (Reduction::Total, [22000.0, 20000.0]),
            (Reduction::Average, [11000.0, 10000.0]),
            (Reduction::Max, [12000.0, 11000.0]),
            (Reduction::Min, [10000.0, 9000.0]),
        ];
        for (reduction, [a, b]) in cases {
            let summary = matches().reduce(&metrics(), reduction).unwrap();
            assert_eq!(summary.reduction(), reduction);
            assert_eq!(
                values(&summary),
                vec![("A".to_string(), a), ("B".to_string(), b)],
                "{}",
                reduction
            );
        }
    }

    #[test]
    fn keeps_the_league_tag() {
        let summary = matches().reduce(&metrics(), Reduction::Average).unwrap();
        let leagues = summary.column(LEAGUE).unwrap().str().unwrap();
        assert!(leagues.into_iter().all(|l| l == Some("J1")));
    }

    #[test]
    fn total_equals_single_stage_sum() {
        let df = df!(
            TEAM => &["A", "A", "A", "B"],
            MATCH_ID => &["m1", "m1", "m2", "m1"],
            "Distance" => &[1500.0, 2500.0, 3000.0, 800.0]
        )
        .unwrap();
        let raw = RawDf::tagged(df, League::J2, &metrics()).unwrap();
        let summary = raw
            .match_rows(&metrics())
            .unwrap()
            .reduce(&metrics(), Reduction::Total)
            .unwrap();

        let single = raw
            .lazy()
            .group_by_stable([col(TEAM)])
            .agg([col("Distance").sum()])
            .collect()
            .unwrap();
        assert!(summary.select([TEAM, "Distance"]).unwrap().equals(&single));
    }

    #[test]
    fn empty_matches_reduce_to_empty() {
        let df = df!(TEAM => Vec::<&str>::new(), MATCH_ID => Vec::<&str>::new(), "Distance" => Vec::<f64>::new()).unwrap();
        let raw = RawDf::tagged(df, League::J1, &metrics()).unwrap();
        let summary = raw
            .match_rows(&metrics())
            .unwrap()
            .reduce(&metrics(), Reduction::Max)
            .unwrap();
        assert!(summary.is_empty());
    }
}
