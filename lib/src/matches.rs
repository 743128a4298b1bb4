use crate::{
    loader::RawDf, require_columns, summary::TeamSummaryDf, Reduction, Result, LEAGUE, MATCHDAY,
    MATCH_ID, TEAM,
};
use derive_deref::Deref;
use itertools::Itertools;
use polars::prelude::*;

/// One row per (team, match): the sum of every segment the team recorded in
/// that match.
#[derive(Clone, Deref)]
pub struct MatchDf(DataFrame);

impl MatchDf {
    pub(crate) fn aggregate(raw: &RawDf, metrics: &[String]) -> Result<Self> {
        log::trace!("matches::aggregate");
        if raw.height() == 0 {
            return Ok(MatchDf(DataFrame::empty()));
        }

        // A metric asked for twice is summed once
        let metrics: Vec<&str> = metrics.iter().map(String::as_str).unique().collect();
        let mut required = vec![TEAM, MATCH_ID];
        required.extend(&metrics);
        require_columns(raw, &required)?;

        let mut aggs: Vec<Expr> = metrics.iter().map(|m| col(m).sum()).collect();
        let names = raw.get_column_names();
        for carried in [LEAGUE, MATCHDAY] {
            if names.contains(&carried) {
                aggs.push(col(carried).first());
            }
        }

        let df = raw
            .lazy()
            .group_by_stable([col(TEAM), col(MATCH_ID)])
            .agg(aggs)
            .collect()?;
        log::debug!("{} team matches aggregated", df.height());
        Ok(MatchDf(df))
    }

    pub fn lazy(&self) -> LazyFrame {
        self.0.clone().lazy()
    }

    /// Collapses each team's matches into a single row.
    pub fn reduce(&self, metrics: &[String], reduction: Reduction) -> Result<TeamSummaryDf> {
        TeamSummaryDf::reduce(self, metrics, reduction)
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }
}
