use crate::{
    filter::RecordFilter, matches::MatchDf, require_columns, Error, Result, MATCHDAY, MATCH_ID,
    TEAM,
};
use polars::prelude::*;

const OPPONENT: &str = "Opponent";
const OPPONENT_VALUE: &str = "Opponent Value";

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub matchday: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpponentPoint {
    pub matchday: u32,
    pub team: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct Trend {
    pub team: String,
    pub metric: String,
    pub points: Vec<TrendPoint>,
    pub opponents: Option<Vec<OpponentPoint>>,
}

/// A team's per-matchday series for one metric, optionally paired with the
/// value each opponent recorded in the same match.
pub fn trend(matches: &MatchDf, team: &str, metric: &str, show_opponent: bool) -> Result<Trend> {
    log::trace!("trend::trend {} {}", team, metric);
    if matches.is_empty() {
        return Err(Error::Empty(format!("no matches recorded for {}", team)));
    }
    require_columns(matches, &[TEAM, MATCH_ID, MATCHDAY, metric])?;

    let own = matches
        .lazy()
        .filter(RecordFilter::new().team(team).build())
        .select([
            col(MATCH_ID),
            col(MATCHDAY).cast(DataType::UInt32),
            col(metric),
        ])
        .sort([MATCHDAY], SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;
    if own.height() == 0 {
        return Err(Error::Empty(format!("no matches recorded for {}", team)));
    }

    let points: Vec<TrendPoint> = own
        .column(MATCHDAY)?
        .u32()?
        .into_iter()
        .zip(own.column(metric)?.f64()?.into_iter())
        .filter_map(|(matchday, value)| {
            Some(TrendPoint {
                matchday: matchday?,
                value: value?,
            })
        })
        .collect();
    log::debug!("{} matchdays for {}", points.len(), team);

    let opponents = if show_opponent {
        Some(opponent_series(matches, &own, team, metric)?)
    } else {
        None
    };

    Ok(Trend {
        team: team.to_string(),
        metric: metric.to_string(),
        points,
        opponents,
    })
}

/// For each of `team`'s matches, the first other team sharing the match id,
/// placed on `team`'s matchday. Matches without a counterpart are skipped.
fn opponent_series(
    matches: &MatchDf,
    own: &DataFrame,
    team: &str,
    metric: &str,
) -> Result<Vec<OpponentPoint>> {
    let others = matches
        .lazy()
        .filter(RecordFilter::new().not_team(team).build())
        .select([
            col(MATCH_ID),
            col(TEAM).alias(OPPONENT),
            col(metric).alias(OPPONENT_VALUE),
        ]);

    let paired = own
        .clone()
        .lazy()
        .select([col(MATCH_ID), col(MATCHDAY)])
        .join(
            others,
            [col(MATCH_ID)],
            [col(MATCH_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .group_by_stable([col(MATCH_ID)])
        .agg([
            col(MATCHDAY).first(),
            col(OPPONENT).first(),
            col(OPPONENT_VALUE).first(),
        ])
        .sort([MATCHDAY], SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;

    let missing = own.height() - paired.height();
    if missing > 0 {
        log::warn!("{} of {}'s matches have no opponent row", missing, team);
    }

    let matchdays = paired.column(MATCHDAY)?.u32()?;
    let names = paired.column(OPPONENT)?.str()?;
    let values = paired.column(OPPONENT_VALUE)?.f64()?;
    let series = matchdays
        .into_iter()
        .zip(names.into_iter())
        .zip(values.into_iter())
        .filter_map(|((matchday, name), value)| {
            Some(OpponentPoint {
                matchday: matchday?,
                team: name?.to_string(),
                value: value?,
            })
        })
        .collect();
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader::RawDf, League, MATCH_DATE};

    fn metrics() -> Vec<String> {
        vec!["Distance".to_string()]
    }

    /// A plays B in m1 and C in m2; m3 is A's match against a team with no data
    fn matches() -> MatchDf {
        let df = df!(
            TEAM => &["A", "A", "B", "A", "C", "A"],
            MATCH_ID => &["m2", "m1", "m1", "m2", "m2", "m3"],
            MATCH_DATE => &["2025-03-08", "2025-02-22", "2025-02-22", "2025-03-08", "2025-03-08", "2025-03-15"],
            "Distance" => &[5000.0, 10000.0, 9000.0, 6000.0, 11500.0, 10800.0]
        )
        .unwrap();
        RawDf::tagged(df, League::J1, &metrics())
            .unwrap()
            .match_rows(&metrics())
            .unwrap()
    }

    #[test]
    fn series_is_ordered_by_matchday() {
        let trend = trend(&matches(), "A", "Distance", false).unwrap();
        assert_eq!(
            trend.points,
            vec![
                TrendPoint { matchday: 1, value: 10000.0 },
                TrendPoint { matchday: 2, value: 11000.0 },
                TrendPoint { matchday: 3, value: 10800.0 },
            ]
        );
        assert!(trend.opponents.is_none());
    }

    #[test]
    fn opponents_line_up_on_the_focal_matchday() {
        let trend = trend(&matches(), "A", "Distance", true).unwrap();
        assert_eq!(
            trend.opponents.unwrap(),
            vec![
                OpponentPoint { matchday: 1, team: "B".to_string(), value: 9000.0 },
                OpponentPoint { matchday: 2, team: "C".to_string(), value: 11500.0 },
            ]
        );
    }

    #[test]
    fn unknown_team_is_empty() {
        assert!(matches!(
            trend(&matches(), "Z", "Distance", true),
            Err(Error::Empty(_))
        ));
    }

    #[test]
    fn requires_matchdays() {
        let df = df!(
            TEAM => &["A"],
            MATCH_ID => &["m1"],
            "Distance" => &[1.0]
        )
        .unwrap();
        let matches = RawDf::tagged(df, League::J1, &metrics())
            .unwrap()
            .match_rows(&metrics())
            .unwrap();
        assert!(matches!(
            trend(&matches, "A", "Distance", false),
            Err(Error::MissingColumn(name)) if name == MATCHDAY
        ));
    }
}
