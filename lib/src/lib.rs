use parse_display::{Display, FromStr};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod cache;
pub mod config;
mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod matches;
pub mod overview;
pub mod ranking;
pub mod render;
pub mod scatter;
pub mod summary;
pub mod trend;

pub use config::DashboardConfig;
pub use error::Error;
pub use loader::{LeagueLoader, RawDf};
pub use matches::MatchDf;
pub use summary::TeamSummaryDf;

pub type Result<T> = std::result::Result<T, error::Error>;

pub const TEAM: &str = "Team";
pub const MATCH_ID: &str = "Match ID";
pub const MATCH_DATE: &str = "Match Date";
pub const LEAGUE: &str = "League";
pub const MATCHDAY: &str = "Matchday";

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, FromStr, Serialize, Deserialize,
)]
pub enum League {
    J1,
    J2,
    J3,
}

impl League {
    pub const ALL: [League; 3] = [League::J1, League::J2, League::J3];
}

/// How a team's match rows are collapsed into one summary row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, FromStr)]
pub enum Reduction {
    Total,
    Average,
    Max,
    Min,
}

impl Reduction {
    pub fn apply(self, expr: Expr) -> Expr {
        match self {
            Reduction::Total => expr.sum(),
            Reduction::Average => expr.mean(),
            Reduction::Max => expr.max(),
            Reduction::Min => expr.min(),
        }
    }

    /// Smallest value ranks first only for `Min`
    pub fn ascending(self) -> bool {
        matches!(self, Reduction::Min)
    }
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;
    Ok(df)
}

pub(crate) fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    match names.iter().find(|name| !present.contains(*name)) {
        Some(missing) => Err(Error::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_parses_selector_labels() {
        assert_eq!("Total".parse::<Reduction>().unwrap(), Reduction::Total);
        assert_eq!("Min".parse::<Reduction>().unwrap(), Reduction::Min);
        assert!("total".parse::<Reduction>().is_err());
        assert_eq!(Reduction::Average.to_string(), "Average");
    }

    #[test]
    fn only_min_sorts_ascending() {
        assert!(Reduction::Min.ascending());
        assert!(!Reduction::Total.ascending());
        assert!(!Reduction::Average.ascending());
        assert!(!Reduction::Max.ascending());
    }

    #[test]
    fn league_round_trips_through_display() {
        for league in League::ALL {
            assert_eq!(league.to_string().parse::<League>().unwrap(), league);
        }
    }

    #[test]
    fn require_columns_names_the_missing_one() {
        let df = df!(TEAM => &["A"], "Distance" => &[1.0]).unwrap();
        assert!(require_columns(&df, &[TEAM, "Distance"]).is_ok());
        match require_columns(&df, &[TEAM, MATCH_ID]) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, MATCH_ID),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
