use crate::{
    cache::TtlCache, config::DashboardConfig, matches::MatchDf, require_columns, League, Result,
    LEAGUE, MATCHDAY, MATCH_DATE, MATCH_ID, TEAM,
};
use chrono::NaiveDate;
use derive_deref::Deref;
use itertools::{izip, Itertools};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Raw per-segment physical records, tagged with their league.
#[derive(Clone, Deref)]
pub struct RawDf(DataFrame);

impl RawDf {
    pub fn empty() -> Self {
        RawDf(DataFrame::empty())
    }

    /// Normalises a freshly read league file: tags every row with `league`,
    /// coerces ids and dates to strings and known metrics to floats (other
    /// columns are dropped), and attaches
    /// the per-team matchday index when the file has match ids and dates.
    ///
    /// Metrics the file lacks stay absent, so asking this league for them
    /// fails with `MissingColumn`.
    pub fn tagged(df: DataFrame, league: League, metrics: &[String]) -> Result<Self> {
        log::trace!("loader::tagged {}", league);
        require_columns(&df, &[TEAM])?;

        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let has = |name: &str| present.iter().any(|p| p == name);

        let mut select = vec![
            col(TEAM).cast(DataType::String),
            lit(league.to_string()).alias(LEAGUE),
        ];
        for key in [MATCH_ID, MATCH_DATE] {
            if has(key) {
                select.push(col(key).cast(DataType::String));
            }
        }
        for metric in metrics {
            if has(metric) {
                select.push(col(metric).cast(DataType::Float64));
            } else {
                log::warn!("{}: no {:?} column", league, metric);
            }
        }

        let df = df.lazy().select(select).collect()?;
        let raw = RawDf(df);
        if has(MATCH_ID) && has(MATCH_DATE) {
            raw.with_matchdays()
        } else {
            Ok(raw)
        }
    }

    /// Left-joins the matchday index onto the records and drops the rows it
    /// could not index.
    fn with_matchdays(self) -> Result<Self> {
        let before = self.height();
        let index = matchday_index(&self.0)?;
        let keys = [col(TEAM), col(MATCH_ID), col(MATCH_DATE)];
        let df = self
            .0
            .lazy()
            .join(index.lazy(), keys.clone(), keys, JoinArgs::new(JoinType::Left))
            .filter(col(MATCHDAY).is_not_null())
            .collect()?;

        let dropped = before - df.height();
        if dropped > 0 {
            log::warn!("Dropped {} rows without a parseable match date", dropped);
        }
        Ok(RawDf(df))
    }

    pub fn lazy(&self) -> LazyFrame {
        self.0.clone().lazy()
    }

    /// Collapses segment rows into one row per team and match.
    pub fn match_rows(&self, metrics: &[String]) -> Result<MatchDf> {
        MatchDf::aggregate(self, metrics)
    }

    /// Distinct teams in order of first appearance
    pub fn teams(&self) -> Result<Vec<String>> {
        if self.height() == 0 {
            return Ok(Vec::new());
        }
        let teams = self
            .column(TEAM)?
            .str()?
            .into_iter()
            .flatten()
            .unique()
            .map(str::to_string)
            .collect();
        Ok(teams)
    }

    pub fn concat(parts: Vec<RawDf>) -> Result<Self> {
        let frames: Vec<LazyFrame> = parts
            .into_iter()
            .filter(|part| part.height() > 0)
            .map(|part| part.0.lazy())
            .collect();
        if frames.is_empty() {
            return Ok(RawDf::empty());
        }
        let df = concat_lf_diagonal(frames, UnionArgs::default())?.collect()?;
        Ok(RawDf(df))
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` and `YYYYMMDD`, ignoring
/// any trailing time part.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split([' ', 'T']).next()?;
    ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

/// Numbers each team's distinct (match id, date) pairs 1..K in date order.
pub fn matchday_index(df: &DataFrame) -> Result<DataFrame> {
    log::trace!("loader::matchday_index");
    let teams = df.column(TEAM)?.str()?;
    let ids = df.column(MATCH_ID)?.str()?;
    let dates = df.column(MATCH_DATE)?.str()?;

    let mut per_team: HashMap<&str, BTreeSet<(NaiveDate, &str, &str)>> = HashMap::new();
    for (team, id, date) in izip!(teams, ids, dates) {
        let (Some(team), Some(id), Some(date)) = (team, id, date) else {
            continue;
        };
        if let Some(day) = parse_match_date(date) {
            per_team.entry(team).or_default().insert((day, id, date));
        }
    }

    let mut team_col = Vec::new();
    let mut id_col = Vec::new();
    let mut date_col = Vec::new();
    let mut matchday_col: Vec<u32> = Vec::new();
    for (team, matches) in per_team.into_iter().sorted_by_key(|(team, _)| *team) {
        for (n, (_, id, date)) in matches.into_iter().enumerate() {
            team_col.push(team);
            id_col.push(id);
            date_col.push(date);
            matchday_col.push(n as u32 + 1);
        }
    }
    log::debug!("{} team matchdays indexed", matchday_col.len());

    let index = DataFrame::new(vec![
        Series::new(TEAM, team_col),
        Series::new(MATCH_ID, id_col),
        Series::new(MATCH_DATE, date_col),
        Series::new(MATCHDAY, matchday_col),
    ])?;
    Ok(index)
}

/// Loads league files through a time-bounded cache keyed by league.
///
/// Loading never fails from the caller's point of view: a missing or
/// malformed file is logged and yields an empty `RawDf`.
pub struct LeagueLoader {
    config: DashboardConfig,
    cache: TtlCache<League, RawDf>,
}

impl LeagueLoader {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl());
        Self { config, cache }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn load(&self, league: League) -> RawDf {
        let mut read = false;
        let raw = self.cache.get_or_insert_with(league, || {
            read = true;
            self.read(league)
        });
        if !read {
            log::info!("{} data served from cache", league);
        }
        raw
    }

    fn read(&self, league: League) -> RawDf {
        let path = self.config.league_path(league);
        log::info!("Loading {} data from {}", league, path.display());

        let loaded = crate::load_csv(&path)
            .and_then(|df| RawDf::tagged(df, league, &self.config.metric_names()));
        match loaded {
            Ok(raw) => {
                log::debug!("{} rows loaded for {}", raw.height(), league);
                raw
            }
            Err(err) => {
                log::error!(
                    "Failed to load {} data ({}). Check that the file exists: {}",
                    league,
                    path.display(),
                    err
                );
                RawDf::empty()
            }
        }
    }

    /// Every configured league concatenated, skipping leagues that failed.
    pub fn load_all(&self) -> RawDf {
        let parts: Vec<RawDf> = self
            .config
            .leagues
            .iter()
            .map(|source| self.load(source.league))
            .filter(|raw| raw.height() > 0)
            .collect();

        match RawDf::concat(parts) {
            Ok(raw) => raw,
            Err(err) => {
                log::error!("Failed to combine league data: {}", err);
                RawDf::empty()
            }
        }
    }
}
