use crate::{
    config::DashboardConfig, matches::MatchDf, Error, Reduction, Result, LEAGUE, TEAM,
};
use parse_display::{Display, FromStr};
use polars::prelude::*;

pub const OTHERS: &str = "Others";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, FromStr)]
#[display(style = "lowercase")]
pub enum ColorScheme {
    League,
    Highlight,
    Team,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub team: String,
    pub league: String,
    pub x: f64,
    pub y: f64,
    /// Legend bucket: league, team, or the highlight group
    pub group: String,
    pub color: String,
    pub emphasized: bool,
}

#[derive(Debug, Clone)]
pub struct Scatter {
    pub x_metric: String,
    pub y_metric: String,
    pub scheme: ColorScheme,
    pub focal_team: Option<String>,
    pub points: Vec<ScatterPoint>,
}

impl Scatter {
    pub fn title(&self) -> String {
        let by = match (self.scheme, &self.focal_team) {
            (ColorScheme::Highlight, Some(team)) => format!("focal team: {}", team),
            (scheme, _) => format!("by {}", scheme),
        };
        format!(
            "Team averages: {} vs {} ({})",
            self.y_metric, self.x_metric, by
        )
    }
}

/// Focal team for the highlight scheme: the configured default if it played,
/// otherwise the alphabetically first team.
pub fn default_focal(teams: &[String], config: &DashboardConfig) -> Option<String> {
    if teams.iter().any(|t| *t == config.default_focal_team) {
        return Some(config.default_focal_team.clone());
    }
    teams.iter().min().cloned()
}

/// Team averages of two metrics, one point per team.
pub fn scatter(
    matches: &MatchDf,
    x_metric: &str,
    y_metric: &str,
    scheme: ColorScheme,
    focal_team: Option<&str>,
    config: &DashboardConfig,
) -> Result<Scatter> {
    log::trace!("scatter::scatter {} vs {}", y_metric, x_metric);
    if matches.is_empty() {
        return Err(Error::Empty("no team averages to plot".to_string()));
    }
    let metrics = vec![x_metric.to_string(), y_metric.to_string()];
    let summary = matches.reduce(&metrics, Reduction::Average)?;
    crate::require_columns(&summary, &[LEAGUE])?;

    let df = summary
        .lazy()
        .select([
            col(TEAM),
            col(LEAGUE),
            col(x_metric).alias("x"),
            col(y_metric).alias("y"),
        ])
        .filter(col("x").is_not_null().and(col("y").is_not_null()))
        .collect()?;

    let teams = df.column(TEAM)?.str()?;
    let leagues = df.column(LEAGUE)?.str()?;
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;

    let teams_list: Vec<String> = teams.into_iter().flatten().map(str::to_string).collect();
    let focal = match scheme {
        ColorScheme::Highlight => focal_team
            .map(str::to_string)
            .or_else(|| default_focal(&teams_list, config)),
        _ => focal_team.map(str::to_string),
    };

    let palette = &config.palette;
    let mut points = Vec::with_capacity(df.height());
    for (((team, league), x), y) in teams.into_iter().zip(leagues).zip(xs).zip(ys) {
        let (Some(team), Some(league), Some(x), Some(y)) = (team, league, x, y) else {
            continue;
        };
        let is_focal = focal.as_deref() == Some(team);
        let (group, color, emphasized) = match scheme {
            ColorScheme::League => (
                league.to_string(),
                config.league_color(league).unwrap_or(&palette.unknown_team),
                false,
            ),
            ColorScheme::Highlight if is_focal => (
                team.to_string(),
                config.team_color(team).unwrap_or(&palette.highlight_fallback),
                true,
            ),
            ColorScheme::Highlight => (OTHERS.to_string(), palette.others.as_str(), false),
            ColorScheme::Team => (
                team.to_string(),
                config.team_color(team).unwrap_or(&palette.unknown_team),
                false,
            ),
        };
        points.push(ScatterPoint {
            team: team.to_string(),
            league: league.to_string(),
            x,
            y,
            group,
            color: color.to_string(),
            emphasized,
        });
    }

    if points.is_empty() {
        return Err(Error::Empty("no team averages to plot".to_string()));
    }
    log::debug!("{} scatter points", points.len());

    Ok(Scatter {
        x_metric: x_metric.to_string(),
        y_metric: y_metric.to_string(),
        scheme,
        focal_team: focal.filter(|_| scheme == ColorScheme::Highlight),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader::RawDf, League, MATCH_ID};

    fn metrics() -> Vec<String> {
        vec!["Running Distance".to_string(), "HSR Distance".to_string()]
    }

    fn matches() -> MatchDf {
        let j1 = df!(
            TEAM => &["Yokohama FC", "Yokohama FC", "Vissel Kobe"],
            MATCH_ID => &["m1", "m2", "m1"],
            "Running Distance" => &[1000.0, 3000.0, 1500.0],
            "HSR Distance" => &[400.0, 600.0, 450.0]
        )
        .unwrap();
        let j3 = df!(
            TEAM => &["Unknown FC"],
            MATCH_ID => &["m7"],
            "Running Distance" => &[900.0],
            "HSR Distance" => &[300.0]
        )
        .unwrap();
        let raw = RawDf::concat(vec![
            RawDf::tagged(j1, League::J1, &metrics()).unwrap(),
            RawDf::tagged(j3, League::J3, &metrics()).unwrap(),
        ])
        .unwrap();
        raw.match_rows(&metrics()).unwrap()
    }

    fn point<'a>(scatter: &'a Scatter, team: &str) -> &'a ScatterPoint {
        scatter.points.iter().find(|p| p.team == team).unwrap()
    }

    #[test]
    fn one_averaged_point_per_team() {
        let config = DashboardConfig::default();
        let scatter = scatter(
            &matches(),
            "Running Distance",
            "HSR Distance",
            ColorScheme::Team,
            None,
            &config,
        )
        .unwrap();

        assert_eq!(scatter.points.len(), 3);
        let yokohama = point(&scatter, "Yokohama FC");
        assert_eq!((yokohama.x, yokohama.y), (2000.0, 500.0));
        assert_eq!(yokohama.color, "#4BC1FE");
        assert_eq!(point(&scatter, "Unknown FC").color, "#999999");
    }

    #[test]
    fn league_scheme_uses_league_colors() {
        let config = DashboardConfig::default();
        let scatter = scatter(
            &matches(),
            "Running Distance",
            "HSR Distance",
            ColorScheme::League,
            None,
            &config,
        )
        .unwrap();

        assert_eq!(point(&scatter, "Vissel Kobe").color, "#E6002D");
        assert_eq!(point(&scatter, "Unknown FC").group, "J3");
        assert_eq!(point(&scatter, "Unknown FC").color, "#014099");
    }

    #[test]
    fn highlight_splits_into_two_buckets() {
        let config = DashboardConfig::default();
        let scatter = scatter(
            &matches(),
            "Running Distance",
            "HSR Distance",
            ColorScheme::Highlight,
            Some("Vissel Kobe"),
            &config,
        )
        .unwrap();

        let groups: std::collections::HashSet<&str> =
            scatter.points.iter().map(|p| p.group.as_str()).collect();
        assert_eq!(groups.len(), 2);
        assert!(groups.contains(OTHERS));
        let kobe = point(&scatter, "Vissel Kobe");
        assert!(kobe.emphasized);
        assert_eq!(kobe.color, "#A60129");
        assert_eq!(point(&scatter, "Yokohama FC").color, "#CCCCCC");
        assert_eq!(scatter.title(), "Team averages: HSR Distance vs Running Distance (focal team: Vissel Kobe)");
    }

    #[test]
    fn highlight_defaults_to_the_configured_team() {
        let config = DashboardConfig::default();
        let scatter = scatter(
            &matches(),
            "Running Distance",
            "HSR Distance",
            ColorScheme::Highlight,
            None,
            &config,
        )
        .unwrap();
        assert_eq!(scatter.focal_team.as_deref(), Some("Yokohama FC"));
    }

    #[test]
    fn default_focal_falls_back_to_first_alphabetically() {
        let config = DashboardConfig::default();
        let teams = vec!["Oita Trinita".to_string(), "Ehime FC".to_string()];
        assert_eq!(default_focal(&teams, &config).as_deref(), Some("Ehime FC"));
        assert_eq!(default_focal(&[], &config), None);
    }

    #[test]
    fn scheme_parses_lowercase() {
        assert_eq!("highlight".parse::<ColorScheme>().unwrap(), ColorScheme::Highlight);
        assert_eq!(ColorScheme::League.to_string(), "league");
    }
}
