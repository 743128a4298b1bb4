//! Static dashboard tables: league sources, color maps and the metric catalogue.
//!
//! Everything here is plain data handed to the loader and presenters. A TOML
//! file may override any top-level field; fields it leaves out keep the
//! built-in J.League defaults.

use crate::{Error, League, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Meters,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub unit: Unit,
}

impl Metric {
    fn new(name: &str, unit: Unit) -> Self {
        Self {
            name: name.to_string(),
            unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSource {
    pub league: League,
    pub file: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Text color for non-focal rows in the ranking table
    pub neutral: String,
    /// Teams missing from the color table
    pub unknown_team: String,
    /// The "Others" bucket of the highlight scatter scheme
    pub others: String,
    pub highlight_fallback: String,
    pub focal_fallback: String,
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            neutral: "#4A2E19".to_string(),
            unknown_team: "#999999".to_string(),
            others: "#CCCCCC".to_string(),
            highlight_fallback: "#FF0000".to_string(),
            focal_fallback: "#000000".to_string(),
            background: "#FBF9F4".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub cache_ttl_secs: u64,
    pub leagues: Vec<LeagueSource>,
    pub team_colors: HashMap<String, String>,
    pub metrics: Vec<Metric>,
    pub palette: Palette,
    pub default_focal_team: String,
    pub scatter_x: String,
    pub scatter_y: String,
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: DashboardConfig = toml::from_str(&text)?;
        log::debug!(
            "Loaded config from {} ({} leagues, {} metrics)",
            path.as_ref().display(),
            config.leagues.len(),
            config.metrics.len()
        );
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn source(&self, league: League) -> Option<&LeagueSource> {
        self.leagues.iter().find(|s| s.league == league)
    }

    pub fn league_path(&self, league: League) -> PathBuf {
        let file = match self.source(league) {
            Some(source) => source.file.clone(),
            None => format!("2025_{}_physical_data.csv", league),
        };
        self.data_dir.join(file)
    }

    pub fn metric(&self, name: &str) -> Result<&Metric> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))
    }

    pub fn metric_names(&self) -> Vec<String> {
        self.metrics.iter().map(|m| m.name.clone()).collect()
    }

    pub fn team_color(&self, team: &str) -> Option<&str> {
        self.team_colors.get(team).map(String::as_str)
    }

    pub fn league_color(&self, league: &str) -> Option<&str> {
        self.leagues
            .iter()
            .find(|s| s.league.to_string() == league)
            .map(|s| s.color.as_str())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let leagues = League::ALL
            .into_iter()
            .zip(["#E6002D", "#127A3A", "#014099"])
            .map(|(league, color)| LeagueSource {
            league,
            file: format!("2025_{}_physical_data.csv", league),
            color: color.to_string(),
        })
        .collect();

        let metrics = vec![
            Metric::new("Distance", Unit::Meters),
            Metric::new("Running Distance", Unit::Meters),
            Metric::new("HSR Distance", Unit::Meters),
            Metric::new("Sprint Count", Unit::Count),
            Metric::new("HI Distance", Unit::Meters),
            Metric::new("HI Count", Unit::Count),
            Metric::new("Distance TIP", Unit::Meters),
            Metric::new("Running Distance TIP", Unit::Meters),
            Metric::new("HSR Distance TIP", Unit::Meters),
            Metric::new("HSR Count TIP", Unit::Count),
        ];

        let team_colors = TEAM_COLORS
            .iter()
            .map(|(team, color)| (team.to_string(), color.to_string()))
            .collect();

        Self {
            data_dir: PathBuf::from("data"),
            cache_ttl_secs: 15 * 60,
            leagues,
            team_colors,
            metrics,
            palette: Palette::default(),
            default_focal_team: "Yokohama FC".to_string(),
            scatter_x: "Running Distance".to_string(),
            scatter_y: "HSR Distance".to_string(),
        }
    }
}

static TEAM_COLORS: &[(&str, &str)] = &[
    // J1
    ("Kashima Antlers", "#B71940"),
    ("Kashiwa Reysol", "#FFF000"),
    ("Urawa Red Diamonds", "#E6002D"),
    ("FC Tokyo", "#3E4C8D"),
    ("Tokyo Verdy", "#006931"),
    ("FC Machida Zelvia", "#0056A5"),
    ("Kawasaki Frontale", "#319FDA"),
    ("Yokohama F. Marinos", "#014099"),
    ("Yokohama FC", "#4BC1FE"),
    ("Shonan Bellmare", "#9EFF26"),
    ("Albirex Niigata", "#FE641E"),
    ("Shimizu S-Pulse", "#FF8901"),
    ("Nagoya Grampus", "#F8B500"),
    ("Kyoto Sanga FC", "#820064"),
    ("Gamba Osaka", "#00458D"),
    ("Cerezo Osaka", "#DB005B"),
    ("Vissel Kobe", "#A60129"),
    ("Fagiano Okayama", "#A72041"),
    ("Sanfrecce Hiroshima", "#603D97"),
    ("Avispa Fukuoka", "#9EB5C7"),
    // J2
    ("Hokkaido Consadole Sapporo", "#125D75"),
    ("Vegalta Sendai", "#FFC20E"),
    ("AFC Blaublitz Akita", "#0D5790"),
    ("Montedio Yamagata", "#F7F4A6"),
    ("Iwaki SC", "#C01630"),
    ("Mito Hollyhock", "#2E3192"),
    ("Omiya Ardija", "#EC6601"),
    ("JEF United Ichihara Chiba", "#FFDE00"),
    ("Ventforet Kofu", "#0F63A3"),
    ("Kataller Toyama", "#25458F"),
    ("Jubilo Iwata", "#7294BA"),
    ("Fujieda MYFC", "#875884"),
    ("Renofa Yamaguchi", "#F26321"),
    ("Tokushima Vortis", "#11233F"),
    ("Ehime FC", "#ED9A4C"),
    ("FC Imabari", "#908E3C"),
    ("Sagan Tosu", "#30B7D7"),
    ("V-Varen Nagasaki", "#013893"),
    ("Roasso Kumamoto", "#A92D27"),
    ("Oita Trinita", "#254398"),
    // J3
    ("Vanraure Hachinohe", "#13A63B"),
    ("Fukushima United FC", "#CF230C"),
    ("Tochigi SC", "#0170A4"),
    ("Tochigi City", "#001030"),
    ("ThespaKusatsu Gunma", "#08406F"),
    ("SC Sagamihara", "#408B52"),
    ("AC Parceiro Nagano", "#E36A2A"),
    ("Matsumoto Yamaga FC", "#004B1D"),
    ("Ishikawa FC Zweigen Kanazawa", "#3B1216"),
    ("FC Azul Claro Numazu", "#13A7DE"),
    ("FC Gifu", "#126246"),
    ("FC Osaka", "#90C9E2"),
    ("Nara Club", "#011D64"),
    ("Gainare Tottori", "#96C692"),
    ("Kamatamare Sanuki", "#669FB9"),
    ("Kochi United SC", "#B21E23"),
    ("Giravanz Kitakyushu", "#E8BD00"),
    ("Tegevajaro Miyazaki FC", "#F6E066"),
    ("Kagoshima United FC", "#19315F"),
    ("FC Ryūkyū", "#AA131B"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_league() {
        let config = DashboardConfig::default();
        for league in League::ALL {
            assert!(config.source(league).is_some());
        }
        assert_eq!(
            config.league_path(League::J2),
            PathBuf::from("data/2025_J2_physical_data.csv")
        );
        assert_eq!(config.league_color("J1"), Some("#E6002D"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn unknown_metric_is_an_error() {
        let config = DashboardConfig::default();
        assert_eq!(config.metric("Sprint Count").unwrap().unit, Unit::Count);
        assert!(matches!(
            config.metric("Top Speed"),
            Err(Error::UnknownMetric(_))
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: DashboardConfig = toml::from_str(
            r##"
            data_dir = "fixtures"
            cache_ttl_secs = 60

            [[metrics]]
            name = "Distance"
            unit = "meters"

            [team_colors]
            "Team A" = "#112233"
            "##,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("fixtures"));
        assert_eq!(config.metric_names(), vec!["Distance".to_string()]);
        assert_eq!(config.team_color("Team A"), Some("#112233"));
        assert_eq!(config.team_color("Yokohama FC"), None);
        assert_eq!(config.leagues.len(), 3);
        assert_eq!(config.palette.unknown_team, "#999999");
    }
}
