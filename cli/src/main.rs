use anyhow::Result;
use clap::{Parser, Subcommand};
use jstats::{
    export,
    overview::{self, Preview},
    ranking, render,
    scatter::{self, ColorScheme},
    trend, DashboardConfig, League, LeagueLoader, RawDf, Reduction,
};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Physical performance dashboard for J1, J2 and J3")]
struct Args {
    /// TOML file overriding the built-in league, color and metric tables
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the league CSV files
    #[arg(long = "data-dir", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = "out")]
    out_dir: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    page: Page,
}

#[derive(Subcommand, Debug)]
enum Page {
    /// All leagues: team-average scatter plot and data preview
    Home(ScatterArgs),
    /// First rows and counts of the combined data
    Preview {
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Total distance (km) and total sprint charts for one league
    League { league: League },
    /// Custom ranking table for one league
    Rank(RankArgs),
    /// A team's per-matchday series, optionally against its opponents
    Trend(TrendArgs),
    /// Team-average scatter plot for one league or all of them
    Scatter {
        league: Option<League>,
        #[command(flatten)]
        args: ScatterArgs,
    },
    /// Every page for every league
    Report,
}

#[derive(clap::Args, Debug, Clone)]
struct ScatterArgs {
    /// X axis metric
    #[arg(short = 'x', long = "x")]
    x: Option<String>,

    /// Y axis metric
    #[arg(short = 'y', long = "y")]
    y: Option<String>,

    /// league, highlight or team
    #[arg(long = "color-by", default_value = "league")]
    color_by: ColorScheme,

    /// Focal team for the highlight scheme
    #[arg(short = 't', long = "team")]
    team: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RankArgs {
    league: League,

    #[arg(short = 'm', long = "metric")]
    metric: Option<String>,

    /// Total, Average, Max or Min
    #[arg(long = "method", default_value = "Average")]
    method: Reduction,

    /// Focal team drawn in its own color
    #[arg(short = 't', long = "team")]
    team: Option<String>,

    /// Also write the ranking as a CSV sheet
    #[arg(long = "export", value_name = "FILE")]
    export: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct TrendArgs {
    league: League,

    #[arg(short = 't', long = "team")]
    team: String,

    #[arg(short = 'm', long = "metric")]
    metric: Option<String>,

    /// Plot the opponent's value for every match
    #[arg(long)]
    opponent: bool,
}

/// Shows a presenter's output, or a warning in its place.
fn show<T>(what: &str, result: jstats::Result<T>, display: impl FnOnce(T) -> jstats::Result<()>) {
    if let Err(err) = result.and_then(display) {
        log::warn!("{}: {}", what, err);
        println!("warning: cannot show {}: {}", what, err);
    }
}

struct Dashboard {
    loader: LeagueLoader,
    out_dir: PathBuf,
}

impl Dashboard {
    fn config(&self) -> &DashboardConfig {
        self.loader.config()
    }

    fn out(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }

    fn default_metric(&self) -> String {
        self.config()
            .metrics
            .first()
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "Distance".to_string())
    }

    fn home(&self, args: &ScatterArgs) {
        println!("J.League data dashboard: all leagues");
        let raw = self.loader.load_all();
        if raw.height() == 0 {
            println!("warning: no league data could be loaded, nothing to show");
            return;
        }
        self.scatter(&raw, "all", args);
        self.preview(&raw, 5);
    }

    fn preview(&self, raw: &RawDf, rows: usize) {
        show("data preview", overview::preview(raw, rows), |p: Preview| {
            println!("{}", p.head);
            println!("Teams loaded: {} | Rows loaded: {}", p.teams, p.rows);
            Ok(())
        });
    }

    fn league(&self, league: League) {
        let raw = self.loader.load(league);
        if raw.height() == 0 {
            println!("warning: {} data could not be loaded", league);
            return;
        }
        println!("{} league dashboard", league);
        for (metric, result) in overview::league_overview(&raw, self.config()) {
            let what = format!("{} total {}", league, metric);
            let path = self.out(&format!("{}_total_{}.svg", render::slug(&league.to_string()), render::slug(&metric)));
            show(&what, result, |ranking| {
                render::ranking_bars(&ranking, self.config(), &path)?;
                println!("{} -> {}", ranking.title(), path.display());
                Ok(())
            });
        }
    }

    fn rank(&self, args: &RankArgs) {
        let raw = self.loader.load(args.league);
        if raw.height() == 0 {
            println!("warning: {} data could not be loaded", args.league);
            return;
        }
        let metric_name = args.metric.clone().unwrap_or_else(|| self.default_metric());
        let team = args
            .team
            .clone()
            .or_else(|| raw.teams().ok().and_then(|teams| teams.into_iter().next()));

        let ranked = self.config().metric(&metric_name).and_then(|metric| {
            let metrics = vec![metric.name.clone()];
            let summary = raw.match_rows(&metrics)?.reduce(&metrics, args.method)?;
            ranking::rank(&summary, metric, team.as_deref())
        });

        let stem = format!(
            "{}_{}_{}",
            render::slug(&args.league.to_string()),
            render::slug(&metric_name),
            render::slug(&args.method.to_string())
        );
        show("custom ranking", ranked, |ranked| {
            println!("{}", ranked.title());
            for entry in &ranked.entries {
                let marker = if entry.focal { "*" } else { " " };
                println!("{}{:>3}  {:<32} {:>12.2}", marker, entry.rank, entry.team, entry.value);
            }
            let table = self.out(&format!("{}_ranking.svg", stem));
            let bars = self.out(&format!("{}_bars.svg", stem));
            render::ranking_table(&ranked, self.config(), &table)?;
            render::ranking_bars(&ranked, self.config(), &bars)?;
            println!("-> {}\n-> {}", table.display(), bars.display());
            if let Some(path) = &args.export {
                export::write_ranking(&ranked, path)?;
                println!("-> {}", path.display());
            }
            Ok(())
        });
    }

    fn trend(&self, args: &TrendArgs) {
        let raw = self.loader.load(args.league);
        if raw.height() == 0 {
            println!("warning: {} data could not be loaded", args.league);
            return;
        }
        let metric = args.metric.clone().unwrap_or_else(|| self.default_metric());
        let result = self.config().metric(&metric).and_then(|m| {
            let metrics = vec![m.name.clone()];
            let matches = raw.match_rows(&metrics)?;
            trend::trend(&matches, &args.team, &m.name, args.opponent)
        });

        show("trend", result, |trend| {
            println!("{}: {} by matchday", trend.team, trend.metric);
            let opponents = trend.opponents.as_deref().unwrap_or_default();
            for point in &trend.points {
                match opponents.iter().find(|o| o.matchday == point.matchday) {
                    Some(o) => println!(
                        "{:>3}  {:>12.2}   vs {:<28} {:>12.2}",
                        point.matchday, point.value, o.team, o.value
                    ),
                    None => println!("{:>3}  {:>12.2}", point.matchday, point.value),
                }
            }
            let path = self.out(&format!(
                "{}_{}_trend.svg",
                render::slug(&trend.team),
                render::slug(&trend.metric)
            ));
            render::trend_lines(&trend, self.config(), &path)?;
            println!("-> {}", path.display());
            Ok(())
        });
    }

    fn scatter(&self, raw: &RawDf, scope: &str, args: &ScatterArgs) {
        let config = self.config();
        let x = args.x.clone().unwrap_or_else(|| config.scatter_x.clone());
        let y = args.y.clone().unwrap_or_else(|| config.scatter_y.clone());

        let result = config
            .metric(&x)
            .and_then(|_| config.metric(&y))
            .and_then(|_| raw.match_rows(&[x.clone(), y.clone()]))
            .and_then(|matches| {
                scatter::scatter(&matches, &x, &y, args.color_by, args.team.as_deref(), config)
            });

        show("scatter plot", result, |points| {
            let path = self.out(&format!(
                "{}_scatter_{}_{}_{}.svg",
                render::slug(scope),
                render::slug(&x),
                render::slug(&y),
                args.color_by
            ));
            render::scatter_plot(&points, &path)?;
            println!("{} -> {}", points.title(), path.display());
            Ok(())
        });
    }

    fn report(&self) {
        let home = ScatterArgs {
            x: None,
            y: None,
            color_by: ColorScheme::League,
            team: None,
        };
        self.home(&home);

        for source in &self.config().leagues {
            let league = source.league;
            self.league(league);
            let raw = self.loader.load(league);
            let Some(team) = raw.teams().ok().and_then(|t| t.into_iter().next()) else {
                continue;
            };
            for method in [Reduction::Total, Reduction::Average, Reduction::Max, Reduction::Min] {
                self.rank(&RankArgs {
                    league,
                    metric: None,
                    method,
                    team: Some(team.clone()),
                    export: None,
                });
            }
            self.trend(&TrendArgs {
                league,
                team,
                metric: None,
                opponent: true,
            });
        }
    }
}

fn load_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set the default level based on verbosity
    let default_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_config = ConfigBuilder::new().add_filter_allow_str("jstats").build();

    TermLogger::init(
        default_level,
        log_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    log::trace!("Args {:#?}", args);

    let config = load_config(&args)?;
    ensure_dir(&args.out_dir)?;
    let dashboard = Dashboard {
        loader: LeagueLoader::new(config),
        out_dir: args.out_dir.clone(),
    };

    match &args.page {
        Page::Home(scatter) => dashboard.home(scatter),
        Page::Preview { rows } => {
            let raw = dashboard.loader.load_all();
            dashboard.preview(&raw, *rows);
        }
        Page::League { league } => dashboard.league(*league),
        Page::Rank(rank) => dashboard.rank(rank),
        Page::Trend(trend) => dashboard.trend(trend),
        Page::Scatter { league, args } => match league {
            Some(league) => {
                let raw = dashboard.loader.load(*league);
                dashboard.scatter(&raw, &league.to_string(), args);
            }
            None => {
                let raw = dashboard.loader.load_all();
                dashboard.scatter(&raw, "all", args);
            }
        },
        Page::Report => dashboard.report(),
    }

    Ok(())
}
