mod display;

use anyhow::Context;
use astrocarto::chart::ZodiacFrame;
use astrocarto::scout::{group_and_rank_countries, CancellationToken, City, LifeCategory, ScoringConfig, SortMode};
use astrocarto::timezone::display::CachedDisplayLookup;
use astrocarto::{AstroEngine, Body, CivilDateTime, GeoPoint};
use astrocarto_config::AstrocartoSettings;
use chrono::{NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Astrocartography lines, charts and location scouting")]
struct Cli {
    /// Explicit config file (otherwise configs/astrocarto.toml is searched).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

/// Birth moment: a local wall-clock time at a place.
#[derive(Args, Debug, Clone)]
struct BirthArgs {
    /// Local civil time, `YYYY-MM-DDTHH:MM[:SS]`.
    #[arg(long, value_parser = parse_civil)]
    time: CivilDateTime,

    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
}

impl BirthArgs {
    fn location(&self) -> anyhow::Result<GeoPoint> {
        GeoPoint::checked(self.lat, self.lng).context("invalid birth location")
    }
}

/// Line selection shared by every command that projects lines.
#[derive(Args, Debug, Clone)]
struct LineArgs {
    /// Sweep step in degrees of longitude.
    #[arg(long)]
    step: Option<f64>,

    /// Comma-separated bodies, e.g. `sun,moon,venus`.
    #[arg(long, value_delimiter = ',')]
    bodies: Vec<Body>,

    #[arg(long)]
    aspect_lines: bool,

    #[arg(long)]
    parans: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// MC/IC/ASC/DSC lines of every body.
    Lines {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        lines: LineArgs,
    },
    /// Azimuth rays from the birth place.
    LocalSpace {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        max_distance_km: Option<f64>,
        #[arg(long)]
        step_km: Option<f64>,
    },
    /// Natal chart with houses.
    Natal {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        house_system: Option<String>,
        #[arg(long)]
        sidereal: bool,
    },
    /// Natal chart recast at another place.
    Relocate {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long, allow_negative_numbers = true)]
        target_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        target_lng: f64,
        #[arg(long)]
        house_system: Option<String>,
        #[arg(long)]
        sidereal: bool,
    },
    /// Timezone name and offset of a coordinate.
    Timezone {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Local civil time for the offset; defaults to now.
        #[arg(long, value_parser = parse_civil)]
        time: Option<CivilDateTime>,
    },
    /// Global search for the best-scoring places.
    Scout {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        lines: LineArgs,
        #[arg(long)]
        category: Option<LifeCategory>,
        /// Scoring preset: balanced, high_precision or relaxed.
        #[arg(long)]
        preset: Option<String>,
        #[arg(long)]
        coarse_step: Option<f64>,
        #[arg(long)]
        fine_step: Option<f64>,
        /// Keep water cells in the coarse grid.
        #[arg(long)]
        include_water: bool,
        /// Refined points to print.
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Scores a list of cities read from a JSON file.
    RankCities {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        lines: LineArgs,
        /// JSON array of `{ "name", "country", "lat", "lng" }`.
        #[arg(long)]
        cities: PathBuf,
        #[arg(long)]
        category: Option<LifeCategory>,
        #[arg(long)]
        sort: Option<SortMode>,
        #[arg(long)]
        preset: Option<String>,
        /// Group the ranking by country.
        #[arg(long)]
        by_country: bool,
    },
}

const CIVIL_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_civil(value: &str) -> Result<CivilDateTime, String> {
    CIVIL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim(), fmt).ok())
        .map(|dt| CivilDateTime::from_naive(&dt))
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got '{value}'"))
}

fn line_options(settings: &AstrocartoSettings, args: &LineArgs) -> astrocarto::lines::LineOptions {
    let mut options = settings.lines.clone();
    if let Some(step) = args.step {
        options.longitude_step_deg = step;
    }
    if !args.bodies.is_empty() {
        options.bodies = args.bodies.clone();
    }
    options.include_aspect_lines |= args.aspect_lines;
    options.include_parans |= args.parans;
    options
}

fn scoring(settings: &AstrocartoSettings, preset: Option<&str>) -> anyhow::Result<ScoringConfig> {
    match preset {
        Some(name) => ScoringConfig::preset(name).context("invalid --preset"),
        None => Ok(settings.scout.config.scoring),
    }
}

fn load_cities(path: &Path) -> anyhow::Result<Vec<City>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse cities in {}", path.display()))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[derive(Serialize)]
struct TimezoneReport {
    name: String,
    offset_hours: f64,
    display: astrocarto::timezone::display::DisplayTimezone,
}

async fn run(cli: Cli, settings: AstrocartoSettings) -> anyhow::Result<()> {
    let engine = AstroEngine::new();
    let pretty = cli.pretty;
    let sidereal_default = settings.chart.zodiac == ZodiacFrame::Sidereal;
    let house_default = settings.chart.house_system.name();

    match cli.command {
        Command::Lines { birth, lines } => {
            let options = line_options(&settings, &lines);
            let jd_utc = engine.local_to_utc_julian_date(birth.location()?, &birth.time);
            emit(&engine.calculate_lines_with(jd_utc, &options)?, pretty)
        }
        Command::LocalSpace {
            birth,
            max_distance_km,
            step_km,
        } => {
            let rays = engine.calculate_local_space_lines(
                birth.location()?,
                &birth.time,
                max_distance_km.unwrap_or(settings.local_space.max_distance_km),
                step_km.unwrap_or(settings.local_space.step_km),
            )?;
            emit(&rays, pretty)
        }
        Command::Natal {
            birth,
            house_system,
            sidereal,
        } => {
            let chart = engine.calculate_natal_chart(
                birth.location()?,
                &birth.time,
                house_system.as_deref().unwrap_or(house_default),
                sidereal || sidereal_default,
            )?;
            emit(&chart, pretty)
        }
        Command::Relocate {
            birth,
            target_lat,
            target_lng,
            house_system,
            sidereal,
        } => {
            let target = GeoPoint::checked(target_lat, target_lng).context("invalid target location")?;
            let result = engine.calculate_relocation_chart(
                &birth.time,
                birth.location()?,
                target,
                house_system.as_deref().unwrap_or(house_default),
                sidereal || sidereal_default,
            )?;
            emit(&result, pretty)
        }
        Command::Timezone { lat, lng, time } => {
            let name = engine.timezone_name(lat, lng)?;
            let local = time.unwrap_or_else(|| CivilDateTime::from_naive(&chrono::Local::now().naive_local()));
            let offset_hours = engine.timezone_offset_hours(lat, lng, &local)?;
            let at = local
                .to_naive()
                .map(|naive| Utc.from_utc_datetime(&(naive - chrono::Duration::seconds((offset_hours * 3600.0) as i64))))
                .unwrap_or_else(Utc::now);
            let lookup = CachedDisplayLookup::new(
                display::OfflineDisplayProvider::new(engine.timezones()),
                settings.timezone.display_timeout,
            );
            let display = lookup.lookup(lat, lng, at).await;
            emit(
                &TimezoneReport {
                    name,
                    offset_hours,
                    display,
                },
                pretty,
            )
        }
        Command::Scout {
            birth,
            lines,
            category,
            preset,
            coarse_step,
            fine_step,
            include_water,
            limit,
        } => {
            let mut config = settings.scout.config;
            config.scoring = scoring(&settings, preset.as_deref())?;
            if let Some(step) = coarse_step {
                config.coarse_step = step;
            }
            if let Some(step) = fine_step {
                config.fine_step = step;
            }
            config.exclude_water &= !include_water;

            let category = category.or(settings.scout.category);
            let scout_lines = engine.scout_lines(birth.location()?, &birth.time, &line_options(&settings, &lines), category)?;

            let cancel = CancellationToken::new();
            let watcher = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling scout run");
                    watcher.cancel();
                }
            });

            let mut result = engine.scout_async(scout_lines, config, cancel).await?;
            info!(
                "scout {} found {} hot zones, {} refined points",
                result.run_id,
                result.hot_zones.len(),
                result.points.len()
            );
            result.points.truncate(limit);
            emit(&result, pretty)
        }
        Command::RankCities {
            birth,
            lines,
            cities,
            category,
            sort,
            preset,
            by_country,
        } => {
            let cities = load_cities(&cities)?;
            let category = category.or(settings.scout.category);
            let scout_lines = engine.scout_lines(birth.location()?, &birth.time, &line_options(&settings, &lines), category)?;
            let ranking = engine.rank_cities(
                &cities,
                &scout_lines,
                &scoring(&settings, preset.as_deref())?,
                sort.unwrap_or(settings.scout.sort_mode),
            )?;
            if by_country {
                emit(&group_and_rank_countries(ranking), pretty)
            } else {
                emit(&ranking, pretty)
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = match &cli.config {
        Some(path) => astrocarto_config::load_settings_from(path)?,
        None => astrocarto_config::load_settings()?,
    };

    run(cli, settings).await
}
