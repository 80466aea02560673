use anyhow::Context;
use astrocarto::chart::{ChartSettings, HouseSystem, ZodiacFrame};
use astrocarto::lines::{check_ray_sampling, LineOptions};
use astrocarto::scout::{KernelType, LifeCategory, ScoringConfig, ScoutConfig, SortMode};
use astrocarto::Body;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Searched in order when no explicit path is given.
pub const CONFIG_PATHS: [&str; 2] = ["configs/astrocarto.toml", "../../configs/astrocarto.toml"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSpaceDefaults {
    pub max_distance_km: f64,
    pub step_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimezoneDefaults {
    pub display_timeout: Duration,
}

/// Scout tunables plus the defaults for category and city ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoutDefaults {
    pub config: ScoutConfig,
    pub category: Option<LifeCategory>,
    pub sort_mode: SortMode,
}

/// Validated settings for every calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct AstrocartoSettings {
    pub chart: ChartSettings,
    pub lines: LineOptions,
    pub local_space: LocalSpaceDefaults,
    pub scout: ScoutDefaults,
    pub timezone: TimezoneDefaults,
}

impl Default for AstrocartoSettings {
    fn default() -> Self {
        Self {
            chart: ChartSettings::default(),
            lines: LineOptions::default(),
            local_space: LocalSpaceDefaults {
                max_distance_km: 15_000.0,
                step_km: 200.0,
            },
            scout: ScoutDefaults {
                config: ScoutConfig::default(),
                category: None,
                sort_mode: SortMode::BalancedBenefit,
            },
            timezone: TimezoneDefaults {
                display_timeout: Duration::from_millis(2000),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ChartToml {
    house_system: String,
    zodiac: String,
}

impl Default for ChartToml {
    fn default() -> Self {
        Self {
            house_system: "placidus".to_string(),
            zodiac: "tropical".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LinesToml {
    longitude_step_deg: f64,
    bodies: Option<Vec<String>>,
    include_aspect_lines: bool,
    include_parans: bool,
}

impl Default for LinesToml {
    fn default() -> Self {
        Self {
            longitude_step_deg: 1.0,
            bodies: None,
            include_aspect_lines: false,
            include_parans: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LocalSpaceToml {
    max_distance_km: f64,
    step_km: f64,
}

impl Default for LocalSpaceToml {
    fn default() -> Self {
        Self {
            max_distance_km: 15_000.0,
            step_km: 200.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScoutToml {
    coarse_step: f64,
    fine_step: f64,
    refine_radius_deg: f64,
    top_n_coarse: usize,
    cluster_radius_deg: f64,
    exclude_water: bool,
    preset: String,
    kernel: Option<String>,
    kernel_parameter: Option<f64>,
    max_distance_km: Option<f64>,
    volatility_penalty: Option<f64>,
    category: Option<String>,
    sort_mode: String,
}

impl Default for ScoutToml {
    fn default() -> Self {
        let defaults = ScoutConfig::default();
        Self {
            coarse_step: defaults.coarse_step,
            fine_step: defaults.fine_step,
            refine_radius_deg: defaults.refine_radius_deg,
            top_n_coarse: defaults.top_n_coarse,
            cluster_radius_deg: defaults.cluster_radius_deg,
            exclude_water: defaults.exclude_water,
            preset: "balanced".to_string(),
            kernel: None,
            kernel_parameter: None,
            max_distance_km: None,
            volatility_penalty: None,
            category: None,
            sort_mode: "balanced".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimezoneToml {
    display_timeout_ms: u64,
}

impl Default for TimezoneToml {
    fn default() -> Self {
        Self { display_timeout_ms: 2000 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RootConfigToml {
    chart: ChartToml,
    lines: LinesToml,
    local_space: LocalSpaceToml,
    scout: ScoutToml,
    timezone: TimezoneToml,
}

fn parse_key<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().with_context(|| format!("invalid value for {key}"))
}

fn positive(key: &str, value: f64) -> anyhow::Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        anyhow::bail!("{key} must be positive, got {value}")
    }
}

impl RootConfigToml {
    fn into_settings(self) -> anyhow::Result<AstrocartoSettings> {
        let chart = ChartSettings::new(
            parse_key::<HouseSystem>("chart.house_system", &self.chart.house_system)?,
            parse_key::<ZodiacFrame>("chart.zodiac", &self.chart.zodiac)?,
        );

        let bodies = match self.lines.bodies {
            Some(names) => names
                .iter()
                .map(|name| parse_key::<Body>("lines.bodies", name))
                .collect::<anyhow::Result<Vec<_>>>()?,
            None => Body::ALL.to_vec(),
        };
        let lines = LineOptions {
            longitude_step_deg: positive("lines.longitude_step_deg", self.lines.longitude_step_deg)?,
            bodies,
            include_aspect_lines: self.lines.include_aspect_lines,
            include_parans: self.lines.include_parans,
        };

        let local_space = LocalSpaceDefaults {
            max_distance_km: positive("local_space.max_distance_km", self.local_space.max_distance_km)?,
            step_km: positive("local_space.step_km", self.local_space.step_km)?,
        };
        check_ray_sampling(local_space.max_distance_km, local_space.step_km).context("invalid [local_space] table")?;

        let scout = self.scout;
        let mut scoring = ScoringConfig::preset(&scout.preset).context("invalid value for scout.preset")?;
        if let Some(kernel) = &scout.kernel {
            scoring.kernel = parse_key::<KernelType>("scout.kernel", kernel)?;
        }
        if let Some(value) = scout.kernel_parameter {
            scoring.kernel_parameter = value;
        }
        if let Some(value) = scout.max_distance_km {
            scoring.max_distance_km = value;
        }
        if let Some(value) = scout.volatility_penalty {
            scoring.volatility_penalty = value;
        }
        let config = ScoutConfig {
            coarse_step: scout.coarse_step,
            fine_step: scout.fine_step,
            refine_radius_deg: scout.refine_radius_deg,
            top_n_coarse: scout.top_n_coarse,
            cluster_radius_deg: scout.cluster_radius_deg,
            exclude_water: scout.exclude_water,
            scoring,
        };
        config.validate().context("invalid [scout] table")?;
        let category = scout
            .category
            .as_deref()
            .map(|name| parse_key::<LifeCategory>("scout.category", name))
            .transpose()?;
        let sort_mode = parse_key::<SortMode>("scout.sort_mode", &scout.sort_mode)?;

        Ok(AstrocartoSettings {
            chart,
            lines,
            local_space,
            scout: ScoutDefaults {
                config,
                category,
                sort_mode,
            },
            timezone: TimezoneDefaults {
                display_timeout: Duration::from_millis(self.timezone.display_timeout_ms),
            },
        })
    }
}

/// Parses and validates the text of an `astrocarto.toml`.
pub fn parse_settings(text: &str) -> anyhow::Result<AstrocartoSettings> {
    let root: RootConfigToml = toml::from_str(text).context("Failed to parse astrocarto.toml")?;
    root.into_settings()
}

/// Loads an explicit config file; a missing file is an error here.
pub fn load_settings_from(path: &Path) -> anyhow::Result<AstrocartoSettings> {
    let text = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("in {}", path.display()))
}

/// First config file found on the search paths.
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_PATHS.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Loads `astrocarto.toml` from the search paths, or built-in defaults when none exists.
pub fn load_settings() -> anyhow::Result<AstrocartoSettings> {
    match find_config_file() {
        Some(path) => load_settings_from(&path),
        None => {
            warn!("no astrocarto.toml found in {:?}, using defaults", CONFIG_PATHS);
            Ok(AstrocartoSettings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, AstrocartoSettings::default());
        assert_eq!(settings.chart.house_system, HouseSystem::Placidus);
        assert_eq!(settings.lines.bodies.len(), Body::ALL.len());
        assert_eq!(settings.scout.config, ScoutConfig::default());
        assert_eq!(settings.scout.sort_mode, SortMode::BalancedBenefit);
    }

    #[test]
    fn reads_every_table() {
        let text = r#"
            [chart]
            house_system = "whole_sign"
            zodiac = "sidereal"

            [lines]
            longitude_step_deg = 0.5
            bodies = ["sun", "moon", "north_node"]
            include_parans = true

            [local_space]
            step_km = 50.0

            [scout]
            coarse_step = 3.0
            preset = "relaxed"
            volatility_penalty = 0.5
            category = "love"
            sort_mode = "intensity"

            [timezone]
            display_timeout_ms = 500
        "#;
        let settings = parse_settings(text).unwrap();
        assert_eq!(settings.chart.zodiac, ZodiacFrame::Sidereal);
        assert_eq!(settings.lines.bodies, vec![Body::Sun, Body::Moon, Body::NorthNode]);
        assert!(settings.lines.include_parans);
        assert_eq!(settings.local_space.step_km, 50.0);
        assert_eq!(settings.local_space.max_distance_km, 15_000.0);
        assert_eq!(settings.scout.config.coarse_step, 3.0);
        assert_eq!(settings.scout.config.scoring.kernel, KernelType::Exponential);
        assert_eq!(settings.scout.config.scoring.volatility_penalty, 0.5);
        assert_eq!(settings.scout.category, Some(LifeCategory::Love));
        assert_eq!(settings.scout.sort_mode, SortMode::IntensityFirst);
        assert_eq!(settings.timezone.display_timeout, Duration::from_millis(500));
    }

    #[test]
    fn names_the_bad_key() {
        let err = parse_settings("[chart]\nhouse_system = \"topocentric\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("chart.house_system"), "{err:#}");

        let err = parse_settings("[scout]\ncategory = \"fame\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("scout.category"), "{err:#}");

        let err = parse_settings("[scout]\nfine_step = 0.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("fine_step"), "{err:#}");
    }

    #[test]
    fn bounds_local_space_sampling() {
        let err = parse_settings("[local_space]\nmax_distance_km = 1e300\nstep_km = 1.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("max_distance_km"), "{err:#}");

        let err = parse_settings("[local_space]\nmax_distance_km = 20000.0\nstep_km = 0.000001\n").unwrap_err();
        assert!(format!("{err:#}").contains("step_km"), "{err:#}");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse_settings("[chart]\nhouse = \"koch\"\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nhouse_system = \"koch\"").unwrap();
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.chart.house_system, HouseSystem::Koch);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart\nhouse_system = ").unwrap();
        assert!(load_settings_from(file.path()).is_err());
        assert!(load_settings_from(Path::new("/nonexistent/astrocarto.toml")).is_err());
    }
}
