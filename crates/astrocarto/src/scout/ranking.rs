//! Ranking named places instead of grid points.

use super::influence::ScoutLines;
use super::scoring::{score_influences, Influence, ScoringConfig};
use crate::error::{AstroError, Result};
use crate::geo::GeoPoint;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Influences listed per ranked city.
const TOP_INFLUENCES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
    #[serde(flatten)]
    pub location: GeoPoint,
}

impl City {
    pub fn new(name: impl Into<String>, country: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityNature {
    Beneficial,
    Challenging,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    BenefitFirst,
    IntensityFirst,
    /// Benefit minus volatility times the configured penalty
    BalancedBenefit,
}

const SORT_MODE_NAMES: &[(&str, SortMode)] = &[
    ("benefit", SortMode::BenefitFirst),
    ("intensity", SortMode::IntensityFirst),
    ("balanced", SortMode::BalancedBenefit),
];

impl FromStr for SortMode {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        let key = key.trim_end_matches("_first").trim_end_matches("_benefit");
        SORT_MODE_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, m)| *m)
            .ok_or_else(|| AstroError::InvalidOption {
                option: "sort mode",
                value: s.to_string(),
                valid: SORT_MODE_NAMES.iter().map(|(n, _)| n.to_string()).collect(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRanking {
    pub name: String,
    pub country: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    pub benefit: f64,
    pub intensity: f64,
    pub volatility: f64,
    pub mixed: bool,
    pub nature: CityNature,
    /// Nearest influences first
    pub top_influences: Vec<Influence>,
}

impl CityRanking {
    fn balanced_benefit(&self, penalty: f64) -> f64 {
        self.benefit - self.volatility * penalty
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCountry {
    pub country: String,
    /// Best benefit first
    pub cities: Vec<CityRanking>,
    pub beneficial_count: usize,
    pub challenging_count: usize,
}

impl RankedCountry {
    fn top_benefit(&self) -> f64 {
        self.cities.first().map(|c| c.benefit).unwrap_or(0.0)
    }
}

fn nature_of(benefit: f64, mixed: bool) -> CityNature {
    if mixed {
        CityNature::Mixed
    } else if benefit > 52.0 {
        CityNature::Beneficial
    } else if benefit < 48.0 {
        CityNature::Challenging
    } else {
        CityNature::Mixed
    }
}

/// Scores each city from the lines within `max_distance_km` of it.
///
/// Cities with no such line are left out. Ties keep the input order.
pub fn rank_cities_by_category(
    cities: &[City],
    lines: &ScoutLines,
    config: &ScoringConfig,
    sort_mode: SortMode,
) -> Vec<CityRanking> {
    let mut rankings: Vec<CityRanking> = cities
        .iter()
        .filter_map(|city| {
            let influences = lines.influences_within(city.location, config.max_distance_km);
            if influences.is_empty() {
                return None;
            }
            let score = score_influences(&influences, config);
            Some(CityRanking {
                name: city.name.clone(),
                country: city.country.clone(),
                location: city.location,
                benefit: score.benefit,
                intensity: score.intensity,
                volatility: score.volatility,
                mixed: score.mixed,
                nature: nature_of(score.benefit, score.mixed),
                top_influences: influences.into_iter().take(TOP_INFLUENCES).collect(),
            })
        })
        .collect();

    match sort_mode {
        SortMode::BenefitFirst => rankings.sort_by(|a, b| b.benefit.total_cmp(&a.benefit)),
        SortMode::IntensityFirst => rankings.sort_by(|a, b| b.intensity.total_cmp(&a.intensity)),
        SortMode::BalancedBenefit => {
            let penalty = config.volatility_penalty;
            rankings.sort_by(|a, b| b.balanced_benefit(penalty).total_cmp(&a.balanced_benefit(penalty)))
        }
    }

    debug!(
        "ranked {} of {} cities ({:?}, {:?})",
        rankings.len(),
        cities.len(),
        lines.category(),
        sort_mode
    );
    rankings
}

/// Groups rankings by country; countries ordered by their best city.
pub fn group_and_rank_countries(rankings: Vec<CityRanking>) -> Vec<RankedCountry> {
    let mut by_country: BTreeMap<String, Vec<CityRanking>> = BTreeMap::new();
    for city in rankings {
        by_country.entry(city.country.clone()).or_default().push(city);
    }

    let mut countries: Vec<RankedCountry> = by_country
        .into_iter()
        .map(|(country, mut cities)| {
            cities.sort_by(|a, b| b.benefit.total_cmp(&a.benefit));
            RankedCountry {
                beneficial_count: cities.iter().filter(|c| c.nature == CityNature::Beneficial).count(),
                challenging_count: cities.iter().filter(|c| c.nature == CityNature::Challenging).count(),
                country,
                cities,
            }
        })
        .collect();
    countries.sort_by(|a, b| b.top_benefit().total_cmp(&a.top_benefit()));
    countries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(name: &str, country: &str, benefit: f64, volatility: f64) -> CityRanking {
        CityRanking {
            name: name.into(),
            country: country.into(),
            location: GeoPoint::new(0.0, 0.0),
            benefit,
            intensity: 0.0,
            volatility,
            mixed: false,
            nature: nature_of(benefit, false),
            top_influences: Vec::new(),
        }
    }

    #[test]
    fn nature_thresholds() {
        assert_eq!(nature_of(60.0, false), CityNature::Beneficial);
        assert_eq!(nature_of(40.0, false), CityNature::Challenging);
        assert_eq!(nature_of(50.0, false), CityNature::Mixed);
        assert_eq!(nature_of(90.0, true), CityNature::Mixed);
    }

    #[test]
    fn sort_mode_names() {
        assert_eq!("benefit-first".parse::<SortMode>().unwrap(), SortMode::BenefitFirst);
        assert_eq!("balanced_benefit".parse::<SortMode>().unwrap(), SortMode::BalancedBenefit);
        assert_eq!("Intensity".parse::<SortMode>().unwrap(), SortMode::IntensityFirst);
        assert!("random".parse::<SortMode>().is_err());
    }

    #[test]
    fn countries_follow_their_best_city() {
        let countries = group_and_rank_countries(vec![
            ranking("Lyon", "France", 55.0, 0.0),
            ranking("Kyoto", "Japan", 70.0, 0.0),
            ranking("Paris", "France", 65.0, 0.0),
            ranking("Osaka", "Japan", 40.0, 0.0),
        ]);
        assert_eq!(countries[0].country, "Japan");
        assert_eq!(countries[1].cities[0].name, "Paris");
        assert_eq!(countries[1].beneficial_count, 2);
        assert_eq!(countries[0].challenging_count, 1);
    }
}
