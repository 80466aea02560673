//! Distance-decay scoring of line influences.
//!
//! Each line near a point contributes a signed benefit and an unsigned
//! intensity, both scaled by a continuous kernel of the distance. The
//! contributions are combined with diminishing weights so that a single
//! strong line cannot dominate several moderate ones.

use crate::error::{valid_names, AstroError, Result};
use crate::lines::{Angle, AspectKind};
use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Weight of the k-th strongest influence. Influences past the last weight are ignored.
pub const DIMINISHING_WEIGHTS: [f64; 7] = [1.0, 0.6, 0.35, 0.2, 0.1, 0.08, 0.05];

/// Maps a weighted raw sum (at most 2 × Σweights = 4.76) onto 0..100.
const INTENSITY_SCALE: f64 = 21.0;
const BENEFIT_SCALE: f64 = 10.5;
const VOLATILITY_SCALE: f64 = 42.0;

/// Distance decay kernels. Both are strictly positive and decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelType {
    /// exp(-½ (d/σ)²)
    Gaussian,
    /// exp(-d/λ)
    Exponential,
}

const KERNEL_NAMES: &[(&str, KernelType)] = &[
    ("gaussian", KernelType::Gaussian),
    ("exponential", KernelType::Exponential),
];

impl FromStr for KernelType {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        KERNEL_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, k)| *k)
            .ok_or_else(|| AstroError::InvalidOption {
                option: "kernel",
                value: s.to_string(),
                valid: valid_names(KERNEL_NAMES),
            })
    }
}

/// Aspect between a line's body and the point that made it angular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Trine,
    Sextile,
    Square,
    Quincunx,
    Opposition,
    Sesquisquare,
}

impl AspectType {
    /// Signed factor on benefit; negative aspects flip the line's polarity.
    pub fn benefit_multiplier(self) -> f64 {
        match self {
            AspectType::Conjunction => 1.0,
            AspectType::Trine | AspectType::Sextile => 0.7,
            AspectType::Square => -0.6,
            AspectType::Quincunx => 0.3,
            AspectType::Opposition => -0.5,
            AspectType::Sesquisquare => -0.4,
        }
    }

    pub fn intensity_multiplier(self) -> f64 {
        match self {
            AspectType::Conjunction => 1.0,
            AspectType::Trine | AspectType::Sextile => 0.6,
            AspectType::Square => 0.85,
            AspectType::Quincunx => 0.4,
            AspectType::Opposition => 0.8,
            AspectType::Sesquisquare => 0.7,
        }
    }
}

impl From<AspectKind> for AspectType {
    fn from(kind: AspectKind) -> Self {
        match kind {
            AspectKind::Trine => AspectType::Trine,
            AspectKind::Sextile => AspectType::Sextile,
            AspectKind::Square => AspectType::Square,
        }
    }
}

/// How distance turns into influence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub kernel: KernelType,
    /// σ for Gaussian, λ for exponential; km
    pub kernel_parameter: f64,
    /// Radius (km) inside which a line counts as an influence for reporting
    /// and city ranking. Grid scores have no cutoff.
    pub max_distance_km: f64,
    /// Weight of volatility in balanced city ranking
    pub volatility_penalty: f64,
}

impl ScoringConfig {
    pub fn balanced() -> Self {
        Self {
            kernel: KernelType::Gaussian,
            kernel_parameter: 180.0,
            max_distance_km: 500.0,
            volatility_penalty: 0.3,
        }
    }

    /// Faster falloff, more weight on volatility.
    pub fn high_precision() -> Self {
        Self {
            kernel: KernelType::Gaussian,
            kernel_parameter: 120.0,
            max_distance_km: 600.0,
            volatility_penalty: 0.4,
        }
    }

    /// Long exponential tail.
    pub fn relaxed() -> Self {
        Self {
            kernel: KernelType::Exponential,
            kernel_parameter: 300.0,
            max_distance_km: 500.0,
            volatility_penalty: 0.2,
        }
    }

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balanced" => Ok(Self::balanced()),
            "high_precision" => Ok(Self::high_precision()),
            "relaxed" => Ok(Self::relaxed()),
            _ => Err(AstroError::InvalidOption {
                option: "scoring preset",
                value: name.to_string(),
                valid: vec!["balanced".into(), "high_precision".into(), "relaxed".into()],
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.kernel_parameter.is_finite() && self.kernel_parameter > 0.0) {
            return Err(AstroError::InvalidScoutConfig {
                field: "kernel_parameter",
                message: format!("must be a positive distance, got {}", self.kernel_parameter),
            });
        }
        if !(self.max_distance_km.is_finite() && self.max_distance_km > 0.0) {
            return Err(AstroError::InvalidScoutConfig {
                field: "max_distance_km",
                message: format!("must be positive, got {}", self.max_distance_km),
            });
        }
        if !(self.volatility_penalty.is_finite() && self.volatility_penalty >= 0.0) {
            return Err(AstroError::InvalidScoutConfig {
                field: "volatility_penalty",
                message: format!("must be non-negative, got {}", self.volatility_penalty),
            });
        }
        Ok(())
    }

    /// Kernel value in (0, 1] for a distance in km.
    pub fn kernel(&self, distance_km: f64) -> f64 {
        match self.kernel {
            KernelType::Gaussian => gaussian_kernel(distance_km, self.kernel_parameter),
            KernelType::Exponential => exponential_kernel(distance_km, self.kernel_parameter),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

pub fn gaussian_kernel(distance_km: f64, sigma_km: f64) -> f64 {
    (-0.5 * (distance_km / sigma_km).powi(2)).exp()
}

pub fn exponential_kernel(distance_km: f64, lambda_km: f64) -> f64 {
    (-distance_km / lambda_km).exp()
}

/// Rating 1..=5 to signed benefit -2..=+2.
pub fn rating_to_benefit(rating: u8) -> f64 {
    f64::from(rating) - 3.0
}

pub fn rating_to_intensity(rating: u8) -> f64 {
    (f64::from(rating) - 3.0).abs()
}

/// One line's effect on one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influence {
    pub body: Body,
    pub angle: Angle,
    pub rating: u8,
    pub aspect: Option<AspectType>,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub benefit: f64,
    pub intensity: f64,
    /// Non-zero when an aspect flipped the line's polarity
    pub volatility: f64,
}

impl Influence {
    pub fn contribution(&self, config: &ScoringConfig) -> Contribution {
        let kernel = config.kernel(self.distance_km);
        let base_benefit = rating_to_benefit(self.rating);
        let base_intensity = rating_to_intensity(self.rating);
        let (benefit_mult, intensity_mult) = self
            .aspect
            .map(|a| (a.benefit_multiplier(), a.intensity_multiplier()))
            .unwrap_or((1.0, 1.0));

        let volatility = if benefit_mult < 0.0 && base_benefit != 0.0 {
            base_benefit.abs() * kernel
        } else {
            0.0
        };

        Contribution {
            benefit: base_benefit * benefit_mult * kernel,
            intensity: base_intensity * intensity_mult * kernel,
            volatility,
        }
    }
}

/// Aggregate scores of a location, all in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointScore {
    /// Strength of favourable influence; 0 with no supportive lines
    pub overall: f64,
    /// Net polarity, 50 = neutral
    pub benefit: f64,
    pub intensity: f64,
    pub volatility: f64,
    /// 100 - volatility
    pub stability: f64,
    /// Both supportive and challenging influence of weight
    pub mixed: bool,
    /// Influences within `max_distance_km`
    pub influence_count: usize,
    pub min_distance_km: f64,
}

impl PointScore {
    pub fn empty() -> Self {
        Self {
            overall: 0.0,
            benefit: 50.0,
            intensity: 0.0,
            volatility: 0.0,
            stability: 100.0,
            mixed: false,
            influence_count: 0,
            min_distance_km: f64::INFINITY,
        }
    }

    /// Benefit minus volatility scaled by the penalty.
    pub fn balanced_benefit(&self, volatility_penalty: f64) -> f64 {
        self.benefit - self.volatility * volatility_penalty
    }
}

/// Diminishing-weighted sum over the largest values first.
fn weighted_top(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    sorted.iter().zip(DIMINISHING_WEIGHTS).map(|(v, w)| v * w).sum()
}

/// Combines every influence on one location.
///
/// The benefit/intensity/volatility sub-scores rank contributions by absolute
/// benefit and keep the strongest seven. The overall score ranks only the
/// supportive part of each contribution; it is non-decreasing as any line
/// moves closer and zero when nothing supportive is present.
pub fn score_influences(influences: &[Influence], config: &ScoringConfig) -> PointScore {
    if influences.is_empty() {
        return PointScore::empty();
    }

    let mut contributions: Vec<Contribution> = influences.iter().map(|i| i.contribution(config)).collect();
    contributions.sort_by(|a, b| b.benefit.abs().partial_cmp(&a.benefit.abs()).unwrap_or(Ordering::Equal));

    let top = || contributions.iter().zip(DIMINISHING_WEIGHTS);
    let benefit_raw: f64 = top().map(|(c, w)| c.benefit * w).sum();
    let intensity_raw: f64 = top().map(|(c, w)| c.intensity * w).sum();
    let positive: f64 = top().map(|(c, w)| c.benefit.max(0.0) * w).sum();
    let negative: f64 = top().map(|(c, w)| (-c.benefit).max(0.0) * w).sum();

    let volatility = ((positive * negative).sqrt() * VOLATILITY_SCALE).clamp(0.0, 100.0);
    let overall = (weighted_top(contributions.iter().map(|c| c.benefit.max(0.0))) * INTENSITY_SCALE).clamp(0.0, 100.0);

    PointScore {
        overall,
        benefit: (50.0 + benefit_raw * BENEFIT_SCALE).clamp(0.0, 100.0),
        intensity: (intensity_raw * INTENSITY_SCALE).clamp(0.0, 100.0),
        volatility,
        stability: 100.0 - volatility,
        mixed: positive > 0.5 && negative > 0.5,
        influence_count: influences.iter().filter(|i| i.distance_km <= config.max_distance_km).count(),
        min_distance_km: influences.iter().map(|i| i.distance_km).fold(f64::INFINITY, f64::min),
    }
}
