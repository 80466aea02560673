use super::scoring::ScoringConfig;
use crate::error::{AstroError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on hot zones refined per query.
pub const MAX_HOT_ZONES: usize = 100;

/// Tunables of a scout query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Coarse grid spacing, degrees
    pub coarse_step: f64,
    /// Refinement grid spacing, degrees
    pub fine_step: f64,
    /// Half-width of the square refined around each hot zone, degrees
    pub refine_radius_deg: f64,
    pub top_n_coarse: usize,
    /// Minimum great-circle separation of hot zones, degrees
    pub cluster_radius_deg: f64,
    /// Skip coarse points outside the land mask
    pub exclude_water: bool,
    pub scoring: ScoringConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            coarse_step: 2.0,
            fine_step: 0.5,
            refine_radius_deg: 2.0,
            top_n_coarse: 20,
            cluster_radius_deg: 5.0,
            exclude_water: true,
            scoring: ScoringConfig::default(),
        }
    }
}

fn positive_step(field: &'static str, value: f64, max: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(AstroError::InvalidScoutConfig {
            field,
            message: format!("must be in (0, {max}], got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AstroError::InvalidScoutConfig {
            field,
            message: format!("must be a non-negative number of degrees, got {value}"),
        })
    }
}

impl ScoutConfig {
    pub fn validate(&self) -> Result<()> {
        positive_step("coarse_step", self.coarse_step, 90.0)?;
        positive_step("fine_step", self.fine_step, 90.0)?;
        non_negative("refine_radius_deg", self.refine_radius_deg)?;
        non_negative("cluster_radius_deg", self.cluster_radius_deg)?;
        if self.top_n_coarse > MAX_HOT_ZONES {
            return Err(AstroError::InvalidScoutConfig {
                field: "top_n_coarse",
                message: format!("at most {MAX_HOT_ZONES} hot zones, got {}", self.top_n_coarse),
            });
        }
        self.scoring.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ScoutConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_fields() {
        let bad_step = ScoutConfig {
            coarse_step: 0.0,
            ..ScoutConfig::default()
        };
        assert!(matches!(
            bad_step.validate(),
            Err(AstroError::InvalidScoutConfig { field: "coarse_step", .. })
        ));

        let too_many = ScoutConfig {
            top_n_coarse: 101,
            ..ScoutConfig::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(AstroError::InvalidScoutConfig { field: "top_n_coarse", .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ScoutConfig = serde_json::from_str(r#"{"coarse_step": 5.0, "exclude_water": false}"#).unwrap();
        assert_eq!(config.coarse_step, 5.0);
        assert!(!config.exclude_water);
        assert_eq!(config.fine_step, 0.5);
    }
}
