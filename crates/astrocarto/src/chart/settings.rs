use crate::error::{valid_names, AstroError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// House division methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    Placidus,
    Koch,
    Porphyry,
    Regiomontanus,
    Campanus,
    Equal,
    WholeSign,
}

const HOUSE_SYSTEM_NAMES: &[(&str, HouseSystem)] = &[
    ("placidus", HouseSystem::Placidus),
    ("koch", HouseSystem::Koch),
    ("porphyry", HouseSystem::Porphyry),
    ("regiomontanus", HouseSystem::Regiomontanus),
    ("campanus", HouseSystem::Campanus),
    ("equal", HouseSystem::Equal),
    ("whole_sign", HouseSystem::WholeSign),
];

impl HouseSystem {
    pub const ALL: [HouseSystem; 7] = [
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Porphyry,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
        HouseSystem::Equal,
        HouseSystem::WholeSign,
    ];

    pub fn name(self) -> &'static str {
        HOUSE_SYSTEM_NAMES
            .iter()
            .find(|(_, s)| *s == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Systems that divide the diurnal/prime-vertical arcs and need the real MC.
    pub fn is_quadrant(self) -> bool {
        !matches!(self, HouseSystem::Equal | HouseSystem::WholeSign)
    }

    pub fn valid_names() -> Vec<String> {
        valid_names(HOUSE_SYSTEM_NAMES)
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let key = match key.as_str() {
            "wholesign" | "whole" => "whole_sign",
            other => other,
        };
        HOUSE_SYSTEM_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, system)| *system)
            .ok_or_else(|| AstroError::InvalidHouseSystem {
                system: s.to_string(),
                valid: valid_names(HOUSE_SYSTEM_NAMES),
            })
    }
}

/// Zodiac reference frame for longitudes and cusps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacFrame {
    Tropical,
    /// Lahiri ayanamsa
    Sidereal,
}

const ZODIAC_FRAME_NAMES: &[(&str, ZodiacFrame)] = &[
    ("tropical", ZodiacFrame::Tropical),
    ("sidereal", ZodiacFrame::Sidereal),
];

impl ZodiacFrame {
    pub fn from_sidereal_flag(use_sidereal: bool) -> Self {
        if use_sidereal {
            ZodiacFrame::Sidereal
        } else {
            ZodiacFrame::Tropical
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacFrame::Tropical => "tropical",
            ZodiacFrame::Sidereal => "sidereal",
        }
    }
}

impl fmt::Display for ZodiacFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZodiacFrame {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = match key.as_str() {
            "western" => "tropical",
            "vedic" | "lahiri" => "sidereal",
            other => other,
        };
        ZODIAC_FRAME_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, frame)| *frame)
            .ok_or_else(|| AstroError::InvalidZodiacFrame {
                frame: s.to_string(),
                valid: valid_names(ZODIAC_FRAME_NAMES),
            })
    }
}

/// Everything besides instant and place that shapes a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    pub house_system: HouseSystem,
    pub zodiac: ZodiacFrame,
}

impl ChartSettings {
    pub fn new(house_system: HouseSystem, zodiac: ZodiacFrame) -> Self {
        Self { house_system, zodiac }
    }

    /// Parses the string forms used at API boundaries.
    pub fn parse(house_system: &str, use_sidereal: bool) -> Result<Self, AstroError> {
        Ok(Self {
            house_system: house_system.parse()?,
            zodiac: ZodiacFrame::from_sidereal_flag(use_sidereal),
        })
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::Placidus,
            zodiac: ZodiacFrame::Tropical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_system_aliases() {
        assert_eq!("WholeSign".parse::<HouseSystem>().unwrap(), HouseSystem::WholeSign);
        assert_eq!("whole-sign".parse::<HouseSystem>().unwrap(), HouseSystem::WholeSign);
        assert_eq!(" Placidus ".parse::<HouseSystem>().unwrap(), HouseSystem::Placidus);
    }

    #[test]
    fn unknown_house_system_lists_valid_names() {
        match "topocentric".parse::<HouseSystem>() {
            Err(AstroError::InvalidHouseSystem { system, valid }) => {
                assert_eq!(system, "topocentric");
                assert_eq!(valid.len(), 7);
                assert!(valid.contains(&"koch".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zodiac_frame_rejects_unknown() {
        assert_eq!("vedic".parse::<ZodiacFrame>().unwrap(), ZodiacFrame::Sidereal);
        assert!(matches!(
            "draconic".parse::<ZodiacFrame>(),
            Err(AstroError::InvalidZodiacFrame { .. })
        ));
    }
}
