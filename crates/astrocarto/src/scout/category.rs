//! Which lines help or hinder each area of life.

use crate::ephemeris::Body;
use crate::error::{valid_names, AstroError};
use crate::lines::Angle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeCategory {
    Career,
    Love,
    Health,
    Home,
    Wellbeing,
    Wealth,
}

const CATEGORY_NAMES: &[(&str, LifeCategory)] = &[
    ("career", LifeCategory::Career),
    ("love", LifeCategory::Love),
    ("health", LifeCategory::Health),
    ("home", LifeCategory::Home),
    ("wellbeing", LifeCategory::Wellbeing),
    ("wealth", LifeCategory::Wealth),
];

impl LifeCategory {
    pub const ALL: [LifeCategory; 6] = [
        LifeCategory::Career,
        LifeCategory::Love,
        LifeCategory::Health,
        LifeCategory::Home,
        LifeCategory::Wellbeing,
        LifeCategory::Wealth,
    ];

    pub fn name(self) -> &'static str {
        CATEGORY_NAMES
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    fn beneficial(self) -> &'static [(Body, Angle)] {
        use Angle::*;
        use Body::*;
        match self {
            LifeCategory::Career => &[
                (Sun, Mc),
                (Jupiter, Mc),
                (Mercury, Mc),
                (Venus, Mc),
                (Mars, Mc),
                (Saturn, Mc),
                (Pluto, Mc),
                (Sun, Asc),
                (Mars, Asc),
                (Jupiter, Asc),
                (Mercury, Asc),
            ],
            LifeCategory::Love => &[
                (Venus, Dsc),
                (Sun, Dsc),
                (Jupiter, Dsc),
                (Moon, Dsc),
                (Venus, Asc),
                (Sun, Asc),
                (Mars, Asc),
                (Jupiter, Asc),
            ],
            LifeCategory::Health => &[
                (Sun, Asc),
                (Jupiter, Asc),
                (Moon, Asc),
                (Mars, Asc),
                (Venus, Ic),
                (Jupiter, Mc),
                (Venus, Mc),
                (Sun, Ic),
                (Moon, Ic),
            ],
            LifeCategory::Home => &[
                (Venus, Ic),
                (Moon, Ic),
                (Jupiter, Ic),
                (Sun, Ic),
                (Saturn, Ic),
                (Venus, Asc),
                (Moon, Asc),
                (Jupiter, Asc),
                (Mercury, Ic),
            ],
            LifeCategory::Wellbeing => &[
                (Venus, Asc),
                (Venus, Ic),
                (Venus, Dsc),
                (Jupiter, Asc),
                (Jupiter, Mc),
                (Jupiter, Ic),
                (Jupiter, Dsc),
                (Moon, Ic),
                (Moon, Asc),
                (Sun, Asc),
                (Sun, Ic),
                (Neptune, Asc),
            ],
            LifeCategory::Wealth => &[
                (Jupiter, Mc),
                (Jupiter, Ic),
                (Jupiter, Asc),
                (Jupiter, Dsc),
                (Venus, Mc),
                (Venus, Asc),
                (Sun, Mc),
                (Sun, Asc),
                (Mercury, Mc),
                (Mercury, Asc),
                (Pluto, Mc),
            ],
        }
    }

    fn challenging(self) -> &'static [(Body, Angle)] {
        use Angle::*;
        use Body::*;
        match self {
            // Pluto on the MC stays beneficial for career
            LifeCategory::Career => &[(Neptune, Mc), (Uranus, Mc), (Moon, Mc)],
            LifeCategory::Love => &[(Saturn, Dsc), (Pluto, Dsc), (Mars, Dsc), (Uranus, Dsc), (Neptune, Dsc)],
            LifeCategory::Health => &[(Saturn, Asc), (Saturn, Mc), (Neptune, Asc), (Pluto, Asc), (Uranus, Asc)],
            LifeCategory::Home => &[(Uranus, Ic), (Neptune, Ic), (Pluto, Ic), (Saturn, Ic), (Mars, Ic)],
            LifeCategory::Wellbeing => &[
                (Saturn, Asc),
                (Saturn, Mc),
                (Neptune, Mc),
                (Pluto, Asc),
                (Pluto, Mc),
                (Mars, Asc),
            ],
            LifeCategory::Wealth => &[(Neptune, Mc), (Neptune, Ic), (Uranus, Mc), (Uranus, Ic), (Saturn, Asc)],
        }
    }

    /// How a body's line on `angle` bears on this category, if at all.
    pub fn line_nature(self, body: Body, angle: Angle) -> Option<LineNature> {
        if self.beneficial().contains(&(body, angle)) {
            Some(LineNature::Beneficial)
        } else if self.challenging().contains(&(body, angle)) {
            Some(LineNature::Challenging)
        } else {
            None
        }
    }
}

impl fmt::Display for LifeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LifeCategory {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        let key = match key.as_str() {
            "relationships" | "romance" => "love",
            "money" | "finance" => "wealth",
            other => other,
        };
        CATEGORY_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, c)| *c)
            .ok_or_else(|| AstroError::InvalidCategory {
                category: s.to_string(),
                valid: valid_names(CATEGORY_NAMES),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineNature {
    Beneficial,
    Challenging,
}

impl LineNature {
    pub fn rating(self) -> u8 {
        match self {
            LineNature::Beneficial => 5,
            LineNature::Challenging => 1,
        }
    }
}

/// General-purpose 1..=5 rating of a body's lines when no category is chosen.
pub fn default_rating(body: Body) -> u8 {
    match body {
        Body::Jupiter | Body::Venus => 5,
        Body::Sun | Body::Moon | Body::Mercury | Body::NorthNode => 4,
        Body::Chiron => 3,
        Body::Mars | Body::Uranus | Body::Neptune => 2,
        Body::Saturn | Body::Pluto => 1,
    }
}

/// Rating of a line for scoring; `None` when the line is irrelevant to the category.
pub fn line_rating(body: Body, angle: Angle, category: Option<LifeCategory>) -> Option<u8> {
    match category {
        None => Some(default_rating(body)),
        Some(category) => category.line_nature(body, angle).map(LineNature::rating),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluto_mc_is_not_challenging_for_career() {
        assert_eq!(
            LifeCategory::Career.line_nature(Body::Pluto, Angle::Mc),
            Some(LineNature::Beneficial)
        );
        assert_eq!(
            LifeCategory::Career.line_nature(Body::Neptune, Angle::Mc),
            Some(LineNature::Challenging)
        );
        assert_eq!(LifeCategory::Career.line_nature(Body::Chiron, Angle::Mc), None);
    }

    #[test]
    fn no_line_is_both() {
        for category in LifeCategory::ALL {
            for &(body, angle) in category.beneficial() {
                assert!(!category.challenging().contains(&(body, angle)), "{category} {body} {angle}");
            }
        }
    }

    #[test]
    fn ratings() {
        assert_eq!(line_rating(Body::Venus, Angle::Dsc, Some(LifeCategory::Love)), Some(5));
        assert_eq!(line_rating(Body::Saturn, Angle::Dsc, Some(LifeCategory::Love)), Some(1));
        assert_eq!(line_rating(Body::Mercury, Angle::Dsc, Some(LifeCategory::Love)), None);
        assert_eq!(line_rating(Body::Saturn, Angle::Dsc, None), Some(1));
    }

    #[test]
    fn parse_category() {
        assert_eq!("Well-being".parse::<LifeCategory>().unwrap(), LifeCategory::Wellbeing);
        assert!(matches!("fame".parse::<LifeCategory>(), Err(AstroError::InvalidCategory { .. })));
    }
}
