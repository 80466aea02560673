//! Natal and relocation charts.

pub mod houses;
mod natal;
mod relocation;
mod settings;

pub use houses::{find_house, lahiri_ayanamsa, ChartAngles, SIGN_NAMES};
pub use natal::{natal_chart, ChartBody, ChartEpoch, NatalChart};
pub use relocation::{relocation_chart, AngleShifts, RelocatedBody, RelocationResult};
pub use settings::{ChartSettings, HouseSystem, ZodiacFrame};
