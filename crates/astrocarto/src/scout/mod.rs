//! Global location scouting.
//!
//! A query scores a coarse grid against every relevant line, picks separated
//! hot zones, then rescores a fine grid around each. Scores decay smoothly with
//! great-circle distance to a line, so there is no cutoff at any radius.

mod cancel;
pub mod category;
mod cluster;
mod config;
pub mod geodesy;
pub mod grid;
mod influence;
mod ranking;
mod scanner;
pub mod scoring;

pub use cancel::CancellationToken;
pub use category::{default_rating, line_rating, LifeCategory, LineNature};
pub use cluster::cluster_hot_zones;
pub use config::{ScoutConfig, MAX_HOT_ZONES};
pub use geodesy::{angular_distance_deg, haversine_km, PreparedPolyline};
pub use grid::{
    generate_coarse_grid, generate_fine_grid, generate_refined_grids, grid_key, is_probably_land, GridPoint,
    ScoredGridPoint,
};
pub use influence::ScoutLines;
pub use ranking::{group_and_rank_countries, rank_cities_by_category, City, CityNature, CityRanking, RankedCountry, SortMode};
pub use scanner::{run_scout_task, GridScorer, ScoutPhase, ScoutResult};
pub use scoring::{score_influences, AspectType, Influence, KernelType, PointScore, ScoringConfig};
