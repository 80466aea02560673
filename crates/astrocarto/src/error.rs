use thiserror::Error;

/// Errors surfaced by the astrocartography core.
///
/// Configuration problems name the offending field so the caller can point at
/// the bad input. Geometric "no solution" outcomes are never errors; they are
/// encoded as `Option`s or missing points in the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    #[error("Invalid calendar field {field}: {value}")]
    InvalidCalendarField { field: &'static str, value: i64 },
    #[error("Invalid coordinate {field}: {value}")]
    InvalidCoordinate { field: &'static str, value: f64 },
    #[error("Invalid parameter {field}: {value}")]
    InvalidParameter { field: &'static str, value: f64 },
    #[error("Unsupported body: {body}")]
    UnsupportedBody { body: String },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Invalid zodiac frame: {frame}. Valid frames: {valid:?}")]
    InvalidZodiacFrame { frame: String, valid: Vec<String> },
    #[error("Invalid line type: {line_type}. Valid types: {valid:?}")]
    InvalidLineType { line_type: String, valid: Vec<String> },
    #[error("Invalid life category: {category}. Valid categories: {valid:?}")]
    InvalidCategory { category: String, valid: Vec<String> },
    #[error("Invalid option {option}: {value}. Valid options: {valid:?}")]
    InvalidOption {
        option: &'static str,
        value: String,
        valid: Vec<String>,
    },
    #[error("Invalid scout configuration {field}: {message}")]
    InvalidScoutConfig { field: &'static str, message: String },
    #[error("Timezone lookup failed at ({lat}, {lng}): {message}")]
    TimezoneLookupFailed { lat: f64, lng: f64, message: String },
    #[error("Computation cancelled")]
    Cancelled,
    #[error("Background task failed: {message}")]
    TaskFailed { message: String },
}

pub type Result<T> = std::result::Result<T, AstroError>;

/// Names of a closed table, used to fill the `valid` list of parse errors.
pub(crate) fn valid_names<T>(table: &[(&str, T)]) -> Vec<String> {
    table.iter().map(|(name, _)| name.to_string()).collect()
}
