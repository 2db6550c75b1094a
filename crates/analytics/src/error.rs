use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Series '{0}' and '{1}' have no dates in common")]
    EmptyAlignment(String, String),

    #[error("Not enough data to compute a standard deviation: {count} observation(s), need at least 2")]
    InsufficientData { count: usize },

    #[error("Field '{0}' has zero standard deviation over the window")]
    DegenerateSeries(String),

    #[error("No data available to build a report")]
    NoDataAvailable,

    #[error("Window size must be a positive integer, got {0}")]
    InvalidWindowSize(usize),

    #[error("Invalid series data: {0}")]
    Core(#[from] CoreError),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
