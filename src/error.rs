use thiserror::Error;

/// Main error type for the simulation engine
#[derive(Error, Debug)]
pub enum TradesimError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Market data errors
    #[error("Market data unavailable: {0}")]
    MarketDataUnavailable(String),

    #[error("Invalid market data: {0}")]
    InvalidMarketData(String),

    // Environment errors
    #[error("Invalid action index: {0}")]
    InvalidAction(usize),

    #[error("Environment pool is empty")]
    EmptyPool,

    #[error("Price series too short: {len} points, need at least {min}")]
    SeriesTooShort { len: usize, min: usize },

    // Policy lifecycle errors
    #[error("Policy unavailable: {0}")]
    PolicyUnavailable(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TradesimError
pub type Result<T> = std::result::Result<T, TradesimError>;
