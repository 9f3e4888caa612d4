use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request parameters: {0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API response error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream error: {response} - {message}")]
    Upstream { response: String, message: String },

    #[error("No historical data returned")]
    NoData,

    #[error("Unrecognized response: no price for {symbol}")]
    UnrecognizedResponse { symbol: String },
}

pub type Result<T> = std::result::Result<T, PriceError>;
