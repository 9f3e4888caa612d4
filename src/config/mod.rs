use crate::error::{PriceError, Result};
use std::env;
use std::time::Duration;

/// Default CryptoCompare min-api base URL.
pub const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com/data";

/// Application name reported to the API via `extraParams`.
pub const DEFAULT_EXTRA_PARAMS: &str = "rust crate - cryptoprice";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Request parameters for a price lookup. Populated once and handed to
/// [`Client::new`](crate::Client::new); the client never mutates it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Cryptocurrency symbol of interest, e.g. "BTC".
    pub from_symbol: String,
    /// Currency symbol to convert into, e.g. "USD".
    pub to_symbol: String,
    /// Exchange to use for data. `None` means the upstream default
    /// ("CCCAGG" aggregated average).
    pub exchange: Option<String>,
    /// Only return data for direct trading pairs, never synthetic
    /// conversions through an intermediate asset.
    pub direct_pair_only: bool,
    /// Name of your application, sent as the `extraParams` query parameter.
    pub extra_params: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(from_symbol: &str, to_symbol: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            from_symbol: from_symbol.to_string(),
            to_symbol: to_symbol.to_string(),
            exchange: None,
            direct_pair_only: false,
            extra_params: Some(DEFAULT_EXTRA_PARAMS.to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Like [`ClientConfig::new`] but with overrides taken from the
    /// environment: `CRYPTOPRICE_URL`, `CRYPTOPRICE_EXCHANGE` and
    /// `CRYPTOPRICE_TIMEOUT_SECS`.
    pub fn from_env(from_symbol: &str, to_symbol: &str) -> Result<Self> {
        let mut config = Self::new(from_symbol, to_symbol);

        if let Ok(url) = env::var("CRYPTOPRICE_URL") {
            config.base_url = url;
        }
        if let Ok(exchange) = env::var("CRYPTOPRICE_EXCHANGE") {
            config.exchange = Some(exchange);
        }
        if let Ok(secs) = env::var("CRYPTOPRICE_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                PriceError::Config("Invalid CRYPTOPRICE_TIMEOUT_SECS".to_string())
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    pub fn with_extra_params(mut self, extra_params: impl Into<String>) -> Self {
        self.extra_params = Some(extra_params.into());
        self
    }

    pub fn with_direct_pair_only(mut self, direct_pair_only: bool) -> Self {
        self.direct_pair_only = direct_pair_only;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_defaults() {
        let config = ClientConfig::new("BTC", "USD");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.from_symbol, "BTC");
        assert_eq!(config.to_symbol, "USD");
        assert_eq!(config.exchange, None);
        assert!(!config.direct_pair_only);
        assert_eq!(
            config.extra_params.as_deref(),
            Some(DEFAULT_EXTRA_PARAMS)
        );
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("ETH", "EUR")
            .with_base_url("http://localhost:8080")
            .with_exchange("Kraken")
            .with_direct_pair_only(true)
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.exchange.as_deref(), Some("Kraken"));
        assert!(config.direct_pair_only);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
