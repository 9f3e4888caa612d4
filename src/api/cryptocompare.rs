use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{PriceError, Result};
use crate::models::HistoricalResponse;

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 3600;

/// The CryptoCompare endpoint to query, selected by how far in the past the
/// requested time lies. Doubles as the selector for which of the two
/// response shapes to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/price` — flat map of unit symbol to current price.
    Current,
    /// `/histominute` — one-minute high/low buckets.
    MinuteHistory,
    /// `/histohour` — one-hour high/low buckets.
    HourHistory,
}

impl Endpoint {
    /// Routes a query time to an endpoint given the current time:
    /// under a minute old (or in the future) uses the live price, under
    /// seven days the minute history, anything older the hour history.
    pub fn for_time(t: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let age = now - t;
        if age < Duration::minutes(1) {
            Endpoint::Current
        } else if age < Duration::days(7) {
            Endpoint::MinuteHistory
        } else {
            Endpoint::HourHistory
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "/price",
            Endpoint::MinuteHistory => "/histominute",
            Endpoint::HourHistory => "/histohour",
        }
    }

    fn bucket_secs(&self) -> Option<i64> {
        match self {
            Endpoint::Current => None,
            Endpoint::MinuteHistory => Some(MINUTE_SECS),
            Endpoint::HourHistory => Some(HOUR_SECS),
        }
    }

    /// Upper time bound sent as `toTs` for historical requests: `t` rounded
    /// up to the next bucket boundary. `None` for the current-price endpoint.
    pub fn to_ts(&self, t: DateTime<Utc>) -> Option<i64> {
        self.bucket_secs()
            .map(|bucket| t.timestamp().div_euclid(bucket) * bucket + bucket)
    }
}

/// Client for the CryptoCompare min-api. Holds the request parameters and a
/// pooled HTTP client; fields are read-only during a call, so one value may
/// be shared across concurrent lookups.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Convenience constructor with default configuration for the pair.
    pub fn with_symbols(from_symbol: &str, to_symbol: &str) -> Result<Self> {
        Self::new(ClientConfig::new(from_symbol, to_symbol))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the current price of the configured pair.
    pub async fn price_now(&self) -> Result<f64> {
        self.price_at(Utc::now()).await
    }

    /// Returns the most accurate price available for the given time `t`.
    ///
    /// If `t` is within the past minute the most recent live price is used.
    /// If it is within the past seven days, the simple average of the high
    /// and low of the minute bucket closest to `t` is used; any further in
    /// the past, the closest hour bucket.
    pub async fn price_at(&self, t: DateTime<Utc>) -> Result<f64> {
        if self.config.from_symbol.is_empty() || self.config.to_symbol.is_empty() {
            return Err(PriceError::Validation(
                "from and to symbols must not be empty".to_string(),
            ));
        }

        let endpoint = Endpoint::for_time(t, Utc::now());
        let url = format!("{}{}", self.config.base_url, endpoint.path());
        let query = self.query_params(endpoint, t);

        debug!("GET {} {:?}", url, query);

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        let price = self.resolve(endpoint, &body, t)?;

        info!(
            "{}/{} at {}: {}",
            self.config.from_symbol, self.config.to_symbol, t, price
        );
        Ok(price)
    }

    fn query_params(&self, endpoint: Endpoint, t: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut query = vec![("fsym", self.config.from_symbol.clone())];
        if let Some(extra_params) = &self.config.extra_params {
            query.push(("extraParams", extra_params.clone()));
        }
        if let Some(exchange) = &self.config.exchange {
            query.push(("e", exchange.clone()));
        }
        if self.config.direct_pair_only {
            query.push(("tryConversion", "false".to_string()));
        }
        match endpoint.to_ts(t) {
            None => query.push(("tsyms", self.config.to_symbol.clone())),
            Some(to_ts) => {
                query.push(("tsym", self.config.to_symbol.clone()));
                query.push(("toTs", to_ts.to_string()));
                query.push(("limit", "1".to_string()));
            }
        }
        query
    }

    fn resolve(&self, endpoint: Endpoint, body: &str, t: DateTime<Utc>) -> Result<f64> {
        match endpoint {
            Endpoint::Current => {
                let current: Value = serde_json::from_str(body)?;
                current
                    .get(&self.config.to_symbol)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| PriceError::UnrecognizedResponse {
                        symbol: self.config.to_symbol.clone(),
                    })
            }
            Endpoint::MinuteHistory | Endpoint::HourHistory => {
                let historical: HistoricalResponse = serde_json::from_str(body)?;
                historical.price_at(t)
            }
        }
    }
}
