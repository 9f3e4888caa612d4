//! Client for querying the most accurate cryptocurrency price available
//! from the CryptoCompare REST API.
//!
//! This is not a complete binding for the upstream API. It only touches the
//! endpoints needed to answer one question: what was the price of an asset
//! pair at a given instant. Lookups within the past minute use the live
//! price, lookups within the past week use per-minute history, and anything
//! older uses per-hour history.
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use cryptoprice::Client;
//!
//! # async fn example() -> cryptoprice::Result<()> {
//! let client = Client::with_symbols("BTC", "USD")?;
//! let price = client.price_at(Utc::now() - Duration::hours(2)).await?;
//! println!("{price}");
//! # Ok(())
//! # }
//! ```
//!
//! Upstream API documentation: <https://min-api.cryptocompare.com/>

pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub use api::cryptocompare::{Client, Endpoint};
pub use config::ClientConfig;
pub use error::{PriceError, Result};
pub use models::{HistoricalResponse, PricePoint};
