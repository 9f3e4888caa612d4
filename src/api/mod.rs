pub mod cryptocompare;

pub use cryptocompare::{Client, Endpoint};
