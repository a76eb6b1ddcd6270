//! External API clients.

pub mod kamis;

pub use kamis::{KamisClient, MarketPriceSource};
