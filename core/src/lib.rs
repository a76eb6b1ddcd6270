//! Garak Core - Shared logic for the produce marketplace backend.
//!
//! This crate provides:
//! - Price comparison across vendor listings (lowest-offer flagging)
//! - Product name standardization for cross-vendor grouping
//! - KAMIS market-price client with a bounded lookup timeout
//! - Order and vendor-listing persistence over PostgreSQL
//! - Environment-backed service configuration

pub mod clients;
pub mod config;
pub mod db;
pub mod models;
pub mod pricing;
pub mod standardize;

pub use clients::{KamisClient, MarketPriceSource};
pub use config::{AppConfig, KamisConfig};
pub use models::{
    LowestPrice, MarketPrice, MarketPriceReport, Order, OrderStatus, PricedListing, VendorListing,
};
pub use pricing::{flag_lowest, lowest_price_summary, summarize_all};
