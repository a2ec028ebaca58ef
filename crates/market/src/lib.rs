//! Fee-market and mining-reward accounting for decentralized storage.
//!
//! Buyers purchase upload capacity at a flat base price plus a congestion
//! surcharge; finalized submissions drain the collected fees into a
//! chunked, time-locked reward ledger. All arithmetic is integer-exact
//! with bounded worst-case cost.
//!
//! # Components
//!
//! - [`StorageMarket`] - Entry points and settlement pipeline
//! - [`DripGauge`] - Time-dripping capacity-credit accumulator
//! - [`PriorityCurve`] - Exponential congestion pricing over deficit depth
//! - [`RewardLedger`] - Append-only chunked reward bookkeeping
//! - [`MarketParams`] - Immutable pricing constants and role wiring
//!
//! The payment, upload-credit, and vesting collaborators are trait seams
//! defined in `sluice-api`.

pub mod args;
mod config;
mod constants;
mod curve;
mod error;
mod gauge;
mod ledger;
mod market;
mod metrics;

pub use args::MarketArgs;
pub use config::{
    MAX_CURVE_BASE, MAX_CURVE_MIN_PRICE, MarketParams, MarketParamsBuilder, Role, RoleSet,
};
pub use constants::*;
pub use curve::PriorityCurve;
pub use error::{ConfigError, MarketError, MarketResult};
pub use gauge::DripGauge;
pub use ledger::{RewardChunk, RewardLedger};
pub use market::{MarketSnapshot, PendingAccount, PurchaseReceipt, StorageMarket};
pub use metrics::MarketMetrics;
