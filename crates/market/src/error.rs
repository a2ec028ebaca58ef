//! Error types for market operations.
//!
//! Every failure aborts the enclosing operation with the engine's own state
//! untouched, so callers may retry at the application layer. Variants carry
//! typed data (not strings) for programmatic handling.

use crate::config::Role;
use alloy_primitives::Address;
use sluice_api::{CreditDeclined, PaymentDeclined};

/// Error type for market operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    /// Caller does not hold the role the entry point requires.
    #[error("caller {caller} does not hold the {required} role")]
    Unauthorized {
        /// Role the entry point is gated on.
        required: Role,
        /// Identity captured at entry.
        caller: Address,
    },

    /// Declared price ceiling cannot cover the mandatory price components.
    #[error("price limit {max_unit_price} below required unit price {required_unit_price}")]
    PriceLimitExceeded {
        /// Ceiling the buyer declared, per byte.
        max_unit_price: u128,
        /// Basic plus priority unit price the purchase requires, per byte.
        required_unit_price: u128,
    },

    /// Purchase would push the gauge deficit beyond the priced depth.
    #[error("gauge deficit {depth} exceeds maximum priced depth {max_depth}")]
    GaugeUnderflow {
        /// Deficit depth the purchase would reach, in bytes.
        depth: u128,
        /// Deepest deficit the curve is defined for, in bytes.
        max_depth: u128,
    },

    /// More sectors finalized than were paid for.
    #[error("cannot finalize {paid_sectors} sectors with only {available_sectors} prepaid")]
    SubmissionNotPaid {
        /// Sectors the report tries to finalize.
        paid_sectors: u64,
        /// Sectors currently prepaid.
        available_sectors: u64,
    },

    /// The submission counter is cumulative and may only grow.
    #[error("total submission {proposed} regresses below current {current}")]
    InvalidSubmission {
        /// Counter value currently recorded.
        current: u64,
        /// Regressing value the caller proposed.
        proposed: u64,
    },

    /// Payment collaborator declined a transfer.
    #[error("payment transfer failed")]
    PaymentFailed(#[from] PaymentDeclined),

    /// Upload-credit collaborator declined a consumption.
    #[error("upload credit consumption failed")]
    ConsumeRejected(#[from] CreditDeclined),

    /// Reward chunk index beyond the allocated ledger.
    #[error("reward chunk {index} does not exist ({chunks} allocated)")]
    UnknownChunk {
        /// Index the caller asked for.
        index: u64,
        /// Number of chunks allocated so far.
        chunks: u64,
    },

    /// Arithmetic bound exceeded on caller-supplied amounts.
    #[error("amount overflow computing {what}")]
    Overflow {
        /// The quantity whose computation overflowed.
        what: &'static str,
    },
}

/// Error constructing [`MarketParams`](crate::MarketParams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A parameter that must be nonzero was zero.
    #[error("{name} must be nonzero")]
    ZeroParameter {
        /// Name of the offending parameter.
        name: &'static str,
    },

    /// A parameter exceeds the bound the curve arithmetic is proven for.
    #[error("{name} {value} exceeds maximum {max}")]
    ParameterTooLarge {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value supplied.
        value: u128,
        /// Largest accepted value.
        max: u128,
    },

    /// Gauge cap must be positive.
    #[error("gauge cap {cap} must be positive")]
    NonPositiveCap {
        /// Cap supplied.
        cap: i64,
    },
}

/// Result type for market operations.
pub type MarketResult<T> = core::result::Result<T, MarketError>;
