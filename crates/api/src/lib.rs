//! Sluice API - collaborator seams for the storage fee market.
//!
//! The market engine in `sluice-market` settles every purchase, credit
//! redemption and reward payout through external collaborators. This crate
//! defines those collaborators as traits, so the engine stays independent of
//! any concrete token or unlock mechanism.
//!
//! # Core Concepts
//!
//! - [`PaymentLedger`] - fungible payment token (buyer→treasury pulls,
//!   treasury→stake and treasury→beneficiary payouts)
//! - [`UploadCredit`] - pre-purchased upload credit consumed at a fixed
//!   exchange rate, exempt from congestion pricing
//! - [`VestingPolicy`] - external unlock schedule that migrates a reward
//!   chunk's locked value into claimable value over time
//!
//! # Design Principles
//!
//! - Traits define *what*, implementations define *how*
//! - Collaborator calls are synchronous and either complete or decline;
//!   the engine treats a decline as aborting the whole operation
//! - No-op implementations ([`UnmeteredPayment`], [`UnlimitedCredit`],
//!   [`NoVesting`]) make every seam optional

#![warn(missing_docs)]

mod credit;
mod payment;
mod vesting;

pub use credit::*;
pub use payment::*;
pub use vesting::*;

/// Seconds-resolution timestamp used across the market.
///
/// The engine never reads a clock; every entry point takes the current
/// instant explicitly.
pub type Timestamp = u64;
