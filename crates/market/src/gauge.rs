//! Time-dripping capacity gauge.
//!
//! The gauge is the market's congestion signal: purchases debit it, elapsed
//! time credits it back at a rate derived from how much data the network has
//! accepted so far.

use crate::config::MarketParams;
use serde::{Deserialize, Serialize};
use sluice_api::Timestamp;
use tracing::trace;

/// Signed capacity-credit accumulator with drip settlement.
///
/// # Value Semantics
///
/// - **Positive value**: spare capacity credit, purchases in this region are
///   congestion-free
/// - **Negative value**: capacity deficit, purchases in this region pay the
///   priority curve
///
/// The value drips upward as time passes, clamped to the configured cap,
/// and is debited without a lower clamp by purchases (the curve's maximum
/// depth is the effective floor). Every mutation settles the elapsed
/// interval first, so a rate change never reprices time that already
/// passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DripGauge {
    value: i128,
    total_submission: u64,
    last_checkpoint: Timestamp,
}

impl DripGauge {
    /// A zeroed gauge starting its clock at `genesis`.
    pub const fn new(genesis: Timestamp) -> Self {
        Self { value: 0, total_submission: 0, last_checkpoint: genesis }
    }

    /// Current settled value in bytes of capacity credit.
    pub const fn value(&self) -> i128 {
        self.value
    }

    /// Cumulative sectors accepted by the network.
    pub const fn total_submission(&self) -> u64 {
        self.total_submission
    }

    /// Instant of the most recent settlement.
    pub const fn last_checkpoint(&self) -> Timestamp {
        self.last_checkpoint
    }

    /// Recovery rate in bytes per second.
    ///
    /// Derived from the cumulative submission counter alone, rounded up so
    /// drip is never silently underpaid. Monotonically non-decreasing in
    /// the counter.
    pub fn dripping_rate(&self, params: &MarketParams) -> u128 {
        let total_bytes =
            u128::from(self.total_submission) * u128::from(params.bytes_per_sector);
        let divisor = 1u128 << params.drip_divisor_log2;
        total_bytes.div_ceil(divisor)
    }

    /// Value the gauge settles to at `now`, without mutating.
    ///
    /// Read paths use this so `&self` observations never lag the settled
    /// state.
    pub fn projected_value(&self, params: &MarketParams, now: Timestamp) -> i128 {
        if now <= self.last_checkpoint {
            return self.value;
        }
        let elapsed = u128::from(now - self.last_checkpoint);
        let delta = self.dripping_rate(params).saturating_mul(elapsed);
        // value never exceeds the cap, so the headroom is non-negative
        let headroom = (i128::from(params.gauge_cap) - self.value).unsigned_abs();
        self.value + delta.min(headroom) as i128
    }

    /// Settle drip for the interval since the last checkpoint.
    ///
    /// The interval is priced at the rate currently in force; callers that
    /// change the submission counter do so only after settling, so the new
    /// rate applies prospectively. A `now` at or before the checkpoint
    /// settles nothing; time never moves backward.
    pub fn settle(&mut self, params: &MarketParams, now: Timestamp) {
        if now <= self.last_checkpoint {
            return;
        }
        let settled = self.projected_value(params, now);
        if settled != self.value {
            trace!(from = self.value, to = settled, at = now, "Settled gauge drip");
        }
        self.value = settled;
        self.last_checkpoint = now;
    }

    /// Replace the cumulative submission counter.
    ///
    /// The caller settles the elapsed interval first and enforces
    /// monotonicity; this only records the new counter.
    pub(crate) fn set_total_submission(&mut self, total: u64) {
        self.total_submission = total;
    }

    /// Debit purchased capacity. No lower clamp.
    pub(crate) fn debit(&mut self, bytes: u128) {
        // callers bound `bytes` via the curve's depth check before debiting
        self.value -= bytes as i128;
    }
}
