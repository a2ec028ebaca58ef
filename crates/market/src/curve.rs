//! Exponential congestion pricing over gauge deficit depth.
//!
//! The price density doubles every `curve_base` bytes of deficit, so the
//! cost of a purchase is the integral of that density over the range the
//! purchase sweeps, not a point price: a purchase spanning a gradient pays
//! its true area under the curve.
//!
//! With depth `d` in bytes, base `B` and minimum per-byte price `P`, the
//! integral has the closed form
//!
//! ```text
//! F(d) = P * B / ln 2 * (2^(d / B) - 1)
//! ```
//!
//! and a purchase moving the deficit from `d0` to `d1` owes `F(d1) - F(d0)`.
//! Everything is evaluated in Q96 fixed point over `U256`; there are no
//! floats and every loop is bounded by a fixed term count.

use crate::{
    config::MarketParams,
    constants::{CLOSED_EXP_TERMS, CURVE_FRACTION_BITS, LN2_Q96, Q96_ONE, SERIES_EXP_TERMS},
    error::{MarketError, MarketResult},
};
use alloy_primitives::U256;

/// Congestion fee evaluator for a fixed parameter set.
///
/// All arithmetic is proven against the builder's parameter bounds:
/// `exp2` results stay below 2^161 and every product below 2^255, so `U256`
/// operations cannot overflow for accepted inputs.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCurve {
    base: u128,
    min_price: u128,
    max_depth: u128,
}

impl PriorityCurve {
    /// Build the evaluator for `params`.
    pub fn new(params: &MarketParams) -> Self {
        Self {
            base: u128::from(params.curve_base),
            min_price: params.curve_min_price,
            max_depth: params.max_depth(),
        }
    }

    /// Deepest deficit the curve prices.
    pub const fn max_depth(&self) -> u128 {
        self.max_depth
    }

    /// Fee for reducing a settled `gauge` by `amount` bytes.
    ///
    /// Only the portion of `[gauge, gauge - amount]` below zero is charged;
    /// capacity bought at or above zero is congestion-free. Fails with
    /// [`MarketError::GaugeUnderflow`] when the resulting depth exceeds
    /// [`max_depth`](Self::max_depth). The result is rounded up to a whole
    /// currency unit, favoring the protocol.
    pub fn priority_fee(&self, gauge: i128, amount: u128) -> MarketResult<U256> {
        let d0 = gauge.min(0).unsigned_abs();
        let below = if gauge > 0 { amount.saturating_sub(gauge.unsigned_abs()) } else { amount };
        let d1 = d0.saturating_add(below);
        if d1 > self.max_depth {
            return Err(MarketError::GaugeUnderflow { depth: d1, max_depth: self.max_depth });
        }
        if below == 0 {
            return Ok(U256::ZERO);
        }
        // Small purchases relative to the doubling interval would subtract
        // two nearly equal exponentials; expand around d0 instead.
        if below.saturating_mul(4) < self.base {
            Ok(self.fee_series(d0, below))
        } else {
            Ok(self.fee_closed(d0, d1))
        }
    }

    /// Direct evaluation of `F(d1) - F(d0)`.
    ///
    /// Numerically stable once the range spans at least a quarter of the
    /// doubling interval: the minuend is then at least `2^(1/4)` times the
    /// subtrahend.
    fn fee_closed(&self, d0: u128, d1: u128) -> U256 {
        let diff = self.exp2_q96(d1) - self.exp2_q96(d0);
        self.to_fee(diff)
    }

    /// Taylor evaluation of `2^(d0/B) * (2^(below/B) - 1)`.
    ///
    /// Expands the small factor directly so no cancellation occurs.
    fn fee_series(&self, d0: u128, below: u128) -> U256 {
        let e0 = self.exp2_q96(d0);
        let y = U256::from(below) * LN2_Q96 / U256::from(self.base);
        let m = exp_m1_q96(y, SERIES_EXP_TERMS);
        // e0 <= 2^160 and m < 0.2 * 2^96, so the product stays below 2^255
        self.to_fee((e0 * m) >> CURVE_FRACTION_BITS)
    }

    /// Convert a Q96 exponential difference into currency, rounding up.
    fn to_fee(&self, diff_q96: U256) -> U256 {
        let scaled = U256::from(self.min_price) * U256::from(self.base) * diff_q96;
        let (fee, rem) = scaled.div_rem(LN2_Q96);
        if rem.is_zero() { fee } else { fee + U256::from(1u8) }
    }

    /// `2^(d / base)` in Q96.
    ///
    /// Splits `d = q * base + r`, evaluates the fractional power by Taylor
    /// series and applies the integral part as a shift. Exact at multiples
    /// of `base`.
    fn exp2_q96(&self, d: u128) -> U256 {
        let q = (d / self.base) as u32;
        let r = d % self.base;
        let x = U256::from(r) * LN2_Q96 / U256::from(self.base);
        let frac = Q96_ONE + exp_m1_q96(x, CLOSED_EXP_TERMS);
        frac << q
    }
}

/// `e^x - 1` in Q96 by truncated Taylor series, for `x` in `[0, ln 2]`.
///
/// Terms are generated iteratively with floor division; the truncation and
/// rounding deficit stays within a few units of the last term evaluated,
/// which the term counts in `constants` put far below one part in 2^80 of
/// the result.
fn exp_m1_q96(x: U256, terms: u32) -> U256 {
    let mut term = x;
    let mut sum = x;
    for n in 2..=terms {
        term = (term * x >> CURVE_FRACTION_BITS) / U256::from(n);
        if term.is_zero() {
            break;
        }
        sum += term;
    }
    sum
}
