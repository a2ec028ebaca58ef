//! Default constants for the storage fee market.
//!
//! Protocol-level defaults every deployment starts from, with log2 canonical
//! forms where a value is a power of two, plus the fixed-point plumbing the
//! priority curve evaluator is built on.

use alloy_primitives::U256;

/// Default sector size in bytes.
pub const DEFAULT_BYTES_PER_SECTOR: u64 = 256;

/// Default flat price per byte of purchased capacity.
pub const DEFAULT_BASIC_PRICE: u128 = 1_000;

/// Default minimum priority price per byte, charged at zero deficit depth.
pub const DEFAULT_CURVE_MIN_PRICE: u128 = 100;

/// Default curve base as a power of 2 exponent.
///
/// This is the canonical definition. `DEFAULT_CURVE_BASE = 2^DEFAULT_CURVE_BASE_LOG2`
pub const DEFAULT_CURVE_BASE_LOG2: u32 = 30;

/// Default depth interval over which the priority price density doubles
/// (1 GiB of deficit).
pub const DEFAULT_CURVE_BASE: u64 = 1 << DEFAULT_CURVE_BASE_LOG2;

/// Number of price doublings after which the curve is no longer defined.
///
/// Purchases that would push the deficit past `curve_base * MAX_DEPTH_DOUBLINGS`
/// fail rather than evaluate an unbounded exponent.
pub const MAX_DEPTH_DOUBLINGS: u32 = 64;

/// Default gauge cap in bytes of capacity credit (30 GiB).
pub const DEFAULT_GAUGE_CAP: i64 = 30 << 30;

/// Default reward chunk size as a power of 2 exponent.
///
/// This is the canonical definition. `DEFAULT_CHUNK_SIZE = 2^DEFAULT_CHUNK_SIZE_LOG2`
pub const DEFAULT_CHUNK_SIZE_LOG2: u32 = 31;

/// Default reward chunk size in bytes (2 GiB of charged capacity per chunk).
pub const DEFAULT_CHUNK_SIZE: u64 = 1 << DEFAULT_CHUNK_SIZE_LOG2;

/// Default drip divisor as a power of 2 exponent.
///
/// Every 2^20 bytes (1 MiB) of cumulative submission contributes one byte
/// per second of gauge recovery, so 3 TiB of submissions drip 3 MiB/s.
pub const DEFAULT_DRIP_DIVISOR_LOG2: u32 = 20;

/// Default upload-token exchange rate: credit tokens consumed per sector.
pub const DEFAULT_UPLOAD_TOKEN_PER_SECTOR: U256 =
    U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Fractional bits of the curve evaluator's fixed-point representation.
pub(crate) const CURVE_FRACTION_BITS: u32 = 96;

/// One in Q96 fixed point.
pub(crate) const Q96_ONE: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// ln 2 in Q96 fixed point, truncated.
pub(crate) const LN2_Q96: U256 = U256::from_limbs([0xD1CF_79AB_C9E3_B398, 0xB172_17F7, 0, 0]);

/// Taylor terms evaluated for the fractional exponent on the closed-form
/// branch, where the argument can reach ln 2.
pub(crate) const CLOSED_EXP_TERMS: u32 = 24;

/// Taylor terms evaluated on the small-purchase branch, where the argument
/// stays below ln 2 / 4.
pub(crate) const SERIES_EXP_TERMS: u32 = 16;
