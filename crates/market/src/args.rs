//! CLI arguments for fee-market configuration.

use alloy_primitives::{Address, U256};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{
    config::{MarketParams, RoleSet},
    constants::*,
    error::ConfigError,
};

/// Fee market CLI arguments. Prices are per byte, sizes in bytes.
#[derive(Debug, Args, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Fee Market")]
#[serde(default)]
pub struct MarketArgs {
    /// Sector size of purchased capacity
    #[arg(long = "market.bytes-per-sector", default_value_t = DEFAULT_BYTES_PER_SECTOR)]
    pub bytes_per_sector: u64,

    /// Flat base price per byte
    #[arg(long = "market.basic-price", default_value_t = DEFAULT_BASIC_PRICE)]
    pub basic_price: u128,

    /// Upper cap on the capacity gauge
    #[arg(long = "market.gauge-cap", default_value_t = DEFAULT_GAUGE_CAP)]
    pub gauge_cap: i64,

    /// Deficit depth over which the priority price doubles
    #[arg(long = "market.curve-base", default_value_t = DEFAULT_CURVE_BASE)]
    pub curve_base: u64,

    /// Priority price per byte at zero deficit depth
    #[arg(long = "market.curve-min-price", default_value_t = DEFAULT_CURVE_MIN_PRICE)]
    pub curve_min_price: u128,

    /// Reward chunk size
    #[arg(long = "market.chunk-size", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Drip divisor exponent: rate is submission bytes / 2^n per second
    #[arg(long = "market.drip-divisor-log2", default_value_t = DEFAULT_DRIP_DIVISOR_LOG2)]
    pub drip_divisor_log2: u32,

    /// Upload tokens burned per sector redeemed
    #[arg(long = "market.upload-token-rate", default_value_t = DEFAULT_UPLOAD_TOKEN_PER_SECTOR)]
    pub upload_token_per_sector: U256,

    /// Address holding the flow role
    #[arg(long = "market.flow-address", default_value_t = Address::ZERO)]
    pub flow_address: Address,

    /// Address holding the mine role
    #[arg(long = "market.mine-address", default_value_t = Address::ZERO)]
    pub mine_address: Address,

    /// Address receiving priority fees
    #[arg(long = "market.stake-address", default_value_t = Address::ZERO)]
    pub stake_address: Address,

    /// Reward pool address
    #[arg(long = "market.treasury-address", default_value_t = Address::ZERO)]
    pub treasury_address: Address,
}

impl Default for MarketArgs {
    fn default() -> Self {
        Self {
            bytes_per_sector: DEFAULT_BYTES_PER_SECTOR,
            basic_price: DEFAULT_BASIC_PRICE,
            gauge_cap: DEFAULT_GAUGE_CAP,
            curve_base: DEFAULT_CURVE_BASE,
            curve_min_price: DEFAULT_CURVE_MIN_PRICE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            drip_divisor_log2: DEFAULT_DRIP_DIVISOR_LOG2,
            upload_token_per_sector: DEFAULT_UPLOAD_TOKEN_PER_SECTOR,
            flow_address: Address::ZERO,
            mine_address: Address::ZERO,
            stake_address: Address::ZERO,
            treasury_address: Address::ZERO,
        }
    }
}

impl MarketArgs {
    /// Resolve into validated [`MarketParams`].
    pub fn market_params(&self) -> Result<MarketParams, ConfigError> {
        MarketParams::builder()
            .with_bytes_per_sector(self.bytes_per_sector)
            .with_basic_price(self.basic_price)
            .with_gauge_cap(self.gauge_cap)
            .with_curve_base(self.curve_base)
            .with_curve_min_price(self.curve_min_price)
            .with_chunk_size(self.chunk_size)
            .with_drip_divisor_log2(self.drip_divisor_log2)
            .with_upload_token_per_sector(self.upload_token_per_sector)
            .with_roles(RoleSet {
                flow: self.flow_address,
                mine: self.mine_address,
                stake: self.stake_address,
                treasury: self.treasury_address,
            })
            .build()
    }
}
