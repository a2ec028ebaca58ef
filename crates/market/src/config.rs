//! Market parameters fixed at construction.

use crate::{
    constants::*,
    error::{ConfigError, MarketError, MarketResult},
};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Privileged caller roles fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Reports finalized submissions and charges fees.
    Flow,
    /// Claims vested mining rewards.
    Mine,
}

/// The collaborator addresses a deployment is wired to.
///
/// Flow and Mine gate entry points; Stake receives priority fees; Treasury
/// is the reward-pool account purchase proceeds accrue to and claims pay
/// out of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    /// Sole permitted caller of submission reports and fee charges.
    pub flow: Address,
    /// Sole permitted caller of reward claims.
    pub mine: Address,
    /// Recipient of all priority-fee transfers.
    pub stake: Address,
    /// Reward-pool account.
    pub treasury: Address,
}

impl RoleSet {
    /// Address holding `role`.
    pub const fn address_of(&self, role: Role) -> Address {
        match role {
            Role::Flow => self.flow,
            Role::Mine => self.mine,
        }
    }

    /// Guard an entry point on `required`, comparing the caller identity
    /// captured at entry.
    pub fn require(&self, required: Role, caller: Address) -> MarketResult<()> {
        if self.address_of(required) == caller {
            Ok(())
        } else {
            Err(MarketError::Unauthorized { required, caller })
        }
    }
}

/// Immutable pricing constants and collaborator wiring.
///
/// Construction fixes every field; nothing here changes over the life of a
/// market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Sector size in bytes.
    pub bytes_per_sector: u64,
    /// Flat price per byte of purchased capacity.
    pub basic_price: u128,
    /// Upper bound on the capacity-credit gauge, in bytes.
    pub gauge_cap: i64,
    /// Deficit depth over which the priority price density doubles, in bytes.
    pub curve_base: u64,
    /// Priority price per byte at zero deficit depth.
    pub curve_min_price: u128,
    /// Bytes of charged capacity per reward chunk.
    pub chunk_size: u64,
    /// log2 of the divisor deriving the drip rate from cumulative
    /// submission bytes.
    pub drip_divisor_log2: u32,
    /// Upload-credit tokens consumed per sector.
    pub upload_token_per_sector: U256,
    /// Collaborator addresses.
    pub roles: RoleSet,
}

impl MarketParams {
    /// Start building parameters from the defaults.
    pub fn builder() -> MarketParamsBuilder {
        MarketParamsBuilder::new()
    }

    /// Deepest deficit the priority curve is defined for, in bytes.
    pub const fn max_depth(&self) -> u128 {
        self.curve_base as u128 * MAX_DEPTH_DOUBLINGS as u128
    }
}

impl Default for MarketParams {
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
            roles: RoleSet::default(),
        }
    }
}

/// Largest accepted `curve_base`: keeps every curve intermediate below
/// 2^256 together with [`MAX_CURVE_MIN_PRICE`].
pub const MAX_CURVE_BASE: u64 = 1 << 31;

/// Largest accepted `curve_min_price`: keeps the per-byte priority price
/// below 2^127 even at maximum depth.
pub const MAX_CURVE_MIN_PRICE: u128 = 1 << 63;

/// Builder for [`MarketParams`].
#[derive(Debug, Clone)]
pub struct MarketParamsBuilder {
    params: MarketParams,
}

impl MarketParamsBuilder {
    /// Start from the default parameters.
    pub fn new() -> Self {
        Self { params: MarketParams::default() }
    }

    /// Set the sector size in bytes.
    pub fn with_bytes_per_sector(mut self, bytes: u64) -> Self {
        self.params.bytes_per_sector = bytes;
        self
    }

    /// Set the flat per-byte price.
    pub fn with_basic_price(mut self, price: u128) -> Self {
        self.params.basic_price = price;
        self
    }

    /// Set the gauge cap in bytes.
    pub fn with_gauge_cap(mut self, cap: i64) -> Self {
        self.params.gauge_cap = cap;
        self
    }

    /// Set the price-doubling depth interval in bytes.
    pub fn with_curve_base(mut self, base: u64) -> Self {
        self.params.curve_base = base;
        self
    }

    /// Set the per-byte priority price at zero depth.
    pub fn with_curve_min_price(mut self, price: u128) -> Self {
        self.params.curve_min_price = price;
        self
    }

    /// Set the reward chunk size in bytes.
    pub fn with_chunk_size(mut self, size: u64) -> Self {
        self.params.chunk_size = size;
        self
    }

    /// Set the log2 drip divisor.
    pub fn with_drip_divisor_log2(mut self, log2: u32) -> Self {
        self.params.drip_divisor_log2 = log2;
        self
    }

    /// Set the upload-credit exchange rate.
    pub fn with_upload_token_per_sector(mut self, rate: U256) -> Self {
        self.params.upload_token_per_sector = rate;
        self
    }

    /// Set the collaborator addresses.
    pub fn with_roles(mut self, roles: RoleSet) -> Self {
        self.params.roles = roles;
        self
    }

    /// Validate and produce the parameters.
    pub fn build(self) -> Result<MarketParams, ConfigError> {
        let p = self.params;
        for (name, value) in [
            ("bytes_per_sector", u128::from(p.bytes_per_sector)),
            ("basic_price", p.basic_price),
            ("curve_base", u128::from(p.curve_base)),
            ("curve_min_price", p.curve_min_price),
            ("chunk_size", u128::from(p.chunk_size)),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroParameter { name });
            }
        }
        if p.gauge_cap <= 0 {
            return Err(ConfigError::NonPositiveCap { cap: p.gauge_cap });
        }
        if p.curve_base > MAX_CURVE_BASE {
            return Err(ConfigError::ParameterTooLarge {
                name: "curve_base",
                value: u128::from(p.curve_base),
                max: u128::from(MAX_CURVE_BASE),
            });
        }
        if p.curve_min_price > MAX_CURVE_MIN_PRICE {
            return Err(ConfigError::ParameterTooLarge {
                name: "curve_min_price",
                value: p.curve_min_price,
                max: MAX_CURVE_MIN_PRICE,
            });
        }
        if p.drip_divisor_log2 >= 64 {
            return Err(ConfigError::ParameterTooLarge {
                name: "drip_divisor_log2",
                value: u128::from(p.drip_divisor_log2),
                max: 63,
            });
        }
        Ok(p)
    }
}

impl Default for MarketParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_build() {
        let params = MarketParams::builder().build().unwrap();
        assert_eq!(params, MarketParams::default());
        assert_eq!(params.max_depth(), 64 << 30);
    }

    #[test]
    fn test_rejects_zero_sector() {
        let err = MarketParams::builder().with_bytes_per_sector(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroParameter { name: "bytes_per_sector" });
    }

    #[test]
    fn test_rejects_nonpositive_cap() {
        let err = MarketParams::builder().with_gauge_cap(0).build().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveCap { cap: 0 });
    }

    #[test]
    fn test_rejects_oversized_curve_params() {
        let err = MarketParams::builder().with_curve_base(MAX_CURVE_BASE + 1).build().unwrap_err();
        assert!(matches!(err, ConfigError::ParameterTooLarge { name: "curve_base", .. }));

        let err = MarketParams::builder()
            .with_curve_min_price(MAX_CURVE_MIN_PRICE + 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParameterTooLarge { name: "curve_min_price", .. }));
    }

    #[test]
    fn test_role_addresses() {
        let roles = RoleSet {
            flow: Address::with_last_byte(1),
            mine: Address::with_last_byte(2),
            stake: Address::with_last_byte(3),
            treasury: Address::with_last_byte(4),
        };
        assert_eq!(roles.address_of(Role::Flow), roles.flow);
        assert_eq!(roles.address_of(Role::Mine), roles.mine);
        assert!(roles.require(Role::Flow, roles.flow).is_ok());
        let err = roles.require(Role::Mine, roles.flow).unwrap_err();
        assert_eq!(err, MarketError::Unauthorized { required: Role::Mine, caller: roles.flow });
    }
}
