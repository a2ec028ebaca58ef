//! Storage Market Metrics

use metrics::Counter;

/// Storage Market Metrics
#[derive(Clone, Debug)]
pub struct MarketMetrics {
    /// Number of settled purchases
    pub(crate) purchases_total: Counter,
    /// Bytes of capacity sold through purchases
    pub(crate) purchased_bytes_total: Counter,
    /// Number of upload token settlements
    pub(crate) upload_credits_total: Counter,
    /// Number of fee charges against paid submissions
    pub(crate) charges_total: Counter,
    /// Number of reward chunks finalized
    pub(crate) chunks_finalized_total: Counter,
    /// Number of mine reward claims paid out
    pub(crate) claims_total: Counter,
}

impl Default for MarketMetrics {
    fn default() -> Self {
        Self {
            purchases_total: metrics::counter!("market.purchases_total"),
            purchased_bytes_total: metrics::counter!("market.purchased_bytes_total"),
            upload_credits_total: metrics::counter!("market.upload_credits_total"),
            charges_total: metrics::counter!("market.charges_total"),
            chunks_finalized_total: metrics::counter!("market.chunks_finalized_total"),
            claims_total: metrics::counter!("market.claims_total"),
        }
    }
}

impl MarketMetrics {
    /// Records a settled purchase of `bytes` bytes.
    pub(crate) fn record_purchase(&self, bytes: u128) {
        self.purchases_total.increment(1);
        self.purchased_bytes_total.increment(bytes.min(u128::from(u64::MAX)) as u64);
    }

    /// Records an upload token settlement.
    pub(crate) fn record_upload_credit(&self) {
        self.upload_credits_total.increment(1);
    }

    /// Records a fee charge and any chunks it finalized.
    pub(crate) fn record_charge(&self, finalized: u32) {
        self.charges_total.increment(1);
        self.chunks_finalized_total.increment(u64::from(finalized));
    }

    /// Records a paid mine reward claim.
    pub(crate) fn record_claim(&self) {
        self.claims_total.increment(1);
    }
}
