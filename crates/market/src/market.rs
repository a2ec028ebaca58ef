//! Market entry points and settlement pipeline.
//!
//! # Operation Discipline
//!
//! Every entry point runs the same pipeline: check the role gate, settle
//! the gauge drip, validate and price with checked arithmetic, call the
//! collaborators, then commit engine state. Collaborator calls are the
//! last fallible stage, so a decline aborts with every balance as it was.
//! The drip settlement itself survives failed operations: it records only
//! the passage of time and carries no effect of the failed call.
//!
//! # Money Flow
//!
//! A purchase charges the buyer once, into the treasury's reward pool,
//! then forwards the exact priority integral from the pool to the stake
//! account. Claims pay out of the pool. The upload-token path moves no
//! payment at all; the credit was bought up front and consuming it only
//! burns tokens and records the flat fee as prepaid.

use crate::{
    config::{MarketParams, Role},
    curve::PriorityCurve,
    error::{MarketError, MarketResult},
    gauge::DripGauge,
    ledger::{RewardChunk, RewardLedger},
    metrics::MarketMetrics,
};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use sluice_api::{PaymentLedger, Timestamp, UploadCredit, VestingPolicy};
use tracing::debug;

/// Prepaid balances waiting for submissions to finalize.
///
/// Purchases and upload-token consumption credit this account; fee charges
/// drain it into the reward ledger. The fee balance always covers the flat
/// basic price of every prepaid sector, because both crediting paths add at
/// least that much per sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAccount {
    /// Sectors of capacity paid for and not yet finalized.
    pub paid_upload_amount: u64,
    /// Fees prepaid against those sectors, owed to the reward ledger.
    pub paid_fee: U256,
}

/// Priced outcome of a settled purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display(
    "{amount_sectors} sectors at {basic_unit_price}+{priority_unit_price}+{tip_unit_price} per byte, total {total_paid}"
)]
pub struct PurchaseReceipt {
    /// Sectors of capacity purchased.
    pub amount_sectors: u64,
    /// Bytes those sectors cover.
    pub purchase_bytes: u128,
    /// Flat component of the unit price, per byte.
    pub basic_unit_price: u128,
    /// Congestion component of the unit price, per byte, rounded up from
    /// the exact integral.
    pub priority_unit_price: u128,
    /// Tip actually charged per byte, after capping to the ceiling.
    pub tip_unit_price: u128,
    /// Exact curve integral forwarded to the stake account.
    pub priority_fee: U256,
    /// Full amount the buyer paid.
    pub total_paid: U256,
}

/// Externally observable engine state, projected to a query instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Gauge value in bytes of capacity credit.
    pub gauge: i128,
    /// Upward drip rate in bytes per second.
    pub dripping_rate: u128,
    /// Cumulative finalized submissions in sectors.
    pub total_submission: u64,
    /// Sectors prepaid and awaiting finalization.
    pub paid_upload_amount: u64,
    /// Fees prepaid and awaiting finalization.
    pub paid_fee: U256,
    /// Reward chunks opened so far.
    pub reward_chunks: u64,
}

/// The fee-market and mining-reward engine.
///
/// Generic over its collaborators so deployments wire in real payment and
/// credit rails while tests use the stand-ins from `sluice-api`. All state
/// lives in this struct; the host serializes operations, so entry points
/// take `&mut self` and an explicit `now`.
pub struct StorageMarket<P, C, V> {
    params: MarketParams,
    curve: PriorityCurve,
    gauge: DripGauge,
    pending: PendingAccount,
    ledger: RewardLedger,
    payment: P,
    credit: C,
    vesting: V,
    metrics: MarketMetrics,
}

impl<P, C, V> StorageMarket<P, C, V>
where
    P: PaymentLedger,
    C: UploadCredit,
    V: VestingPolicy,
{
    /// Create an engine with zeroed accounting, starting its drip clock at
    /// `genesis`.
    pub fn new(
        params: MarketParams,
        payment: P,
        credit: C,
        vesting: V,
        genesis: Timestamp,
    ) -> Self {
        let curve = PriorityCurve::new(&params);
        Self {
            params,
            curve,
            gauge: DripGauge::new(genesis),
            pending: PendingAccount::default(),
            ledger: RewardLedger::default(),
            payment,
            credit,
            vesting,
            metrics: MarketMetrics::default(),
        }
    }

    /// Pricing constants and role wiring fixed at construction.
    pub const fn params(&self) -> &MarketParams {
        &self.params
    }

    /// The payment collaborator.
    pub const fn payment(&self) -> &P {
        &self.payment
    }

    /// The upload-credit collaborator.
    pub const fn credit(&self) -> &C {
        &self.credit
    }

    /// Gauge value projected to `now`.
    ///
    /// Reads do not persist the settlement; the projection equals what any
    /// mutating entry point at `now` would settle to.
    pub fn gauge(&self, now: Timestamp) -> i128 {
        self.gauge.projected_value(&self.params, now)
    }

    /// Current upward drip rate in bytes per second.
    pub fn dripping_rate(&self) -> u128 {
        self.gauge.dripping_rate(&self.params)
    }

    /// Cumulative finalized submissions in sectors.
    pub const fn total_submission(&self) -> u64 {
        self.gauge.total_submission()
    }

    /// Sectors prepaid and not yet finalized.
    pub const fn paid_upload_amount(&self) -> u64 {
        self.pending.paid_upload_amount
    }

    /// Fees prepaid and not yet moved into reward chunks.
    pub const fn paid_fee(&self) -> U256 {
        self.pending.paid_fee
    }

    /// Number of reward chunks opened so far.
    pub fn reward_chunk_count(&self) -> u64 {
        self.ledger.chunk_count()
    }

    /// Reward state of the chunk at `index`.
    pub fn rewards(&self, index: u64) -> MarketResult<RewardChunk> {
        self.ledger
            .chunk(index)
            .copied()
            .ok_or(MarketError::UnknownChunk { index, chunks: self.ledger.chunk_count() })
    }

    /// Full observable state projected to `now`.
    pub fn snapshot(&self, now: Timestamp) -> MarketSnapshot {
        MarketSnapshot {
            gauge: self.gauge.projected_value(&self.params, now),
            dripping_rate: self.dripping_rate(),
            total_submission: self.gauge.total_submission(),
            paid_upload_amount: self.pending.paid_upload_amount,
            paid_fee: self.pending.paid_fee,
            reward_chunks: self.ledger.chunk_count(),
        }
    }

    /// Settle the gauge drip up to `now` with no other effect.
    ///
    /// Unprivileged. Every other entry point performs the same settlement
    /// implicitly before acting.
    pub fn update_gauge(&mut self, now: Timestamp) {
        self.gauge.settle(&self.params, now);
    }

    /// Overwrite the cumulative submission counter.
    ///
    /// The counter feeds the drip rate, so the elapsed interval settles at
    /// the old rate first and the new rate applies from `now` forward.
    /// Submissions are cumulative; a regressing value is rejected.
    pub fn update_total_submission(
        &mut self,
        caller: Address,
        new_total: u64,
        now: Timestamp,
    ) -> MarketResult<()> {
        self.params.roles.require(Role::Flow, caller)?;
        self.gauge.settle(&self.params, now);
        let current = self.gauge.total_submission();
        if new_total < current {
            return Err(MarketError::InvalidSubmission { current, proposed: new_total });
        }
        self.gauge.set_total_submission(new_total);
        debug!(total = new_total, "Total submission updated");
        Ok(())
    }

    /// Buy `amount` sectors of upload capacity.
    ///
    /// The unit price is `basic + priority + tip` per byte. The priority
    /// component is the curve integral over the deficit range the purchase
    /// crosses, spread over the purchased bytes rounded up; the tip is
    /// capped to whatever budget `max_unit_price` leaves after the two
    /// mandatory components, and the whole purchase fails with
    /// [`MarketError::PriceLimitExceeded`] if that budget is negative.
    ///
    /// The buyer pays `unit * bytes` into the reward pool in one transfer;
    /// the exact integral (not the rounded per-byte product) is then
    /// forwarded from the pool to the stake account. The remainder stays in
    /// the pool and is recorded as prepaid fee. The gauge is debited by the
    /// full byte span with no lower clamp.
    pub fn purchase(
        &mut self,
        buyer: Address,
        amount: u64,
        max_unit_price: u128,
        tip_unit_price: u128,
        now: Timestamp,
    ) -> MarketResult<PurchaseReceipt> {
        self.gauge.settle(&self.params, now);
        let basic = self.params.basic_price;
        if amount == 0 {
            return Ok(PurchaseReceipt {
                amount_sectors: 0,
                purchase_bytes: 0,
                basic_unit_price: basic,
                priority_unit_price: 0,
                tip_unit_price: 0,
                priority_fee: U256::ZERO,
                total_paid: U256::ZERO,
            });
        }
        // both factors are 64-bit so the span fits u128
        let bytes = u128::from(amount) * u128::from(self.params.bytes_per_sector);
        let fee = self.curve.priority_fee(self.gauge.value(), bytes)?;
        let priority_unit = unit_price_ceil(fee, bytes)?;
        let required = basic
            .checked_add(priority_unit)
            .ok_or(MarketError::Overflow { what: "required unit price" })?;
        if max_unit_price < required {
            return Err(MarketError::PriceLimitExceeded {
                max_unit_price,
                required_unit_price: required,
            });
        }
        let tip_charged = tip_unit_price.min(max_unit_price - required);
        // unit <= max_unit_price, and a u128 * u128 product always fits U256
        let unit = required + tip_charged;
        let total = U256::from(unit) * U256::from(bytes);
        // the rounded unit price makes total cover the exact integral
        let pool_share = total - fee;

        let paid_after = self
            .pending
            .paid_upload_amount
            .checked_add(amount)
            .ok_or(MarketError::Overflow { what: "prepaid sector balance" })?;
        let fee_after = self
            .pending
            .paid_fee
            .checked_add(pool_share)
            .ok_or(MarketError::Overflow { what: "prepaid fee balance" })?;

        self.payment.transfer_from(buyer, self.params.roles.treasury, total)?;
        if !fee.is_zero() {
            self.payment.transfer(self.params.roles.stake, fee)?;
        }

        self.pending.paid_upload_amount = paid_after;
        self.pending.paid_fee = fee_after;
        self.gauge.debit(bytes);
        self.metrics.record_purchase(bytes);

        let receipt = PurchaseReceipt {
            amount_sectors: amount,
            purchase_bytes: bytes,
            basic_unit_price: basic,
            priority_unit_price: priority_unit,
            tip_unit_price: tip_charged,
            priority_fee: fee,
            total_paid: total,
        };
        debug!(%buyer, %receipt, "Purchase settled");
        Ok(receipt)
    }

    /// Redeem pre-purchased upload credit for `amount` sectors.
    ///
    /// Burns `upload_token_per_sector * amount` of the holder's credit and
    /// records the flat basic fee as prepaid. The capacity was reserved
    /// when the credit was bought, so this path never consults the curve
    /// and never debits the gauge.
    pub fn consume_upload_token(
        &mut self,
        holder: Address,
        amount: u64,
        now: Timestamp,
    ) -> MarketResult<()> {
        self.gauge.settle(&self.params, now);
        if amount == 0 {
            return Ok(());
        }
        let bytes = u128::from(amount) * u128::from(self.params.bytes_per_sector);
        let tokens = self
            .params
            .upload_token_per_sector
            .checked_mul(U256::from(amount))
            .ok_or(MarketError::Overflow { what: "upload token amount" })?;
        let flat_fee = U256::from(self.params.basic_price) * U256::from(bytes);
        let paid_after = self
            .pending
            .paid_upload_amount
            .checked_add(amount)
            .ok_or(MarketError::Overflow { what: "prepaid sector balance" })?;
        let fee_after = self
            .pending
            .paid_fee
            .checked_add(flat_fee)
            .ok_or(MarketError::Overflow { what: "prepaid fee balance" })?;

        self.credit.consume(holder, tokens)?;

        self.pending.paid_upload_amount = paid_after;
        self.pending.paid_fee = fee_after;
        self.metrics.record_upload_credit();
        debug!(%holder, sectors = amount, "Upload token consumed");
        Ok(())
    }

    /// Report finalized submissions and charge their fees into the ledger.
    ///
    /// Only the flow role may call this. `submitted_sectors` advances the
    /// cumulative submission counter, raising the drip rate from `now`
    /// forward; `paid_sectors` must not exceed the prepaid balance and
    /// moves the flat basic fee for those sectors out of
    /// [`PendingAccount`] into reward chunks, finalizing every chunk the
    /// span fills. Tip and priority differentials were settled at purchase
    /// time and never reach the ledger.
    pub fn charge_fee(
        &mut self,
        caller: Address,
        submitted_sectors: u64,
        paid_sectors: u64,
        now: Timestamp,
    ) -> MarketResult<()> {
        self.params.roles.require(Role::Flow, caller)?;
        self.gauge.settle(&self.params, now);
        if paid_sectors > self.pending.paid_upload_amount {
            return Err(MarketError::SubmissionNotPaid {
                paid_sectors,
                available_sectors: self.pending.paid_upload_amount,
            });
        }
        let new_total = self
            .gauge
            .total_submission()
            .checked_add(submitted_sectors)
            .ok_or(MarketError::Overflow { what: "total submission" })?;
        let bytes = u128::from(paid_sectors) * u128::from(self.params.bytes_per_sector);
        let moved_fee = U256::from(self.params.basic_price) * U256::from(bytes);

        self.gauge.set_total_submission(new_total);
        self.pending.paid_upload_amount -= paid_sectors;
        // prepaid fees always cover the flat price of prepaid sectors
        self.pending.paid_fee = self.pending.paid_fee.saturating_sub(moved_fee);
        let finalized = self.ledger.allocate(&self.params, bytes, now);
        self.metrics.record_charge(finalized);
        debug!(sectors = paid_sectors, total = new_total, finalized, "Submission fees charged");
        Ok(())
    }

    /// Pay out the claimable reward of chunk `chunk_index` to `beneficiary`.
    ///
    /// Only the mine role may call this. The vesting policy is consulted
    /// first, migrating whatever it releases from locked to claimable, and
    /// the whole claimable balance is then transferred out of the reward
    /// pool and zeroed. Returns the amount paid; claiming a chunk with
    /// nothing claimable succeeds and pays zero.
    pub fn claim_mine_reward(
        &mut self,
        caller: Address,
        chunk_index: u64,
        beneficiary: Address,
        now: Timestamp,
    ) -> MarketResult<U256> {
        self.params.roles.require(Role::Mine, caller)?;
        self.gauge.settle(&self.params, now);
        let chunk = self.rewards(chunk_index)?;
        let released =
            self.vesting.releasable(&chunk.as_view(chunk_index), now).min(chunk.locked_reward);
        // released is clamped to locked, so the sum stays within the
        // reward ever allocated to the chunk
        let payout = chunk.claimable_reward + released;
        if payout.is_zero() {
            return Ok(U256::ZERO);
        }
        self.payment.transfer(beneficiary, payout)?;
        if let Some(chunk) = self.ledger.chunk_mut(chunk_index) {
            chunk.locked_reward -= released;
            chunk.claimable_reward = U256::ZERO;
        }
        self.metrics.record_claim();
        debug!(chunk = chunk_index, %beneficiary, %payout, "Mine reward claimed");
        Ok(payout)
    }
}

/// Per-byte price covering `fee` over `bytes`, rounded up.
fn unit_price_ceil(fee: U256, bytes: u128) -> MarketResult<u128> {
    let (unit, rem) = fee.div_rem(U256::from(bytes));
    let unit = if rem.is_zero() { unit } else { unit + U256::from(1u8) };
    u128::try_from(unit).map_err(|_| MarketError::Overflow { what: "priority unit price" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoleSet;
    use crate::constants::{DEFAULT_BASIC_PRICE, DEFAULT_GAUGE_CAP};
    use assert_matches::assert_matches;
    use sluice_api::{ChunkView, NoVesting, UnlimitedCredit, UnmeteredPayment};

    fn roles() -> RoleSet {
        RoleSet {
            flow: Address::with_last_byte(1),
            mine: Address::with_last_byte(2),
            stake: Address::with_last_byte(3),
            treasury: Address::with_last_byte(4),
        }
    }

    fn buyer() -> Address {
        Address::with_last_byte(9)
    }

    fn market() -> StorageMarket<UnmeteredPayment, UnlimitedCredit, NoVesting> {
        market_with_vesting(NoVesting)
    }

    fn market_with_vesting<V: VestingPolicy>(
        vesting: V,
    ) -> StorageMarket<UnmeteredPayment, UnlimitedCredit, V> {
        let params = MarketParams::builder().with_roles(roles()).build().unwrap();
        StorageMarket::new(params, UnmeteredPayment, UnlimitedCredit, vesting, 0)
    }

    /// Enough submissions for a brisk drip, then a long wait to pin the
    /// gauge at its cap.
    fn market_at_cap() -> StorageMarket<UnmeteredPayment, UnlimitedCredit, NoVesting> {
        let mut market = market();
        market.update_total_submission(roles().flow, (3u64 << 40) / 256, 0).unwrap();
        market.update_gauge(1 << 30);
        market
    }

    /// Releases everything locked once the chunk has finalized.
    struct FullVesting;

    impl VestingPolicy for FullVesting {
        fn releasable(&self, chunk: &ChunkView, _now: Timestamp) -> U256 {
            if chunk.start_time.is_some() { chunk.locked_reward } else { U256::ZERO }
        }
    }

    #[test]
    fn test_zero_purchase_is_noop() {
        let mut market = market();
        let receipt = market.purchase(buyer(), 0, 0, 0, 5).unwrap();
        assert_eq!(receipt.total_paid, U256::ZERO);
        assert_eq!(market.paid_upload_amount(), 0);
        assert_eq!(market.gauge(5), 0);
    }

    #[test]
    fn test_purchase_with_spare_capacity_pays_base_only() {
        let now = 1 << 30;
        let mut market = market_at_cap();
        let cap = i128::from(DEFAULT_GAUGE_CAP);
        assert_eq!(market.gauge(now), cap);

        let receipt = market.purchase(buyer(), 10, DEFAULT_BASIC_PRICE, 0, now).unwrap();

        assert_eq!(receipt.purchase_bytes, 10 * 256);
        assert_eq!(receipt.priority_unit_price, 0);
        assert_eq!(receipt.priority_fee, U256::ZERO);
        assert_eq!(receipt.total_paid, U256::from(DEFAULT_BASIC_PRICE * 10 * 256));
        // credit pinned at the cap drops by exactly the purchased span
        assert_eq!(market.gauge(now), cap - 10 * 256);
        assert_eq!(market.paid_upload_amount(), 10);
        assert_eq!(market.paid_fee(), U256::from(DEFAULT_BASIC_PRICE * 10 * 256));
    }

    #[test]
    fn test_purchase_rejects_ceiling_below_base() {
        let mut market = market_at_cap();
        let err = market.purchase(buyer(), 10, DEFAULT_BASIC_PRICE - 1, 0, 1 << 30).unwrap_err();
        assert_matches!(
            err,
            MarketError::PriceLimitExceeded { required_unit_price, .. }
                if required_unit_price == DEFAULT_BASIC_PRICE
        );
        assert_eq!(market.paid_upload_amount(), 0);
    }

    #[test]
    fn test_tip_capped_to_ceiling_budget() {
        let now = 1 << 30;
        let mut market = market_at_cap();
        let receipt =
            market.purchase(buyer(), 4, DEFAULT_BASIC_PRICE + 5, u128::MAX, now).unwrap();

        assert_eq!(receipt.tip_unit_price, 5);
        assert_eq!(receipt.total_paid, U256::from((DEFAULT_BASIC_PRICE + 5) * 4 * 256));
        // with no deficit the whole charge stays in the pool
        assert_eq!(market.paid_fee(), receipt.total_paid);
    }

    #[test]
    fn test_deficit_purchase_charges_priority() {
        let mut market = market();
        // gauge starts at zero, so the whole span is below zero
        let receipt = market.purchase(buyer(), 8, u128::MAX, 0, 0).unwrap();

        assert!(receipt.priority_unit_price > 0);
        assert!(!receipt.priority_fee.is_zero());
        assert_eq!(market.gauge(0), -(8 * 256));
        // the pool share excludes exactly the integral
        assert_eq!(market.paid_fee(), receipt.total_paid - receipt.priority_fee);
    }

    #[test]
    fn test_purchase_beyond_priced_depth_fails() {
        let mut market = market();
        let max_depth = 64u128 << 30;
        let sectors = u64::try_from(max_depth / 256 + 1).unwrap();
        let err = market.purchase(buyer(), sectors, u128::MAX, 0, 0).unwrap_err();
        assert_matches!(err, MarketError::GaugeUnderflow { .. });
        assert_eq!(market.gauge(0), 0);
    }

    #[test]
    fn test_consume_upload_token_skips_gauge() {
        let now = 1 << 30;
        let mut market = market_at_cap();
        let before = market.gauge(now);

        market.consume_upload_token(buyer(), 6, now).unwrap();

        assert_eq!(market.gauge(now), before);
        assert_eq!(market.paid_upload_amount(), 6);
        assert_eq!(market.paid_fee(), U256::from(DEFAULT_BASIC_PRICE * 6 * 256));
    }

    #[test]
    fn test_charge_fee_requires_flow_role() {
        let mut market = market();
        let err = market.charge_fee(buyer(), 1, 0, 0).unwrap_err();
        assert_matches!(err, MarketError::Unauthorized { required: Role::Flow, .. });
    }

    #[test]
    fn test_charge_fee_rejects_unpaid_sectors() {
        let mut market = market_at_cap();
        market.purchase(buyer(), 3, u128::MAX, 0, 1 << 30).unwrap();

        let err = market.charge_fee(roles().flow, 4, 4, 1 << 30).unwrap_err();
        assert_matches!(
            err,
            MarketError::SubmissionNotPaid { paid_sectors: 4, available_sectors: 3 }
        );
    }

    #[test]
    fn test_charge_fee_moves_prepaid_into_ledger() {
        let now = 1 << 30;
        let mut market = market_at_cap();
        market.purchase(buyer(), 10, u128::MAX, 0, now).unwrap();
        let fee_before = market.paid_fee();
        let total_before = market.total_submission();

        market.charge_fee(roles().flow, 10, 10, now).unwrap();

        let flat = U256::from(DEFAULT_BASIC_PRICE * 10 * 256);
        assert_eq!(market.paid_upload_amount(), 0);
        assert_eq!(market.paid_fee(), fee_before - flat);
        assert_eq!(market.total_submission(), total_before + 10);
        assert_eq!(market.reward_chunk_count(), 1);
        let chunk = market.rewards(0).unwrap();
        assert_eq!(chunk.locked_reward, flat);
        assert_eq!(chunk.start_time, None);
    }

    #[test]
    fn test_update_total_submission_rejects_regression() {
        let mut market = market();
        market.update_total_submission(roles().flow, 100, 0).unwrap();
        let err = market.update_total_submission(roles().flow, 99, 1).unwrap_err();
        assert_matches!(err, MarketError::InvalidSubmission { current: 100, proposed: 99 });
    }

    #[test]
    fn test_update_total_submission_requires_flow_role() {
        let mut market = market();
        let err = market.update_total_submission(buyer(), 5, 0).unwrap_err();
        assert_matches!(err, MarketError::Unauthorized { required: Role::Flow, .. });
    }

    #[test]
    fn test_claim_requires_mine_role() {
        let mut market = market();
        let err = market.claim_mine_reward(buyer(), 0, buyer(), 0).unwrap_err();
        assert_matches!(err, MarketError::Unauthorized { required: Role::Mine, .. });
    }

    #[test]
    fn test_claim_unknown_chunk_fails() {
        let mut market = market();
        let err = market.claim_mine_reward(roles().mine, 3, buyer(), 0).unwrap_err();
        assert_matches!(err, MarketError::UnknownChunk { index: 3, chunks: 0 });
    }

    #[test]
    fn test_claim_without_vesting_pays_nothing() {
        let now = 1 << 30;
        let mut market = market_at_cap();
        market.purchase(buyer(), 10, u128::MAX, 0, now).unwrap();
        market.charge_fee(roles().flow, 10, 10, now).unwrap();

        let paid = market.claim_mine_reward(roles().mine, 0, buyer(), now).unwrap();
        assert_eq!(paid, U256::ZERO);
        let flat = U256::from(DEFAULT_BASIC_PRICE * 10 * 256);
        assert_eq!(market.rewards(0).unwrap().locked_reward, flat);
    }

    #[test]
    fn test_claim_pays_released_reward_once() {
        let now = 1 << 30;
        let mut market = market_with_vesting(FullVesting);
        market.update_total_submission(roles().flow, (3u64 << 40) / 256, 0).unwrap();
        market.update_gauge(now);
        // fill one whole chunk so it finalizes and vests
        let sectors = market.params().chunk_size / 256;
        market.purchase(buyer(), sectors, u128::MAX, 0, now).unwrap();
        market.charge_fee(roles().flow, sectors, sectors, now).unwrap();
        let locked = market.rewards(0).unwrap().locked_reward;
        assert!(!locked.is_zero());

        let paid = market.claim_mine_reward(roles().mine, 0, buyer(), now).unwrap();
        assert_eq!(paid, locked);

        let chunk = market.rewards(0).unwrap();
        assert_eq!(chunk.locked_reward, U256::ZERO);
        assert_eq!(chunk.claimable_reward, U256::ZERO);

        let again = market.claim_mine_reward(roles().mine, 0, buyer(), now).unwrap();
        assert_eq!(again, U256::ZERO);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let now = 1 << 30;
        let mut market = market_at_cap();
        market.purchase(buyer(), 5, u128::MAX, 0, now).unwrap();

        let snapshot = market.snapshot(now);
        assert_eq!(snapshot.gauge, i128::from(DEFAULT_GAUGE_CAP) - 5 * 256);
        assert_eq!(snapshot.total_submission, (3u64 << 40) / 256);
        assert_eq!(snapshot.paid_upload_amount, 5);
        assert_eq!(snapshot.reward_chunks, 0);
    }

    #[test]
    fn test_reads_do_not_mutate() {
        let market = market();
        assert_eq!(market.gauge(100), market.gauge(100));
        assert_eq!(market.snapshot(100), market.snapshot(100));
    }
}
