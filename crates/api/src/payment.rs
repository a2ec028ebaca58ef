//! Payment token seam.

use alloy_primitives::{Address, U256};

/// Returned when the payment collaborator refuses a transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("payment declined: {reason}")]
pub struct PaymentDeclined {
    /// Collaborator-reported reason for the refusal.
    pub reason: String,
}

impl PaymentDeclined {
    /// Create a decline with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Fungible payment token the market settles through.
///
/// Transfers are synchronous and all-or-nothing: a returned
/// [`PaymentDeclined`] means no value moved.
#[auto_impl::auto_impl(&mut, Box)]
pub trait PaymentLedger {
    /// Move `amount` from `payer` to `recipient` against the payer's prior
    /// approval.
    fn transfer_from(
        &mut self,
        payer: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<(), PaymentDeclined>;

    /// Move `amount` out of the market's treasury to `recipient`.
    fn transfer(&mut self, recipient: Address, amount: U256) -> Result<(), PaymentDeclined>;
}

/// Payment ledger that accepts every transfer and tracks nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmeteredPayment;

impl PaymentLedger for UnmeteredPayment {
    fn transfer_from(
        &mut self,
        _payer: Address,
        _recipient: Address,
        _amount: U256,
    ) -> Result<(), PaymentDeclined> {
        Ok(())
    }

    fn transfer(&mut self, _recipient: Address, _amount: U256) -> Result<(), PaymentDeclined> {
        Ok(())
    }
}
