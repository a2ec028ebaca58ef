//! Upload-credit token seam.

use alloy_primitives::{Address, U256};

/// Returned when the upload-credit collaborator refuses a consumption.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("upload credit declined: {reason}")]
pub struct CreditDeclined {
    /// Collaborator-reported reason for the refusal.
    pub reason: String,
}

impl CreditDeclined {
    /// Create a decline with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Pre-purchased upload credit redeemed against a holder's balance.
///
/// The market applies its fixed token-per-sector exchange rate before
/// invoking [`consume`](UploadCredit::consume), so `amount` is denominated
/// in credit tokens, not sectors.
#[auto_impl::auto_impl(&mut, Box)]
pub trait UploadCredit {
    /// Burn `amount` of credit from `holder`.
    fn consume(&mut self, holder: Address, amount: U256) -> Result<(), CreditDeclined>;
}

/// Upload credit that never declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedCredit;

impl UploadCredit for UnlimitedCredit {
    fn consume(&mut self, _holder: Address, _amount: U256) -> Result<(), CreditDeclined> {
        Ok(())
    }
}
