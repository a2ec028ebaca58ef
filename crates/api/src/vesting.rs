//! Reward vesting seam.

use crate::Timestamp;
use alloy_primitives::U256;

/// Read-only view of a reward chunk handed to a vesting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkView {
    /// Position of the chunk in the append-only ledger.
    pub index: u64,
    /// Reward still locked in the chunk.
    pub locked_reward: U256,
    /// Reward already released but not yet paid out.
    pub claimable_reward: U256,
    /// Instant the chunk finalized and its vesting clock started.
    /// `None` while the chunk is still accumulating.
    pub start_time: Option<Timestamp>,
}

/// External unlock schedule consulted when a mine reward is claimed.
///
/// The market clamps the returned amount to the chunk's remaining locked
/// reward; a policy must release nothing for a chunk whose vesting clock
/// has not started.
#[auto_impl::auto_impl(&, Box)]
pub trait VestingPolicy {
    /// Amount of `chunk`'s locked reward releasable at `now`.
    fn releasable(&self, chunk: &ChunkView, now: Timestamp) -> U256;
}

/// Vesting policy that never releases locked reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVesting;

impl VestingPolicy for NoVesting {
    fn releasable(&self, _chunk: &ChunkView, _now: Timestamp) -> U256 {
        U256::ZERO
    }
}
