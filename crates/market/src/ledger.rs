//! Append-only mining-reward ledger.
//!
//! Paid submissions move their basic fee into fixed-size chunks that fill
//! strictly in order. A chunk finalizes the instant it fills, which stamps
//! the vesting clock; the mine claims from finalized and accumulating
//! chunks alike, subject to the vesting policy.

use crate::config::MarketParams;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use sluice_api::{ChunkView, Timestamp};
use tracing::debug;

/// Reward state for one fixed-size span of accepted storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardChunk {
    /// Reward held back for release by the vesting schedule.
    pub locked_reward: U256,
    /// Reward released from `locked_reward` and waiting to be claimed.
    pub claimable_reward: U256,
    /// Bytes of paid submission accounted to this chunk so far.
    pub filled_bytes: u64,
    /// Finalization time. `None` until the chunk fills completely.
    pub start_time: Option<Timestamp>,
}

impl RewardChunk {
    /// Read-only view handed to vesting policies.
    pub const fn as_view(&self, index: u64) -> ChunkView {
        ChunkView {
            index,
            locked_reward: self.locked_reward,
            claimable_reward: self.claimable_reward,
            start_time: self.start_time,
        }
    }
}

/// Ordered collection of reward chunks.
///
/// Only the tail chunk ever accepts new reward; earlier chunks are full and
/// finalized. `allocate` keeps that invariant, so a chunk's `start_time` is
/// monotone in its index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    chunks: Vec<RewardChunk>,
}

impl RewardLedger {
    /// Number of chunks opened so far, including the accumulating tail.
    pub fn chunk_count(&self) -> u64 {
        self.chunks.len() as u64
    }

    /// The chunk at `index`, if one has been opened.
    pub fn chunk(&self, index: u64) -> Option<&RewardChunk> {
        usize::try_from(index).ok().and_then(|i| self.chunks.get(i))
    }

    pub(crate) fn chunk_mut(&mut self, index: u64) -> Option<&mut RewardChunk> {
        usize::try_from(index).ok().and_then(|i| self.chunks.get_mut(i))
    }

    /// Locks `basic_price * bytes` of reward into the tail, opening and
    /// finalizing chunks as the span crosses boundaries.
    ///
    /// Finalized chunks get `now` as their vesting start. Returns how many
    /// chunks finalized during this allocation. Cannot fail: per chunk the
    /// locked reward is bounded by `basic_price * chunk_size`, far inside
    /// `U256`.
    pub(crate) fn allocate(&mut self, params: &MarketParams, bytes: u128, now: Timestamp) -> u32 {
        let mut remaining = bytes;
        let mut finalized = 0u32;
        while remaining > 0 {
            if self.chunks.last().is_none_or(|tail| tail.filled_bytes == params.chunk_size) {
                self.chunks.push(RewardChunk::default());
            }
            let index = self.chunks.len() as u64 - 1;
            if let Some(chunk) = self.chunks.last_mut() {
                let space = params.chunk_size - chunk.filled_bytes;
                // space > 0 here, so every pass consumes some of the span
                let taken = remaining.min(u128::from(space)) as u64;
                chunk.filled_bytes += taken;
                chunk.locked_reward += U256::from(params.basic_price) * U256::from(taken);
                remaining -= u128::from(taken);
                if chunk.filled_bytes == params.chunk_size {
                    chunk.start_time = Some(now);
                    finalized += 1;
                    debug!(chunk = index, time = now, "Reward chunk finalized");
                }
            }
        }
        finalized
    }
}
