//! Request resolution: turns raw client block numbers into the resolved
//! start, linear handoff and linear gate blocks fed to the planner.
//!
//! Cursor resolution happens upstream; the start block handed in here is
//! either absolute or relative to the chain head.

mod handoff;
mod start;
#[cfg(test)]
mod tests;

use crate::request::Request;
use substreams_config::Tier1Config;
use thiserror::Error as ThisError;

///
/// Re-Exports
///
pub use handoff::{compute_linear_handoff_block, state_required_at};
pub use start::resolve_start_block;

///
/// BlockSource
///
/// Chain view needed to resolve a request. Implementations usually sit on
/// top of the live block hub and merged block files.
///

pub trait BlockSource {
    /// Most recent irreversible block.
    fn recent_final_block(&self) -> Result<u64, BlockSourceError>;

    /// Current chain head.
    fn head_block(&self) -> Result<u64, BlockSourceError>;
}

///
/// BlockSourceError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct BlockSourceError {
    message: String,
}

impl BlockSourceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// ResolveError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolveError {
    #[error("segment size must be greater than zero")]
    ZeroSegmentSize,

    #[error(
        "invalid start block {start_block}, must be >= {first_streamable_block} (the first streamable block of the chain)"
    )]
    StartBeforeFirstStreamable {
        start_block: u64,
        first_streamable_block: u64,
    },

    #[error("resolving negative start block: {0}")]
    HeadBlock(BlockSourceError),

    #[error("cannot determine a recent finalized block: {0}")]
    FinalBlockUnavailable(BlockSourceError),

    #[error("start block {resolved_start_block} must be before stop block {stop_block}")]
    StartNotBeforeStop {
        resolved_start_block: u64,
        stop_block: u64,
    },
}

///
/// RequestDetails
///
/// Resolved block numbers for one tier-1 request.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequestDetails {
    pub production_mode: bool,
    pub resolved_start_block: u64,
    pub linear_handoff_block: u64,
    /// First block the linear pipeline sends to the client.
    pub linear_gate_block: u64,
    /// 0 means unbounded.
    pub stop_block: u64,
}

/// Resolve the start, handoff and gate blocks of a request.
pub fn build_request_details(
    config: &Tier1Config,
    request: &Request,
    store_init_blocks: &[u64],
    source: &impl BlockSource,
) -> Result<RequestDetails, ResolveError> {
    let resolved_start_block = resolve_start_block(
        request.start_block_num,
        request.stop_block_num,
        config.first_streamable_block,
        source,
    )?;

    if request.stop_block_num != 0 && resolved_start_block >= request.stop_block_num {
        return Err(ResolveError::StartNotBeforeStop {
            resolved_start_block,
            stop_block: request.stop_block_num,
        });
    }

    let linear_handoff_block = compute_linear_handoff_block(
        request.production_mode,
        resolved_start_block,
        request.stop_block_num,
        state_required_at(resolved_start_block, store_init_blocks),
        config.state_bundle_size,
        source,
    )?;

    Ok(RequestDetails {
        production_mode: request.production_mode,
        resolved_start_block,
        linear_handoff_block,
        linear_gate_block: resolved_start_block.max(linear_handoff_block),
        stop_block: request.stop_block_num,
    })
}
