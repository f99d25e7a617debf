use super::{BlockSource, ResolveError};

/// Lowest store init block strictly below `start_block`, if any. Those
/// stores must be back-processed before the linear pipeline can begin.
#[must_use]
pub fn state_required_at(start_block: u64, store_init_blocks: &[u64]) -> Option<u64> {
    store_init_blocks
        .iter()
        .copied()
        .filter(|&init| init < start_block)
        .min()
}

/// Block where parallel back-processing hands over to the linear pipeline.
///
/// Production requests hand off at the last segment boundary at or below the
/// most recent final block, or at the stop block when the whole request is
/// already final. Development requests hand off as early as the stores allow,
/// never above the final block.
pub fn compute_linear_handoff_block(
    production_mode: bool,
    start_block: u64,
    stop_block: u64,
    state_required_at: Option<u64>,
    segment_size: u64,
    source: &impl BlockSource,
) -> Result<u64, ResolveError> {
    if segment_size == 0 {
        return Err(ResolveError::ZeroSegmentSize);
    }

    let state_required = state_required_at.is_some_and(|at| at <= start_block);

    if production_mode {
        let lib = match source.recent_final_block() {
            Ok(lib) => lib,
            Err(err) if stop_block == 0 => return Err(ResolveError::FinalBlockUnavailable(err)),
            Err(err) => {
                log::warn!(
                    "no recent final block ({err}), handing off at stop block {stop_block}"
                );
                return Ok(stop_block);
            }
        };
        let lib_boundary = round_down(lib, segment_size);

        if stop_block == 0 || lib < stop_block {
            if !state_required && start_block > lib_boundary {
                return Ok(start_block);
            }
            return Ok(lib_boundary);
        }

        return Ok(stop_block);
    }

    // no stores to catch up, blocks flow from the start block right away
    let Some(required_at) = state_required_at.filter(|_| state_required) else {
        return Ok(start_block);
    };

    let prev_boundary = round_down(start_block, segment_size);
    if required_at > prev_boundary {
        return Ok(required_at);
    }

    // tier-2 workers only read final blocks
    match source.recent_final_block() {
        Ok(lib) if prev_boundary > lib => Ok(round_down(lib, segment_size)),
        _ => Ok(prev_boundary),
    }
}

const fn round_down(block: u64, segment_size: u64) -> u64 {
    block - block % segment_size
}
