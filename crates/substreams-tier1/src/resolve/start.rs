use super::{BlockSource, ResolveError};

/// Resolve the client start block to an absolute block number.
///
/// - `0` means the chain's first streamable block.
/// - A positive start below the first streamable block is rejected.
/// - A negative start is an offset from the chain head, clamped at 0. When
///   the request is bounded and the offset reaches before the first
///   streamable block (counted from the stop block), the first streamable
///   block is used and the head is never consulted.
pub fn resolve_start_block(
    start_block_num: i64,
    stop_block_num: u64,
    first_streamable_block: u64,
    source: &impl BlockSource,
) -> Result<u64, ResolveError> {
    if let Ok(start_block) = u64::try_from(start_block_num) {
        if start_block == 0 {
            return Ok(first_streamable_block);
        }
        if start_block < first_streamable_block {
            return Err(ResolveError::StartBeforeFirstStreamable {
                start_block,
                first_streamable_block,
            });
        }

        return Ok(start_block);
    }

    if stop_block_num > 0
        && i128::from(stop_block_num) + i128::from(start_block_num)
            < i128::from(first_streamable_block)
    {
        return Ok(first_streamable_block);
    }

    let head = source.head_block().map_err(ResolveError::HeadBlock)?;

    Ok(head.saturating_sub(start_block_num.unsigned_abs()))
}
