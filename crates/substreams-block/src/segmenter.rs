//! Fixed-width segment arithmetic.
//!
//! Segment boundaries are the multiples of `interval`. Segment 0 starts at
//! `initial_block` (which may sit mid-segment) and ends on the first boundary
//! after it; every following segment is exactly `interval` blocks wide.

use crate::Range;
use derive_more::Display;


///
/// Segmenter
///
/// Stateless mapping between block numbers and segment indices.
///
/// `exclusive_end_block == 0` means the segmenter is unbounded; every
/// non-negative index then has a range. Ranges returned by `range` are never
/// clipped to the end block, use `clipped_range` for that.
///
/// The block space ends at `u64::MAX`: the segment holding it is cut short
/// with an exclusive end of `u64::MAX`, so that block itself is never covered.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("interval={interval}, initial={initial_block}, end={exclusive_end_block}")]
pub struct Segmenter {
    interval: u64,
    initial_block: u64,
    exclusive_end_block: u64,
}

impl Segmenter {
    /// Build a segmenter. `interval` must be non-zero.
    #[must_use]
    pub const fn new(interval: u64, initial_block: u64, exclusive_end_block: u64) -> Self {
        assert!(interval > 0, "segment interval must be non-zero");

        Self {
            interval,
            initial_block,
            exclusive_end_block,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    #[must_use]
    pub const fn initial_block(&self) -> u64 {
        self.initial_block
    }

    #[must_use]
    pub const fn exclusive_end_block(&self) -> u64 {
        self.exclusive_end_block
    }

    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        self.exclusive_end_block == 0
    }

    /// Bounded segmenter that covers no block at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.is_open_ended() && self.exclusive_end_block <= self.initial_block
    }

    #[must_use]
    pub const fn with_initial_block(&self, initial_block: u64) -> Self {
        Self::new(self.interval, initial_block, self.exclusive_end_block)
    }

    #[must_use]
    pub const fn with_exclusive_end_block(&self, exclusive_end_block: u64) -> Self {
        Self::new(self.interval, self.initial_block, exclusive_end_block)
    }

    const fn initial_segment(&self) -> u64 {
        self.initial_block / self.interval
    }

    /// Index of the segment containing `block`.
    ///
    /// Blocks below `initial_block` map to segment 0.
    #[must_use]
    pub const fn index_for_start_block(&self, block: u64) -> u64 {
        (block / self.interval).saturating_sub(self.initial_segment())
    }

    /// Index of the segment ending at `block` when it is a boundary past
    /// `initial_block`, otherwise the segment containing `block`.
    #[must_use]
    pub const fn index_for_end_block(&self, block: u64) -> u64 {
        if block % self.interval == 0 && block > self.initial_block {
            block / self.interval - self.initial_segment() - 1
        } else {
            self.index_for_start_block(block)
        }
    }

    /// Index of the segment holding the last block before the end.
    ///
    /// `None` for unbounded and empty segmenters.
    #[must_use]
    pub const fn last_index(&self) -> Option<u64> {
        if self.is_open_ended() || self.is_empty() {
            return None;
        }

        Some(self.index_for_end_block(self.exclusive_end_block))
    }

    /// Number of segments; `None` when unbounded.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        if self.is_open_ended() {
            return None;
        }

        match self.last_index() {
            Some(last) => Some(last + 1),
            None => Some(0),
        }
    }

    /// Full block range of segment `index`.
    ///
    /// `None` past the last segment of a bounded segmenter, or when the
    /// segment starts beyond the block space. A segment straddling the top of
    /// the block space ends at `u64::MAX`.
    #[must_use]
    pub fn range(&self, index: u64) -> Option<Range> {
        if !self.is_open_ended() {
            let last = self.last_index()?;
            if index > last {
                return None;
            }
        }

        let segment = self.initial_segment().checked_add(index)?;
        let start = if index == 0 {
            self.initial_block
        } else {
            segment.checked_mul(self.interval)?
        };
        let end = segment
            .checked_add(1)
            .and_then(|next| next.checked_mul(self.interval))
            .unwrap_or(u64::MAX);

        Some(Range::new(start, end))
    }

    /// `range` with the right edge clipped to the end block.
    #[must_use]
    pub fn clipped_range(&self, index: u64) -> Option<Range> {
        let range = self.range(index)?;
        if self.is_open_ended() || range.exclusive_end_block() <= self.exclusive_end_block {
            return Some(range);
        }

        Some(Range::new(range.start_block(), self.exclusive_end_block))
    }

    /// Whether segment `index`, once clipped, ends on an interval boundary.
    #[must_use]
    pub fn ends_on_interval(&self, index: u64) -> bool {
        self.clipped_range(index)
            .is_some_and(|range| range.exclusive_end_block() % self.interval == 0)
    }

    /// Whether segment `index`, once clipped, is narrower than one interval.
    #[must_use]
    pub fn is_partial(&self, index: u64) -> bool {
        self.clipped_range(index)
            .and_then(|range| range.len())
            .is_some_and(|len| len < self.interval)
    }
}
