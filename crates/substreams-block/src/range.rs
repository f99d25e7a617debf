use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{num::ParseIntError, str::FromStr};
use thiserror::Error as ThisError;

///
/// RangeError
///
/// Construction and parsing failures for block ranges.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RangeError {
    #[error("range start {start_block} is after exclusive end {exclusive_end_block}")]
    Inverted {
        start_block: u64,
        exclusive_end_block: u64,
    },

    #[error("range '{input}' is not of the form 'start-end'")]
    Malformed { input: String },

    #[error("range '{input}' has an invalid block number: {source}")]
    InvalidBlock {
        input: String,
        source: ParseIntError,
    },
}

///
/// Range
///
/// Half-open block interval `[start_block, exclusive_end_block)`.
///
/// An `exclusive_end_block` of 0 marks an open-ended range (live tail). Use
/// `is_open_ended` instead of comparing against 0 directly.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[display("{start_block}-{exclusive_end_block}")]
#[serde(try_from = "RawRange")]
pub struct Range {
    start_block: u64,
    exclusive_end_block: u64,
}

impl Range {
    /// Build a range, panicking if a bounded end precedes the start.
    #[must_use]
    pub const fn new(start_block: u64, exclusive_end_block: u64) -> Self {
        assert!(
            exclusive_end_block == 0 || start_block <= exclusive_end_block,
            "range start must not be after its exclusive end"
        );

        Self {
            start_block,
            exclusive_end_block,
        }
    }

    /// Open-ended range starting at `start_block`.
    #[must_use]
    pub const fn open(start_block: u64) -> Self {
        Self::new(start_block, 0)
    }

    pub const fn try_new(start_block: u64, exclusive_end_block: u64) -> Result<Self, RangeError> {
        if exclusive_end_block != 0 && start_block > exclusive_end_block {
            return Err(RangeError::Inverted {
                start_block,
                exclusive_end_block,
            });
        }

        Ok(Self {
            start_block,
            exclusive_end_block,
        })
    }

    #[must_use]
    pub const fn start_block(&self) -> u64 {
        self.start_block
    }

    /// Raw exclusive end; 0 when open-ended.
    #[must_use]
    pub const fn exclusive_end_block(&self) -> u64 {
        self.exclusive_end_block
    }

    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        self.exclusive_end_block == 0
    }

    /// Number of blocks covered, or `None` for an open-ended range.
    #[must_use]
    pub const fn len(&self) -> Option<u64> {
        if self.is_open_ended() {
            None
        } else {
            Some(self.exclusive_end_block - self.start_block)
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.is_open_ended() && self.start_block == self.exclusive_end_block
    }

    #[must_use]
    pub const fn contains(&self, block: u64) -> bool {
        block >= self.start_block && (self.is_open_ended() || block < self.exclusive_end_block)
    }

    /// Range of `size` blocks starting where this one ends.
    #[must_use]
    pub fn next(&self, size: u64) -> Option<Self> {
        if self.is_open_ended() {
            return None;
        }
        let end = self.exclusive_end_block.checked_add(size)?;

        Some(Self::new(self.exclusive_end_block, end))
    }

    /// Range of `size` blocks ending where this one starts.
    #[must_use]
    pub fn previous(&self, size: u64) -> Option<Self> {
        if self.start_block == 0 {
            return None;
        }
        let start = self.start_block.checked_sub(size)?;

        Some(Self::new(start, self.start_block))
    }

    #[must_use]
    pub fn is_next(&self, other: &Self, size: u64) -> bool {
        self.next(size).as_ref() == Some(other)
    }

    /// Split on `chunk_size`-aligned boundaries.
    ///
    /// The first piece ends on the first multiple of `chunk_size` after the
    /// start, the last piece is clipped to the exclusive end. Open-ended
    /// ranges and ranges no wider than one chunk come back whole.
    #[must_use]
    pub fn split(&self, chunk_size: u64) -> Vec<Self> {
        let Some(len) = self.len() else {
            return vec![*self];
        };
        if chunk_size == 0 || len <= chunk_size {
            return vec![*self];
        }

        let mut out = Vec::new();
        let mut start = self.start_block;
        let mut end = (start / chunk_size + 1).saturating_mul(chunk_size);
        loop {
            let clipped = end.min(self.exclusive_end_block);
            out.push(Self::new(start, clipped));
            if clipped >= self.exclusive_end_block {
                break;
            }
            start = clipped;
            end = start.saturating_add(chunk_size);
        }

        out
    }
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let Some((start, end)) = input.split_once('-') else {
            return Err(RangeError::Malformed {
                input: input.to_string(),
            });
        };

        let parse = |part: &str| {
            part.trim()
                .parse::<u64>()
                .map_err(|source| RangeError::InvalidBlock {
                    input: input.to_string(),
                    source,
                })
        };

        Self::try_new(parse(start)?, parse(end)?)
    }
}

///
/// RawRange
///
/// Unvalidated serde shape; routed through `Range::try_new`.
///

#[derive(Deserialize)]
struct RawRange {
    start_block: u64,
    exclusive_end_block: u64,
}

impl TryFrom<RawRange> for Range {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::try_new(raw.start_block, raw.exclusive_end_block)
    }
}

///
/// TESTS
///
