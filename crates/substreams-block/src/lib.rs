//! Block arithmetic shared by the tier-1 planner and its consumers: half-open
//! block ranges and the segmenter mapping block numbers onto fixed-width
//! segments.

mod range;
mod ranges;
mod segmenter;

///
/// Re-Exports
///
pub use range::{Range, RangeError};
pub use ranges::Ranges;
pub use segmenter::Segmenter;
