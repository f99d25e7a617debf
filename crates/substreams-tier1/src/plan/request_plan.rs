use serde::Serialize;
use std::fmt;
use substreams_block::{Range, Segmenter};

///
/// RequestPlan
///
/// Split of one tier-1 request into the ranges handled by each subsystem.
///
/// Only the planner builds plans; every field is fixed once it returns.
/// `segment_interval` is guaranteed non-zero.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct RequestPlan {
    pub(super) segment_interval: u64,

    // Stores built by parallel back-processing, from the graph init block.
    pub(super) build_stores: Option<Range>,

    // Mapper output materialized as execution output files. Always starts on
    // a segment edge so the reader can skip into it from any block.
    pub(super) write_exec_out: Option<Range>,

    // Slice of the execution output streamed back to the client.
    pub(super) read_exec_out: Option<Range>,

    // Blocks processed by the linear pipeline. May have no end.
    pub(super) linear_pipeline: Option<Range>,
}

impl RequestPlan {
    pub(super) const fn empty(segment_interval: u64) -> Self {
        Self {
            segment_interval,
            build_stores: None,
            write_exec_out: None,
            read_exec_out: None,
            linear_pipeline: None,
        }
    }

    #[must_use]
    pub const fn segment_interval(&self) -> u64 {
        self.segment_interval
    }

    #[must_use]
    pub const fn build_stores(&self) -> Option<Range> {
        self.build_stores
    }

    #[must_use]
    pub const fn write_exec_out(&self) -> Option<Range> {
        self.write_exec_out
    }

    #[must_use]
    pub const fn read_exec_out(&self) -> Option<Range> {
        self.read_exec_out
    }

    #[must_use]
    pub const fn linear_pipeline(&self) -> Option<Range> {
        self.linear_pipeline
    }

    #[must_use]
    pub const fn requires_parallel_processing(&self) -> bool {
        self.write_exec_out.is_some() || self.build_stores.is_some()
    }

    const fn segmenter_for(&self, range: Range) -> Segmenter {
        Segmenter::new(
            self.segment_interval,
            range.start_block(),
            range.exclusive_end_block(),
        )
    }

    /// Segmenter spanning exactly the store build range.
    #[must_use]
    pub fn stores_segmenter(&self) -> Option<Segmenter> {
        self.build_stores.map(|range| self.segmenter_for(range))
    }

    /// Segmenter spanning exactly the execution output write range.
    #[must_use]
    pub fn write_out_segmenter(&self) -> Option<Segmenter> {
        self.write_exec_out.map(|range| self.segmenter_for(range))
    }

    /// Segmenter for one store module, starting at its own init block and
    /// ending with the global store build range so snapshots line up.
    #[must_use]
    pub fn module_segmenter(&self, module_init_block: u64) -> Option<Segmenter> {
        self.build_stores.map(|range| {
            Segmenter::new(
                self.segment_interval,
                module_init_block,
                range.exclusive_end_block(),
            )
        })
    }

    /// Segmenter covering every back-processed block, stores and execution
    /// output alike.
    #[must_use]
    pub fn backprocess_segmenter(&self) -> Option<Segmenter> {
        match (self.build_stores, self.write_exec_out) {
            (Some(stores), Some(exec_out)) => {
                let start = stores.start_block().min(exec_out.start_block());
                let end = if stores.is_open_ended() || exec_out.is_open_ended() {
                    0
                } else {
                    stores
                        .exclusive_end_block()
                        .max(exec_out.exclusive_end_block())
                };

                Some(Segmenter::new(self.segment_interval, start, end))
            }
            (Some(range), None) | (None, Some(range)) => Some(self.segmenter_for(range)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for RequestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interval={}, stores={}, map_write={}, map_read={}, linear={}",
            self.segment_interval,
            RangeOrNil(self.build_stores),
            RangeOrNil(self.write_exec_out),
            RangeOrNil(self.read_exec_out),
            RangeOrNil(self.linear_pipeline),
        )
    }
}

// Renders an absent range as "nil".
struct RangeOrNil(Option<Range>);

impl fmt::Display for RangeOrNil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(range) => write!(f, "{range}"),
            None => f.write_str("nil"),
        }
    }
}

///
/// TESTS
///
