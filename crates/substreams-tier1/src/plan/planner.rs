//! Tier-1 request planning; pure function of the request inputs.
//!
//! The planner performs no I/O and never logs. Any error rejects the whole
//! request: no partial plan is returned.

use super::RequestPlan;
use substreams_block::{Range, Segmenter};
use thiserror::Error as ThisError;

///
/// PlanError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error("segment interval must be greater than zero")]
    ZeroSegmentInterval,

    #[error(
        "stop block {exclusive_end_block} is before the linear handoff block {linear_handoff_block}"
    )]
    InvalidRange {
        linear_handoff_block: u64,
        exclusive_end_block: u64,
    },

    #[error(
        "start block {resolved_start_block} cannot be prior to the lowest init block in the requested module graph ({graph_init_block})"
    )]
    StartBeforeGraphInit {
        resolved_start_block: u64,
        graph_init_block: u64,
    },

    #[error("segmenter returned no range for segment {segment} (block {block})")]
    SegmentationFailure { segment: u64, block: u64 },
}

///
/// PlanInputs
///
/// Resolved request parameters. `exclusive_end_block == 0` requests an
/// unbounded (live) stream.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlanInputs {
    /// Production requests materialize execution output files.
    pub production_mode: bool,
    pub segment_interval: u64,
    /// Smallest block any module of the graph accepts.
    pub graph_init_block: u64,
    pub resolved_start_block: u64,
    /// Block where parallel back-processing hands over to the linear
    /// pipeline; on a segment boundary or equal to the start block.
    pub linear_handoff_block: u64,
    pub exclusive_end_block: u64,
    /// The module graph has stateful stores to back-process.
    pub schedule_stores: bool,
}

impl PlanInputs {
    fn validate(&self) -> Result<(), PlanError> {
        if self.segment_interval == 0 {
            return Err(PlanError::ZeroSegmentInterval);
        }
        if self.exclusive_end_block != 0 && self.linear_handoff_block > self.exclusive_end_block {
            return Err(PlanError::InvalidRange {
                linear_handoff_block: self.linear_handoff_block,
                exclusive_end_block: self.exclusive_end_block,
            });
        }
        if self.resolved_start_block < self.graph_init_block {
            return Err(PlanError::StartBeforeGraphInit {
                resolved_start_block: self.resolved_start_block,
                graph_init_block: self.graph_init_block,
            });
        }

        Ok(())
    }

    // Stores are only built when something lies between the graph init block
    // and the bound; a bound at or below the init block leaves it to the
    // linear pipeline.
    fn stores_range(&self, end_store_bound: u64) -> Option<Range> {
        (self.schedule_stores && end_store_bound != 0 && end_store_bound >= self.graph_init_block)
            .then(|| Range::new(self.graph_init_block, end_store_bound))
    }
}

/// Split a tier-1 request into store building, execution output and linear
/// ranges.
pub fn build_tier1_request_plan(inputs: &PlanInputs) -> Result<RequestPlan, PlanError> {
    inputs.validate()?;

    let segmenter = Segmenter::new(
        inputs.segment_interval,
        inputs.graph_init_block,
        inputs.exclusive_end_block,
    );
    let mut plan = RequestPlan::empty(inputs.segment_interval);

    let handoff = inputs.linear_handoff_block;
    let ends_at_handoff = handoff == inputs.exclusive_end_block && handoff != 0;
    if !ends_at_handoff {
        plan.linear_pipeline = Some(Range::new(handoff, inputs.exclusive_end_block));
    }

    // nothing before the handoff
    if inputs.resolved_start_block == handoff
        && inputs.graph_init_block == inputs.resolved_start_block
    {
        return Ok(plan);
    }

    if inputs.production_mode {
        plan_production(&mut plan, &segmenter, inputs)?;
    } else {
        // Development mode writes no execution output, so stores may stop
        // mid-segment right at the handoff.
        plan.build_stores = inputs.stores_range(handoff);
    }

    Ok(plan)
}

fn plan_production(
    plan: &mut RequestPlan,
    segmenter: &Segmenter,
    inputs: &PlanInputs,
) -> Result<(), PlanError> {
    let handoff = inputs.linear_handoff_block;

    // Without a linear pipeline the request ends at the handoff; stores then
    // run to the end of the enclosing segment so the snapshot is complete.
    let end_store_bound = if plan.linear_pipeline.is_none() {
        let segment = segmenter.index_for_end_block(handoff);
        segment_range(segmenter, segment, handoff)?.exclusive_end_block()
    } else {
        handoff
    };
    plan.build_stores = inputs.stores_range(end_store_bound);

    if inputs.resolved_start_block <= handoff {
        let exec_out_start = inputs.resolved_start_block.max(inputs.graph_init_block);
        let segment = segmenter.index_for_start_block(exec_out_start);
        let write_start = segment_range(segmenter, segment, exec_out_start)?.start_block();

        plan.write_exec_out = Some(Range::new(write_start, handoff));
        plan.read_exec_out = Some(Range::new(inputs.resolved_start_block, handoff));
    }

    Ok(())
}

fn segment_range(segmenter: &Segmenter, segment: u64, block: u64) -> Result<Range, PlanError> {
    segmenter
        .range(segment)
        .ok_or(PlanError::SegmentationFailure { segment, block })
}
