//! Tier-1 request entrypoint: resolves a client request against the chain
//! and splits it into a [`RequestPlan`].

use crate::{
    plan::{PlanError, PlanInputs, RequestPlan, build_tier1_request_plan},
    resolve::{BlockSource, RequestDetails, ResolveError, build_request_details},
};
use substreams_config::Tier1Config;
use thiserror::Error as ThisError;

///
/// Request
///
/// Block bounds of a client request. A negative start is relative to the
/// chain head; a stop of 0 streams forever.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Request {
    pub start_block_num: i64,
    pub stop_block_num: u64,
    pub production_mode: bool,
}

///
/// ModuleGraphSummary
///
/// What the planner needs to know about the requested module graph.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModuleGraphSummary {
    /// Smallest init block across every module of the graph.
    pub lowest_init_block: u64,

    /// Init blocks of the stores the output module depends on.
    pub store_init_blocks: Vec<u64>,

    /// Stores have to be back-processed for this request.
    pub schedule_stores: bool,
}

///
/// Tier1Error
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Tier1Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(
        "linear handoff at block 0 with stop block {stop_block} leaves no room for back-processing"
    )]
    HandoffAtGenesis { stop_block: u64 },
}

///
/// Tier1Plan
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tier1Plan {
    pub details: RequestDetails,
    pub plan: RequestPlan,
}

impl Tier1Plan {
    /// The request is fully served once back-processing completes.
    #[must_use]
    pub const fn terminates_after_backprocess(&self) -> bool {
        self.plan.linear_pipeline().is_none()
    }
}

/// Resolve `request` and build its plan.
pub fn plan_request(
    config: &Tier1Config,
    request: &Request,
    graph: &ModuleGraphSummary,
    source: &impl BlockSource,
) -> Result<Tier1Plan, Tier1Error> {
    let details = build_request_details(config, request, &graph.store_init_blocks, source)?;

    let needs_backprocess = details.resolved_start_block != 0 || graph.lowest_init_block != 0;
    if details.linear_handoff_block == 0 && details.stop_block != 0 && needs_backprocess {
        return Err(Tier1Error::HandoffAtGenesis {
            stop_block: details.stop_block,
        });
    }

    let plan = build_tier1_request_plan(&PlanInputs {
        production_mode: details.production_mode,
        segment_interval: config.state_bundle_size,
        graph_init_block: graph.lowest_init_block,
        resolved_start_block: details.resolved_start_block,
        linear_handoff_block: details.linear_handoff_block,
        exclusive_end_block: details.stop_block,
        schedule_stores: graph.schedule_stores,
    })?;

    log::debug!(
        "tier1 request start={} handoff={} gate={} stop={} production={}: {plan}",
        details.resolved_start_block,
        details.linear_handoff_block,
        details.linear_gate_block,
        details.stop_block,
        details.production_mode,
    );

    Ok(Tier1Plan { details, plan })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::BlockSourceError;
    use substreams_block::Range;

    struct Chain {
        final_block: u64,
        head: u64,
    }

    impl BlockSource for Chain {
        fn recent_final_block(&self) -> Result<u64, BlockSourceError> {
            Ok(self.final_block)
        }

        fn head_block(&self) -> Result<u64, BlockSourceError> {
            Ok(self.head)
        }
    }

    const CHAIN: Chain = Chain {
        final_block: 10_050,
        head: 10_080,
    };

    fn config() -> Tier1Config {
        Tier1Config {
            state_bundle_size: 100,
            first_streamable_block: 0,
        }
    }

    fn graph(lowest_init_block: u64, stores: &[u64]) -> ModuleGraphSummary {
        ModuleGraphSummary {
            lowest_init_block,
            store_init_blocks: stores.to_vec(),
            schedule_stores: !stores.is_empty(),
        }
    }

    #[test]
    fn production_live_request_backprocesses_up_to_final_boundary() {
        let request = Request {
            start_block_num: 738,
            stop_block_num: 0,
            production_mode: true,
        };

        let out = plan_request(&config(), &request, &graph(621, &[621]), &CHAIN)
            .expect("request should plan");

        assert_eq!(out.details.linear_handoff_block, 10_000);
        assert_eq!(out.details.linear_gate_block, 10_000);
        assert_eq!(out.plan.build_stores(), Some(Range::new(621, 10_000)));
        assert_eq!(out.plan.write_exec_out(), Some(Range::new(700, 10_000)));
        assert_eq!(out.plan.read_exec_out(), Some(Range::new(738, 10_000)));
        assert_eq!(out.plan.linear_pipeline(), Some(Range::open(10_000)));
        assert!(!out.terminates_after_backprocess());
    }

    #[test]
    fn production_final_request_ends_after_backprocess() {
        let request = Request {
            start_block_num: 738,
            stop_block_num: 742,
            production_mode: true,
        };

        let out = plan_request(&config(), &request, &graph(621, &[621]), &CHAIN)
            .expect("request should plan");

        assert_eq!(out.details.linear_handoff_block, 742);
        assert_eq!(out.plan.build_stores(), Some(Range::new(621, 800)));
        assert_eq!(out.plan.write_exec_out(), Some(Range::new(700, 742)));
        assert_eq!(out.plan.read_exec_out(), Some(Range::new(738, 742)));
        assert_eq!(out.plan.linear_pipeline(), None);
        assert!(out.terminates_after_backprocess());
    }

    #[test]
    fn development_request_streams_from_store_boundary() {
        let request = Request {
            start_block_num: 738,
            stop_block_num: 742,
            production_mode: false,
        };

        let out = plan_request(&config(), &request, &graph(621, &[621]), &CHAIN)
            .expect("request should plan");

        assert_eq!(out.details.linear_handoff_block, 700);
        assert_eq!(out.details.linear_gate_block, 738);
        assert_eq!(out.plan.build_stores(), Some(Range::new(621, 700)));
        assert_eq!(out.plan.write_exec_out(), None);
        assert_eq!(out.plan.linear_pipeline(), Some(Range::new(700, 742)));
    }

    #[test]
    fn stateless_development_request_is_linear_only() {
        let request = Request {
            start_block_num: -30,
            stop_block_num: 0,
            production_mode: false,
        };

        let out = plan_request(&config(), &request, &graph(0, &[]), &CHAIN)
            .expect("request should plan");

        assert_eq!(out.details.resolved_start_block, 10_050);
        assert!(!out.plan.requires_parallel_processing());
        assert_eq!(out.plan.linear_pipeline(), Some(Range::open(10_050)));
    }

    #[test]
    fn start_before_graph_init_is_a_plan_error() {
        let request = Request {
            start_block_num: 500,
            stop_block_num: 0,
            production_mode: false,
        };

        let err = plan_request(&config(), &request, &graph(621, &[621]), &CHAIN)
            .expect_err("start is before the graph");

        assert_eq!(
            err,
            Tier1Error::Plan(PlanError::StartBeforeGraphInit {
                resolved_start_block: 500,
                graph_init_block: 621,
            })
        );
    }

    #[test]
    fn handoff_at_genesis_with_bounded_stop_is_rejected() {
        let young_chain = Chain {
            final_block: 50,
            head: 80,
        };
        let request = Request {
            start_block_num: 30,
            stop_block_num: 60,
            production_mode: true,
        };

        let err = plan_request(&config(), &request, &graph(10, &[10]), &young_chain)
            .expect_err("handoff at 0 is rejected");

        assert_eq!(err, Tier1Error::HandoffAtGenesis { stop_block: 60 });
    }

    #[test]
    fn resolve_errors_pass_through() {
        let request = Request {
            start_block_num: 900,
            stop_block_num: 800,
            production_mode: true,
        };

        let err = plan_request(&config(), &request, &graph(0, &[]), &CHAIN)
            .expect_err("stop before start");

        assert!(matches!(
            err,
            Tier1Error::Resolve(ResolveError::StartNotBeforeStop { .. })
        ));
    }
}
