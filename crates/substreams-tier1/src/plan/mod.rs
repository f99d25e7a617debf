//! Plan module wiring; planning logic lives in `planner`.

mod planner;
mod request_plan;

///
/// Re-Exports
///
pub use planner::{PlanError, PlanInputs, build_tier1_request_plan};
pub use request_plan::RequestPlan;
