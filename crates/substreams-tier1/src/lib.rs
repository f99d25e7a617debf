//! Tier-1 request planning.
//!
//! A tier-1 request is resolved against the chain ([`resolve`]) and then
//! split ([`plan`]) into four ranges: stores built in parallel, execution
//! output written and read back, and the blocks left to the linear pipeline.

pub mod plan;
pub mod resolve;

mod request;

///
/// Re-Exports
///
pub use plan::{PlanError, PlanInputs, RequestPlan, build_tier1_request_plan};
pub use request::{ModuleGraphSummary, Request, Tier1Error, Tier1Plan, plan_request};
pub use resolve::{BlockSource, BlockSourceError, RequestDetails, ResolveError};
