//! Release promotion between environments.
//!
//! - [`locator`]: which release an environment currently runs
//! - [`decision`]: pure per-project classification
//! - [`executor`]: the only mutating call, deployment creation
//! - [`report`]: ordered outcomes, summary and progress events
//! - [`orchestrator`]: ties the above together for a whole space

pub mod decision;
pub mod executor;
pub mod locator;
pub mod orchestrator;
pub mod report;

pub use decision::{Decision, decide};
pub use executor::DeploymentExecutor;
pub use locator::{ReleaseLocator, latest_deployment};
pub use orchestrator::{PromotionOrchestrator, PromotionRequest};
pub use report::{
    NoopObserver, PromotionAction, PromotionObserver, PromotionOutcome, PromotionReport,
    PromotionReporter, PromotionSummary,
};
