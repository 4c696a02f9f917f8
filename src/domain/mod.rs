//! Domain layer - pure business logic
//!
//! Environment resolution, commit validation and command planning.
//! Nothing here performs I/O; types and functions can be unit tested
//! without a live host.

pub mod commit;
pub mod environment;
pub mod plan;

// Re-export commonly used types
pub use commit::Commit;
pub use environment::{EnvironmentContext, HostTarget};
pub use plan::{DeployStep, PlannedStep, RemoteCommand, StepResult};
