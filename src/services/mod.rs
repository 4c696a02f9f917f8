//! Services layer - orchestration logic
//!
//! Coordinates domain planning with the ssh executor and reports
//! per-step results.

pub mod deployer;

// Re-export commonly used types
pub use deployer::Deployer;
