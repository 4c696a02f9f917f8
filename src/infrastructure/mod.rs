//! Infrastructure layer - external I/O adapters
//!
//! Everything that leaves the process lives here. Currently that is a
//! single adapter: remote command execution through the system ssh binary.

pub mod remote;

// Re-export commonly used types
pub use remote::SshClient;
