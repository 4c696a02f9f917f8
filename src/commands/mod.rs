//! Command implementations, one module per subcommand.

pub mod deploy;
pub mod reload_apache;
pub mod sync_from_prod;
pub mod version;
