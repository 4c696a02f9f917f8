//! Runtime tool path resolution
//!
//! External binaries are resolved through a `{TOOL}_BIN` environment
//! variable (e.g. `SSH_BIN`), falling back to PATH-based invocation when
//! the variable is not set. Packaged environments can pin an exact binary
//! this way without patching the code.

use std::env;

/// Binary used for all remote command execution.
pub const SSH: &str = "ssh";

/// Get the path to an external tool.
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name +
/// "_BIN"). Falls back to the tool name itself if the variable is not set,
/// which relies on PATH.
pub fn get_tool_path(tool: &str) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase());
    env::var(&env_var).unwrap_or_else(|_| tool.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_get_tool_path_from_env() {
        env::set_var("FAKESSH_BIN", "/custom/path/to/fakessh");
        assert_eq!(get_tool_path("fakessh"), "/custom/path/to/fakessh");
        env::remove_var("FAKESSH_BIN");
    }

    #[test]
    fn test_get_tool_path_fallback() {
        env::remove_var("MISSINGTOOL_BIN");
        assert_eq!(get_tool_path("missingtool"), "missingtool");
    }
}
