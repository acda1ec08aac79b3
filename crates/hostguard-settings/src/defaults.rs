//! Built-in defaults, used when neither an override nor the config file sets a key.

pub const SHELL: &str = "/bin/sh";

/// Prints `1` for root or members of the usual administrator groups, `0` otherwise.
pub const PRIVILEGE_PROBE: &str = "if [ \"$(id -u)\" -eq 0 ] || id -Gn | grep -qwE 'admin|sudo|wheel'; \
     then echo 1; else echo 0; fi";

pub const LOG_DIR: &str = ".";

pub const LOG_DEBUG_ALWAYS: bool = true;
