//! Environment variable lookup helpers.
//!
//! The fallback chain (primary key, then aliases in order) lives here so that
//! callers never touch `std::env::var` directly.

use std::env;

/// Read the primary key or an alias; blank values yield `None`.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Parse a boolean variable. Anything except 0/false/no/off is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => parse_bool(s),
        None => default,
    }
}

fn parse_bool(s: &str) -> bool {
    !matches!(
        s.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
