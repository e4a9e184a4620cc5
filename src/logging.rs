//! Log filter selection for the stderr and file layers.

use tracing_subscriber::EnvFilter;

/// Reads directives from the environment variable `var`, falling back to
/// `default` when it is unset or unparseable.
pub fn env_filter(var: &str, default: &str) -> EnvFilter {
    directives_or(std::env::var(var).ok().as_deref(), default)
}

/// Parses `directives` when present, otherwise (or if they are invalid)
/// uses `default`. A set value replaces the default rather than adding to it.
pub fn directives_or(directives: Option<&str>, default: &str) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}
