//! Diagnostics: tracing to stderr, CI annotations to stdout.

/// Install the global subscriber. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `true` when running as a GitHub Actions step.
pub fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Workflow command that makes the runner annotate the job with an error.
///
/// `%`, CR and LF are escaped as the runner expects.
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

/// Print `message` as an error annotation when running under GitHub Actions.
pub fn annotate_error(message: &str) {
    if in_github_actions() {
        println!("{}", error_annotation(message));
    }
}
