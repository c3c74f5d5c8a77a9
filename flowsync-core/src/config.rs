//! Input validation helpers.
//!
//! CI runners hand every input over as a string and pass unset inputs as
//! `""`, so "present" always means "present and non-blank".

use crate::error::ConfigError;

/// Trimmed value, or `None` when absent or blank.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `host` or `host:port`. Rejects anything that would change the
/// meaning of the URL once joined with a scheme and path.
pub fn validate_host(host: &str) -> Result<&str, ConfigError> {
    let invalid = host.contains("://")
        || host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@'));
    if invalid || host.starts_with(':') {
        return Err(ConfigError::InvalidHost(host.to_string()));
    }
    Ok(host)
}

/// `true` when `segment` addresses exactly one resource below its parent in
/// a URL path: no `/`, and not `.` or `..`.
pub fn is_single_segment(segment: &str) -> bool {
    !segment.contains('/') && !matches!(segment, "." | "..")
}

/// Lenient boolean input. Blank or absent is `false`.
pub fn parse_bool(name: &'static str, value: Option<&str>) -> Result<bool, ConfigError> {
    let Some(value) = non_empty(value) else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}
