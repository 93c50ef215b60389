//! Ground-truth tags extracted from trace paths with a regex.

use regex::Regex;
use tracecluster_core::errors::MetricsError;
use tracing::warn;

/// Compile a ground-truth pattern.
pub fn compile(pattern: &str) -> Result<Regex, MetricsError> {
    Regex::new(pattern).map_err(|e| MetricsError::InvalidPattern(e.to_string()))
}

/// Tag of one path: the first match, or its first capture group when the
/// pattern has one.
fn tag_of(regex: &Regex, path: &str) -> Option<String> {
    let caps = regex.captures(path)?;
    let m = if regex.captures_len() > 1 {
        caps.get(1).or_else(|| caps.get(0))?
    } else {
        caps.get(0)?
    };
    Some(m.as_str().to_string())
}

/// One tag per path, in input order.
///
/// A path with no match is an error. A path with several matches uses the
/// first and logs a warning.
pub fn extract_truth<P: AsRef<str>>(
    paths: &[P],
    pattern: &str,
) -> Result<Vec<String>, MetricsError> {
    let regex = compile(pattern)?;
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            let tag = tag_of(&regex, path).ok_or_else(|| MetricsError::MissingTag {
                path: path.to_string(),
            })?;
            if regex.find_iter(path).nth(1).is_some() {
                warn!(path, tag = %tag, "several ground-truth tags found, using the first");
            }
            Ok(tag)
        })
        .collect()
}
