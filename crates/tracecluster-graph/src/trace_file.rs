//! Trace file reader: one hexadecimal address per line.

use std::path::Path;

use tracecluster_core::errors::TraceError;

/// Parse one trace line such as `0x00047c308` (prefix optional).
pub fn parse_address(line: &str) -> Option<u64> {
    let trimmed = line.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Parse trace content. Blank lines are skipped; bytes are decoded lossily.
///
/// `origin` only labels errors.
pub fn parse_trace(bytes: &[u8], origin: &str) -> Result<Vec<u64>, TraceError> {
    let mut addresses = Vec::new();
    for (line_no, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let line = String::from_utf8_lossy(raw);
        if line.trim().is_empty() {
            continue;
        }
        match parse_address(&line) {
            Some(addr) => addresses.push(addr),
            None => {
                return Err(TraceError::InvalidAddress {
                    path: origin.to_string(),
                    line: line_no + 1,
                    content: line.trim().to_string(),
                })
            }
        }
    }
    if addresses.is_empty() {
        return Err(TraceError::Empty {
            path: origin.to_string(),
        });
    }
    Ok(addresses)
}

/// Read and parse a trace file.
pub fn read_trace(path: &Path) -> Result<Vec<u64>, TraceError> {
    let origin = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| TraceError::Io {
        path: origin.clone(),
        message: e.to_string(),
    })?;
    parse_trace(&bytes, &origin)
}
