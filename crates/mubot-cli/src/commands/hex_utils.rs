//! Hex address parsing.

use anyhow::{Result, bail};

/// Parse a hex address with or without a `0x` prefix.
///
/// Underscores are accepted as digit separators, so addresses copied from
/// offset tables (`0x0040_0000`) parse as written.
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let digits: String = s
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if digits.is_empty() {
        bail!("Invalid hex address: {s:?} is empty");
    }
    u64::from_str_radix(&digits, 16).map_err(|e| anyhow::anyhow!("Invalid hex address {s:?}: {e}"))
}
