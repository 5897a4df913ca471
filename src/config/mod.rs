//! Setup-time configuration lookup
//!
//! Resolves a (file, section, key) triple to a positive integer, used to pick
//! an instance's logical ceiling before creating it. The format is
//! deliberately minimal: `key;value` lines grouped under `[section]` headers,
//! with blank lines and `#` comments ignored. Section and key matching is
//! ASCII case-insensitive. The queue core never sees the file itself, only
//! the resolved integer.
//!
//! ```text
//! # dispatch ceilings per event stream
//! [notify]
//! audit;4096
//! access;0x2000
//! ```

mod error;

pub use error::{ConfigError, ConfigResult};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Look up `key` under `[section]` in the file at `path` and parse its value
/// as a positive integer.
///
/// The first matching key wins. A match with a non-positive or unparseable
/// value fails `InvalidValue`; an absent section or key fails `NotFound`.
/// Lines that do not split into exactly two `;`-separated fields are skipped
/// with a warning.
pub fn lookup_ceiling(path: &Path, section: &str, key: &str) -> ConfigResult<usize> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut in_section = false;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = section_header(line) {
            if in_section {
                // Ran past the end of the target section.
                break;
            }
            in_section = name.trim().eq_ignore_ascii_case(section);
            continue;
        }
        if !in_section {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != 2 {
            log::warn!("skipping malformed config line: {line}");
            continue;
        }
        if !fields[0].trim().eq_ignore_ascii_case(key) {
            continue;
        }

        let value = fields[1].trim();
        return parse_positive(value).ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Err(ConfigError::NotFound {
        section: section.to_string(),
        key: key.to_string(),
    })
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Decimal or `0x`-prefixed hexadecimal, strictly positive.
fn parse_positive(value: &str) -> Option<usize> {
    let parsed = if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        value.parse::<i64>()
    };
    match parsed {
        Ok(n) if n > 0 => Some(n as usize),
        _ => None,
    }
}
