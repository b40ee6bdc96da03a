//! Memory sizes - Parsing human-readable size strings and formatting bytes

use thiserror::Error;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;

/// Failure to parse a human-readable memory size
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("empty size string")]
    Empty,
    #[error("expected digits with an optional K/M/G suffix")]
    Unrecognized,
    #[error("size must be strictly positive")]
    NotPositive,
    #[error("size overflows a 64-bit byte count")]
    Overflow,
}

/// Parse a human-readable memory size into bytes.
///
/// Recognized suffixes: none (bytes), `K`, `M`, `G` (binary multiples,
/// case-insensitive). The value must be a strictly positive integer:
/// `"1024M"` is 1 GiB, `"10"` is 10 bytes, `"10X"` and `"0"` are errors.
pub fn parse_size(input: &str) -> Result<u64, SizeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SizeParseError::Empty);
    }

    let (digits, multiplier) = match trimmed.chars().next_back() {
        Some(suffix) if suffix.is_ascii_alphabetic() => {
            let multiplier = match suffix.to_ascii_uppercase() {
                'K' => KB,
                'M' => MB,
                'G' => GB,
                _ => return Err(SizeParseError::Unrecognized),
            };
            (&trimmed[..trimmed.len() - 1], multiplier)
        }
        _ => (trimmed, 1),
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| SizeParseError::Unrecognized)?;
    if value == 0 {
        return Err(SizeParseError::NotPositive);
    }
    value
        .checked_mul(multiplier)
        .ok_or(SizeParseError::Overflow)
}

/// Format bytes as a human-readable string
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_byte_counts() {
        assert_eq!(parse_size("10"), Ok(10));
        assert_eq!(parse_size(" 42 "), Ok(42));
    }

    #[test]
    fn parses_binary_suffixes() {
        assert_eq!(parse_size("512K"), Ok(512 * 1024));
        assert_eq!(parse_size("1024M"), Ok(1024 * 1024 * 1024));
        assert_eq!(parse_size("2G"), Ok(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_size("512k"), Ok(512 * 1024));
    }

    #[test]
    fn rejects_unknown_suffixes() {
        assert_eq!(parse_size("10X"), Err(SizeParseError::Unrecognized));
        assert_eq!(parse_size("10MB"), Err(SizeParseError::Unrecognized));
    }

    #[test]
    fn rejects_non_integer_values() {
        assert_eq!(parse_size("1.5G"), Err(SizeParseError::Unrecognized));
        assert_eq!(parse_size("-5M"), Err(SizeParseError::Unrecognized));
        assert_eq!(parse_size("M"), Err(SizeParseError::Unrecognized));
    }

    #[test]
    fn rejects_empty_and_zero() {
        assert_eq!(parse_size(""), Err(SizeParseError::Empty));
        assert_eq!(parse_size("   "), Err(SizeParseError::Empty));
        assert_eq!(parse_size("0"), Err(SizeParseError::NotPositive));
        assert_eq!(parse_size("0G"), Err(SizeParseError::NotPositive));
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(parse_size("18446744073709551615G"), Err(SizeParseError::Overflow));
        assert_eq!(parse_size("99999999999999999999"), Err(SizeParseError::Unrecognized));
    }

    #[test]
    fn formats_bytes_across_magnitudes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }
}
