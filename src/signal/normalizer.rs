//! Inbound text normalization.
//!
//! Signal authors decorate messages with pip counts and timeframe tags, and
//! occasionally type a space where a decimal point belongs ("1 14480" for
//! "1.14480"). Both habits produce stray numeric-looking tokens that the
//! parser would otherwise mistake for prices, so they are scrubbed here
//! before any line is inspected.

use std::sync::LazyLock;

use regex::Regex;

use super::SignalError;

/// Annotation tokens (`pip`, `pips`, `scalper`, `intraday`, `swing`), each
/// optionally followed by a parenthesized remark, e.g. "pips (tight)".
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:pips?|scalper|intraday|swing)(?:\s*\([^)]*\))?")
        .expect("noise pattern is valid")
});

/// Two space-separated integer runs collapse into one decimal number. Spaces
/// only: the repair must never join numbers across lines.
static SPLIT_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) +(\d+)").expect("decimal pattern is valid"));

/// Normalize a raw message into right-trimmed lines, preserving line order
/// and blank lines (later stages key off line indices).
pub fn normalize(raw: &str) -> Result<Vec<String>, SignalError> {
    let cleaned = NOISE.replace_all(raw, "");
    let repaired = SPLIT_DECIMAL.replace_all(&cleaned, "$1.$2");

    let lines: Vec<String> = repaired
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();

    // The parser unconditionally probes indices 0-2.
    if lines.len() < 3 {
        return Err(SignalError::EmptyInput);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_pip_annotations() {
        let lines = normalize("SL 1.1433 pips (tight)\nTP 1.2893\nBUY EURUSD").unwrap();
        assert_eq!(lines[0], "SL 1.1433");
    }

    #[test]
    fn test_strips_timeframe_tags() {
        let lines = normalize("BUY EURUSD scalper\nEntry 1.0850\nSL 1.0800").unwrap();
        assert_eq!(lines[0], "BUY EURUSD");
    }

    #[test]
    fn test_repairs_split_decimal() {
        let lines = normalize("BUY LIMIT GBPUSD\nEntry 1 14480\nSL 1 14336").unwrap();
        assert_eq!(lines[1], "Entry 1.14480");
        assert_eq!(lines[2], "SL 1.14336");
    }

    #[test]
    fn test_repair_does_not_cross_lines() {
        let lines = normalize("SL 1\n2 TP\nBUY EURUSD").unwrap();
        assert_eq!(lines[0], "SL 1");
        assert_eq!(lines[1], "2 TP");
    }

    #[test]
    fn test_preserves_blank_lines_and_order() {
        let lines = normalize("BUY EURUSD\n\nSL 1.0800\nTP 1.0900").unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "");
    }

    #[test]
    fn test_idempotent_on_clean_input() {
        let raw = "BUY LIMIT GBPUSD\nEntry 1.14480\nSL 1.14336\nTP 1.28930";
        let once = normalize(raw).unwrap();
        let twice = normalize(&once.join("\n")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_too_short_is_rejected() {
        assert_eq!(normalize("BUY EURUSD\nSL 1.08"), Err(SignalError::EmptyInput));
        assert_eq!(normalize(""), Err(SignalError::EmptyInput));
    }
}
