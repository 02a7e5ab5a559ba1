//! Supported instrument set and symbol matching.

/// Instruments accepted for execution, in slash-free broker notation.
/// "GOLD" is a channel alias and normalizes to "XAUUSD".
pub const SYMBOLS: &[&str] = &[
    "AUDCAD", "AUDCHF", "AUDJPY", "AUDNZD", "AUDUSD", "CADCHF", "CADJPY",
    "CHFJPY", "EURAUD", "EURCAD", "EURCHF", "EURGBP", "EURJPY", "EURNZD",
    "EURUSD", "GBPAUD", "GBPCAD", "GBPCHF", "GBPJPY", "GBPNZD", "GBPUSD",
    "NZDCAD", "NZDCHF", "NZDJPY", "NZDUSD", "USDCAD", "USDCHF", "USDJPY",
    "XAGUSD", "XAUUSD", "GOLD",
];

/// The same instruments as signal authors often write them, with a slash
/// between base and quote currency.
pub const SLASH_SYMBOLS: &[&str] = &[
    "AUD/CAD", "AUD/CHF", "AUD/JPY", "AUD/NZD", "AUD/USD", "CAD/CHF",
    "CAD/JPY", "CHF/JPY", "EUR/AUD", "EUR/CAD", "EUR/CHF", "EUR/GBP",
    "EUR/JPY", "EUR/NZD", "EUR/USD", "GBP/AUD", "GBP/CAD", "GBP/CHF",
    "GBP/JPY", "GBP/NZD", "GBP/USD", "NZD/CAD", "NZD/CHF", "NZD/JPY",
    "NZD/USD", "USD/CAD", "USD/CHF", "USD/JPY", "XAG/USD", "XAU/USD", "GOLD",
];

/// Search a line for a known instrument token. The slash-delimited forms are
/// tried first and stripped to broker notation on a hit.
pub fn find_in_line(line: &str) -> Option<String> {
    let haystack = line.to_uppercase();

    if let Some(found) = SLASH_SYMBOLS.iter().find(|s| haystack.contains(*s)) {
        return Some(found.replace('/', ""));
    }

    SYMBOLS
        .iter()
        .find(|s| haystack.contains(*s))
        .map(|s| s.to_string())
}

/// Whether a slash-free symbol is in the supported set.
pub fn is_supported(symbol: &str) -> bool {
    SYMBOLS.contains(&symbol)
}

/// Map channel aliases to the broker's instrument name.
pub fn canonical(symbol: &str) -> String {
    if symbol == "GOLD" {
        "XAUUSD".to_string()
    } else {
        symbol.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_form_is_stripped() {
        assert_eq!(find_in_line("SELL EUR/USD @ 1.0850"), Some("EURUSD".into()));
    }

    #[test]
    fn test_plain_form_matches_case_insensitively() {
        assert_eq!(find_in_line("buy gbpusd now"), Some("GBPUSD".into()));
    }

    #[test]
    fn test_gold_alias() {
        assert_eq!(find_in_line("BUY GOLD"), Some("GOLD".into()));
        assert_eq!(canonical("GOLD"), "XAUUSD");
        assert_eq!(canonical("EURUSD"), "EURUSD");
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(find_in_line("BUY BTCUSD"), None);
    }
}
