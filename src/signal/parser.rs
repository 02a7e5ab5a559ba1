//! Signal parser: order type, symbol, entry, stop-loss, and take-profits
//! from normalized message lines.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{symbol, Entry, OrderType, TradeSignal};
use crate::trading::RiskConfig;

use super::SignalError;

/// Raw order phrase found in the message, before entry resolution. Bare
/// `Buy`/`Sell` upgrade to limit or market once the entry is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OrderPhrase {
    BuyLimit,
    SellLimit,
    BuyStop,
    SellStop,
    BuyNow,
    SellNow,
    Buy,
    Sell,
}

impl OrderPhrase {
    fn is_buy(self) -> bool {
        matches!(
            self,
            OrderPhrase::BuyLimit | OrderPhrase::BuyStop | OrderPhrase::BuyNow | OrderPhrase::Buy
        )
    }

    fn is_bare(self) -> bool {
        matches!(self, OrderPhrase::Buy | OrderPhrase::Sell)
    }

    fn is_now(self) -> bool {
        matches!(self, OrderPhrase::BuyNow | OrderPhrase::SellNow)
    }
}

/// Phrase table in strict priority order: the two-word phrases must win over
/// the bare directions they contain.
pub(crate) const PHRASE_TABLE: &[(&str, OrderPhrase)] = &[
    ("buy limit", OrderPhrase::BuyLimit),
    ("sell limit", OrderPhrase::SellLimit),
    ("buy stop", OrderPhrase::BuyStop),
    ("sell stop", OrderPhrase::SellStop),
    ("buy now", OrderPhrase::BuyNow),
    ("sell now", OrderPhrase::SellNow),
    ("buy", OrderPhrase::Buy),
    ("sell", OrderPhrase::Sell),
];

/// Alphabetic runs and the punctuation signal authors wedge against prices.
/// Splitting on these and keeping the tail isolates a trailing price from
/// lines like "BUY LIMIT GBPUSD @ 1.14480".
static PRICE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+|[-,/@]").expect("separator pattern is valid"));

/// Parse normalized lines into a trade signal.
pub fn parse(lines: &[String], config: &RiskConfig) -> Result<TradeSignal, SignalError> {
    // Normalization already guarantees this; parsing stays total on its
    // own input since lines 0-2 are probed unconditionally.
    if lines.len() < 3 {
        return Err(SignalError::EmptyInput);
    }

    let phrase = detect_order_phrase(lines)?;
    let symbol = extract_symbol(lines)?;
    let entry = extract_entry(lines, phrase)?;
    let (order_type, entry) = resolve_order_type(phrase, entry);
    let take_profits = extract_take_profits(lines)?;
    let stop_loss = extract_stop_loss(lines)?;

    debug!(
        order_type = %order_type,
        symbol = %symbol,
        %entry,
        %stop_loss,
        take_profits = take_profits.len(),
        "parsed signal"
    );

    Ok(TradeSignal {
        order_type,
        symbol,
        entry,
        stop_loss,
        take_profits,
        risk_policy: config.policy,
        risk: None,
    })
}

/// First phrase (in table priority order) found in any of the first 3 lines.
fn detect_order_phrase(lines: &[String]) -> Result<OrderPhrase, SignalError> {
    for (phrase, parsed) in PHRASE_TABLE {
        for line in lines.iter().take(3) {
            if line.to_lowercase().contains(phrase) {
                return Ok(*parsed);
            }
        }
    }
    Err(SignalError::UnrecognizedOrderType)
}

/// Instrument from line 0, slash forms first, aliases applied after matching.
fn extract_symbol(lines: &[String]) -> Result<String, SignalError> {
    let found = symbol::find_in_line(&lines[0])
        .ok_or_else(|| SignalError::UnknownSymbol(lines[0].clone()))?;

    if !symbol::is_supported(&found) {
        return Err(SignalError::UnknownSymbol(lines[0].clone()));
    }

    Ok(symbol::canonical(&found))
}

/// Entry price, if the message carries one.
///
/// Precedence: an explicit "Entry <number>" line wins; otherwise bare
/// buy/sell signals are scanned keyword-line by keyword-line (last match
/// wins, since authors restate the instruction with refined values); limit
/// and stop orders fall back to the trailing price of lines 0, 1, then 2.
fn extract_entry(lines: &[String], phrase: OrderPhrase) -> Result<Option<Decimal>, SignalError> {
    if phrase.is_now() {
        return Ok(None);
    }

    if let Some(price) = find_trailing_numbers(lines, "entry").into_iter().next() {
        return Ok(Some(price));
    }

    if phrase.is_bare() {
        let keyword = if phrase.is_buy() { "BUY" } else { "SELL" };
        let mut entry = None;
        for line in lines.iter().filter(|l| !l.is_empty()) {
            if !line.to_uppercase().contains(keyword) {
                continue;
            }
            // Later lines overwrite earlier ones, a found price included.
            entry = match trailing_price_fragment(line) {
                Some(fragment) => Some(parse_price(fragment, "entry")?),
                None => None,
            };
        }
        return Ok(entry);
    }

    // Limit/stop order without an explicit "Entry" line.
    if let Some(fragment) = trailing_price_fragment(&lines[0]) {
        return parse_price(fragment, "entry").map(Some);
    }
    let fallback = if !lines[1].is_empty() { &lines[1] } else { &lines[2] };
    let token = fallback.split_whitespace().last().unwrap_or("");
    parse_price(token, "entry").map(Some)
}

/// Collapse the phrase and entry findings into the final order type.
fn resolve_order_type(phrase: OrderPhrase, entry: Option<Decimal>) -> (OrderType, Entry) {
    match (phrase, entry) {
        (OrderPhrase::BuyLimit, Some(p)) => (OrderType::BuyLimit, Entry::Fixed(p)),
        (OrderPhrase::SellLimit, Some(p)) => (OrderType::SellLimit, Entry::Fixed(p)),
        (OrderPhrase::BuyStop, Some(p)) => (OrderType::BuyStop, Entry::Fixed(p)),
        (OrderPhrase::SellStop, Some(p)) => (OrderType::SellStop, Entry::Fixed(p)),
        // A bare direction with a concrete price is a limit order.
        (OrderPhrase::Buy, Some(p)) => (OrderType::BuyLimit, Entry::Fixed(p)),
        (OrderPhrase::Sell, Some(p)) => (OrderType::SellLimit, Entry::Fixed(p)),
        // "NOW" and price-less bare directions execute at the market.
        (p, _) if p.is_buy() => (OrderType::BuyMarket, Entry::AtMarket),
        (_, _) => (OrderType::SellMarket, Entry::AtMarket),
    }
}

/// Take-profit levels: "TP" lines first, then "Target Profit" lines, then
/// the trailing token of line 3 as a single implicit target.
fn extract_take_profits(lines: &[String]) -> Result<Vec<Decimal>, SignalError> {
    let tps = find_trailing_numbers(lines, "tp");
    if !tps.is_empty() {
        return Ok(tps);
    }

    let targets = find_trailing_numbers(lines, "target profit");
    if !targets.is_empty() {
        return Ok(targets);
    }

    let line = lines.get(3).ok_or(SignalError::MissingTakeProfit)?;
    let token = line
        .split_whitespace()
        .last()
        .ok_or(SignalError::MissingTakeProfit)?;
    parse_price(token, "take profit").map(|price| vec![price])
}

/// Stop-loss level: "SL" lines first, then "Stop Loss" lines, then the
/// trailing token of line 2.
fn extract_stop_loss(lines: &[String]) -> Result<Decimal, SignalError> {
    if let Some(price) = find_trailing_numbers(lines, "sl").into_iter().next() {
        return Ok(price);
    }
    if let Some(price) = find_trailing_numbers(lines, "stop loss").into_iter().next() {
        return Ok(price);
    }

    let token = lines[2]
        .split_whitespace()
        .last()
        .ok_or(SignalError::MissingStopLoss)?;
    parse_price(token, "stop loss")
}

/// Trailing whitespace-delimited numbers of every non-blank line containing
/// `keyword` (case-insensitive), in line order. Lines whose trailing token
/// is not numeric are skipped, not fatal.
fn find_trailing_numbers(lines: &[String], keyword: &str) -> Vec<Decimal> {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .filter(|line| line.to_lowercase().contains(keyword))
        .filter_map(|line| line.split_whitespace().last())
        .filter_map(|token| Decimal::from_str(token).ok())
        .collect()
}

/// Last fragment of a line after stripping alphabetic runs and price-adjacent
/// punctuation. `None` when nothing numeric-looking trails the line.
fn trailing_price_fragment(line: &str) -> Option<&str> {
    PRICE_SEPARATORS
        .split(line)
        .last()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
}

fn parse_price(token: &str, what: &'static str) -> Result<Decimal, SignalError> {
    Decimal::from_str(token).map_err(|_| SignalError::NumericParse {
        what,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::signal::normalize;

    fn parse_text(raw: &str) -> Result<TradeSignal, SignalError> {
        parse(&normalize(raw)?, &RiskConfig::default())
    }

    #[test]
    fn test_market_execution_signal() {
        let trade = parse_text("BUY GBPUSD\nEntry NOW\nSL 1.14336\nTP 1.28930\nTP 1.29845")
            .unwrap();
        assert_eq!(trade.order_type, OrderType::BuyMarket);
        assert_eq!(trade.symbol, "GBPUSD");
        assert_eq!(trade.entry, Entry::AtMarket);
        assert_eq!(trade.stop_loss, dec!(1.14336));
        assert_eq!(trade.take_profits, vec![dec!(1.28930), dec!(1.29845)]);
    }

    #[test]
    fn test_limit_execution_signal() {
        let trade =
            parse_text("BUY LIMIT GBPUSD\nEntry 1.14480\nSL 1.14336\nTP 1.28930").unwrap();
        assert_eq!(trade.order_type, OrderType::BuyLimit);
        assert_eq!(trade.entry, Entry::Fixed(dec!(1.14480)));
        assert_eq!(trade.stop_loss, dec!(1.14336));
        assert_eq!(trade.take_profits, vec![dec!(1.28930)]);
    }

    #[test]
    fn test_phrase_priority_limit_over_bare() {
        // "Buy Limit" contains "Buy"; the longer phrase must win.
        let trade =
            parse_text("GBPUSD\nBuy Limit\nEntry 1.14480\nSL 1.14336\nTP 1.28930").unwrap();
        assert_eq!(trade.order_type, OrderType::BuyLimit);
    }

    #[test]
    fn test_sell_stop() {
        let trade = parse_text("SELL STOP EURUSD 1.0820\nSL 1.0860\nTP 1.0750").unwrap();
        assert_eq!(trade.order_type, OrderType::SellStop);
        assert_eq!(trade.entry, Entry::Fixed(dec!(1.0820)));
    }

    #[test]
    fn test_buy_now_forces_market_entry() {
        let trade = parse_text("BUY NOW EURUSD 1.0850\nSL 1.0800\nTP 1.0900").unwrap();
        assert_eq!(trade.order_type, OrderType::BuyMarket);
        assert_eq!(trade.entry, Entry::AtMarket);
    }

    #[test]
    fn test_bare_buy_with_price_upgrades_to_limit() {
        let trade = parse_text("BUY EURUSD @ 1.0850\nSL 1.0800\nTP 1.0900").unwrap();
        assert_eq!(trade.order_type, OrderType::BuyLimit);
        assert_eq!(trade.entry, Entry::Fixed(dec!(1.0850)));
    }

    #[test]
    fn test_bare_buy_later_line_overwrites_entry() {
        let trade =
            parse_text("BUY EURUSD @ 1.0850\nBUY again @ 1.0845\nSL 1.0800\nTP 1.0900").unwrap();
        assert_eq!(trade.entry, Entry::Fixed(dec!(1.0845)));
    }

    #[test]
    fn test_gold_aliases_to_xauusd() {
        let gold = parse_text("BUY GOLD\nEntry 1900\nSL 1890\nTP 1920").unwrap();
        let xau = parse_text("BUY XAUUSD\nEntry 1900\nSL 1890\nTP 1920").unwrap();
        assert_eq!(gold.symbol, "XAUUSD");
        assert_eq!(gold.symbol, xau.symbol);
    }

    #[test]
    fn test_slash_symbol() {
        let trade = parse_text("SELL GBP/JPY\nEntry 182.50\nSL 183.10\nTP 181.20").unwrap();
        assert_eq!(trade.symbol, "GBPJPY");
    }

    #[test]
    fn test_target_profit_tier() {
        let trade =
            parse_text("BUY LIMIT EURUSD\nEntry 1.0850\nSL 1.0800\nTarget Profit 1.0900")
                .unwrap();
        assert_eq!(trade.take_profits, vec![dec!(1.0900)]);
    }

    #[test]
    fn test_stop_loss_long_form() {
        let trade =
            parse_text("BUY LIMIT EURUSD\nEntry 1.0850\nStop Loss 1.0800\nTP 1.0900").unwrap();
        assert_eq!(trade.stop_loss, dec!(1.0800));
    }

    #[test]
    fn test_non_numeric_tp_lines_are_skipped() {
        let trade = parse_text("BUY LIMIT EURUSD\nEntry 1.0850\nSL 1.0800\nTP soon\nTP 1.0900")
            .unwrap();
        assert_eq!(trade.take_profits, vec![dec!(1.0900)]);
    }

    #[test]
    fn test_missing_take_profit() {
        let err = parse_text("BUY LIMIT EURUSD\nEntry 1.0850\nSL 1.0800").unwrap_err();
        assert_eq!(err, SignalError::MissingTakeProfit);
    }

    #[test]
    fn test_missing_stop_loss_on_blank_fallback_line() {
        let err = parse_text("BUY LIMIT EURUSD 1.0850\n\n\nTP 1.0900").unwrap_err();
        assert_eq!(err, SignalError::MissingStopLoss);
    }

    #[test]
    fn test_non_numeric_stop_loss_fallback_propagates() {
        let err =
            parse_text("SELL LIMIT EURUSD 1.0850\nsome note\njust wait\nTP 1.0700").unwrap_err();
        assert_eq!(
            err,
            SignalError::NumericParse {
                what: "stop loss",
                token: "wait".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let err = parse_text("BUY BTCUSD\nEntry 42000\nSL 41000\nTP 44000").unwrap_err();
        assert!(matches!(err, SignalError::UnknownSymbol(_)));
    }

    #[test]
    fn test_no_order_type() {
        let err = parse_text("EURUSD looking bullish\ninteresting level\nwatch 1.0850").unwrap_err();
        assert_eq!(err, SignalError::UnrecognizedOrderType);
    }

    #[test]
    fn test_order_phrase_only_searched_in_first_three_lines() {
        let err =
            parse_text("EURUSD\nsome chatter\nmore chatter\nBUY 1.0850\nSL 1.0800").unwrap_err();
        assert_eq!(err, SignalError::UnrecognizedOrderType);
    }

    #[test]
    fn test_split_decimal_entry_repaired_end_to_end() {
        let trade = parse_text("BUY LIMIT GBPUSD\nEntry 1 14480\nSL 1.14336\nTP 1.28930").unwrap();
        assert_eq!(trade.entry, Entry::Fixed(dec!(1.14480)));
    }

    #[test]
    fn test_risk_policy_copied_from_config() {
        let config = RiskConfig {
            policy: crate::models::RiskPolicy::RewardWeighted,
            ..RiskConfig::default()
        };
        let lines = normalize("BUY LIMIT EURUSD\nEntry 1.0850\nSL 1.0800\nTP 1.0900").unwrap();
        let trade = parse(&lines, &config).unwrap();
        assert_eq!(trade.risk_policy, crate::models::RiskPolicy::RewardWeighted);
    }
}
