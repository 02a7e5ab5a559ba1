//! Pip conversion and risk computation for a parsed signal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::models::{Entry, RiskFigures, TradeSignal};

use super::RiskConfig;

/// Risk computation failures, fatal to the single trade attempt only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    #[error("entry must be resolved to a concrete price before computing risk")]
    UnresolvedEntry,
    #[error("stop loss sits at the entry price")]
    ZeroStopDistance,
}

/// Smallest price increment for an instrument, inferred from the symbol and
/// quote convention. A heuristic, not an instrument-metadata lookup: any
/// price with two or more integer digits is assumed to be a 3-digit quote.
pub fn pip_multiplier(symbol: &str, entry: Decimal) -> Decimal {
    match symbol {
        "XAUUSD" => dec!(0.1),
        "XAGUSD" => dec!(0.001),
        _ if integer_digits(entry) >= 2 => dec!(0.01),
        _ => dec!(0.0001),
    }
}

fn integer_digits(price: Decimal) -> usize {
    price.abs().trunc().to_string().len()
}

/// Price distance in whole pips, half-to-even at the midpoint.
fn pips(from: Decimal, to: Decimal, multiplier: Decimal) -> u32 {
    ((from - to).abs() / multiplier)
        .round()
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Fill in the signal's derived risk figures: stop-loss and take-profit
/// distances in pips, and lot sizes under the signal's risk policy.
///
/// The entry must already be pinned to a price; resolving a market-now
/// entry against a live quote is the execution pipeline's job.
pub fn compute_risk(
    trade: &mut TradeSignal,
    balance: Decimal,
    config: &RiskConfig,
) -> Result<(), RiskError> {
    let entry = match trade.entry {
        Entry::Fixed(price) => price,
        Entry::AtMarket => return Err(RiskError::UnresolvedEntry),
    };

    let multiplier = pip_multiplier(&trade.symbol, entry);
    let stop_loss_pips = pips(trade.stop_loss, entry, multiplier);
    if stop_loss_pips == 0 {
        return Err(RiskError::ZeroStopDistance);
    }

    let take_profit_pips: Vec<u32> = trade
        .take_profits
        .iter()
        .map(|tp| pips(*tp, entry, multiplier))
        .collect();

    let sizing = config
        .sizer()
        .size(balance, stop_loss_pips, &take_profit_pips);

    debug!(
        symbol = %trade.symbol,
        %multiplier,
        stop_loss_pips,
        ?take_profit_pips,
        "computed risk figures"
    );

    trade.risk = Some(RiskFigures {
        stop_loss_pips,
        take_profit_pips,
        sizing,
    });
    Ok(())
}
