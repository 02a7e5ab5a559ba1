//! Parsed trade-signal model and its risk-derived figures.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fully resolved order type of a parsed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    BuyMarket,
    SellMarket,
    BuyLimit,
    SellLimit,
    BuyStop,
    SellStop,
}

impl OrderType {
    pub fn is_buy(&self) -> bool {
        matches!(
            self,
            OrderType::BuyMarket | OrderType::BuyLimit | OrderType::BuyStop
        )
    }

    pub fn is_market(&self) -> bool {
        matches!(self, OrderType::BuyMarket | OrderType::SellMarket)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::BuyMarket => "Buy Market",
            OrderType::SellMarket => "Sell Market",
            OrderType::BuyLimit => "Buy Limit",
            OrderType::SellLimit => "Sell Limit",
            OrderType::BuyStop => "Buy Stop",
            OrderType::SellStop => "Sell Stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of a signal: an explicit price, or fill at the prevailing quote.
///
/// `AtMarket` is replaced with a live bid/ask by the execution pipeline;
/// the risk calculator refuses to run until that has happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    Fixed(Decimal),
    AtMarket,
}

impl Entry {
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Entry::Fixed(p) => Some(*p),
            Entry::AtMarket => None,
        }
    }

    pub fn is_market(&self) -> bool {
        matches!(self, Entry::AtMarket)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Fixed(p) => write!(f, "{p}"),
            Entry::AtMarket => f.write_str("NOW"),
        }
    }
}

/// Position-sizing policy, selected once in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    /// One risk fraction of balance, split evenly across take-profits.
    FixedFraction,
    /// Per-take-profit risk fraction scaled by that target's reward:risk.
    RewardWeighted,
}

impl RiskPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed_fraction" => Some(Self::FixedFraction),
            "reward" | "reward_weighted" => Some(Self::RewardWeighted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskPolicy::FixedFraction => "fixed_fraction",
            RiskPolicy::RewardWeighted => "reward_weighted",
        }
    }
}

/// Lot sizes produced by a sizing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sizing {
    /// One lot for the whole signal, divided by the take-profit count at
    /// submission time.
    Single { lot: Decimal },
    /// One independent lot per take-profit, with its reward:risk ratio.
    PerTarget {
        lots: Vec<Decimal>,
        reward_risk: Vec<Decimal>,
    },
}

/// Figures derived from a signal by the risk calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFigures {
    pub stop_loss_pips: u32,
    pub take_profit_pips: Vec<u32>,
    pub sizing: Sizing,
}

impl RiskFigures {
    /// Dollar loss if the stop is hit across every submitted order.
    pub fn potential_loss(&self) -> Decimal {
        let lots = match &self.sizing {
            Sizing::Single { lot } => *lot,
            Sizing::PerTarget { lots, .. } => lots.iter().sum(),
        };
        (lots * dec!(10) * Decimal::from(self.stop_loss_pips)).round_dp(2)
    }

    /// Dollar profit per take-profit target if it is reached.
    pub fn potential_profits(&self) -> Vec<Decimal> {
        match &self.sizing {
            Sizing::Single { lot } => {
                let share = Decimal::ONE / Decimal::from(self.take_profit_pips.len().max(1));
                self.take_profit_pips
                    .iter()
                    .map(|tp| (*lot * dec!(10) * share * Decimal::from(*tp)).round_dp(2))
                    .collect()
            }
            Sizing::PerTarget { lots, .. } => lots
                .iter()
                .zip(&self.take_profit_pips)
                .map(|(lot, tp)| (*lot * dec!(10) * Decimal::from(*tp)).round_dp(2))
                .collect(),
        }
    }
}

/// A trading signal parsed from one inbound message.
///
/// Built incrementally by the parser, then treated as read-only once the
/// risk calculator has filled in `risk`. One instance per message; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub order_type: OrderType,
    pub symbol: String,
    pub entry: Entry,
    pub stop_loss: Decimal,
    pub take_profits: Vec<Decimal>,
    pub risk_policy: RiskPolicy,
    pub risk: Option<RiskFigures>,
}

impl TradeSignal {
    /// Pin a market-now entry to a concrete quote price.
    pub fn resolve_entry(&mut self, price: Decimal) {
        self.entry = Entry::Fixed(price);
    }
}
