//! Data models for parsed signals, sizing results, and instruments.

mod signal;
pub mod symbol;

pub use signal::{Entry, OrderType, RiskFigures, RiskPolicy, Sizing, TradeSignal};
