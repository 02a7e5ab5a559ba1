//! Wire types for the brokerage REST API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::OrderType;

/// Account snapshot from the /account endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInformation {
    pub balance: Decimal,
    #[serde(default)]
    pub equity: Decimal,
    #[serde(default)]
    pub currency: String,
}

/// Current bid/ask from the /quotes endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SymbolQuote {
    pub bid: Decimal,
    pub ask: Decimal,
}

/// Execution instruction carried by an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    MarketBuy,
    MarketSell,
    LimitBuy,
    LimitSell,
    StopBuy,
    StopSell,
}

impl From<OrderType> for OrderAction {
    fn from(order_type: OrderType) -> Self {
        match order_type {
            OrderType::BuyMarket => OrderAction::MarketBuy,
            OrderType::SellMarket => OrderAction::MarketSell,
            OrderType::BuyLimit => OrderAction::LimitBuy,
            OrderType::SellLimit => OrderAction::LimitSell,
            OrderType::BuyStop => OrderAction::StopBuy,
            OrderType::SellStop => OrderAction::StopSell,
        }
    }
}

/// Request to place one order. A multi-target signal becomes one request
/// per take-profit level.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub action: OrderAction,
    pub volume: Decimal,
    /// Absent for market orders; the broker fills at the prevailing quote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_price: Option<Decimal>,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub trailing_stop: bool,
}

/// Broker acknowledgement of a placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    #[serde(default)]
    pub string_code: String,
    #[serde(default)]
    pub placed_at: Option<DateTime<Utc>>,
}
