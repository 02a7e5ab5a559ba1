//! Signal pipeline: classify, parse, resolve the entry, compute risk, build
//! the report, place the orders.
//!
//! The pipeline owns everything the pure core refuses to: the live quote
//! lookup for market-now entries, the account-balance fetch, and the final
//! hand-off to the broker.

use anyhow::Result;
use tracing::{debug, info};

use crate::api::{BrokerClient, OrderResponse};
use crate::models::TradeSignal;
use crate::signal::{looks_like_signal, normalize, parse};
use crate::trading::{build_report, compute_risk, RiskConfig};

/// Everything produced from one accepted signal.
#[derive(Debug)]
pub struct ProcessedSignal {
    pub trade: TradeSignal,
    pub report: Vec<(String, String)>,
    pub orders: Vec<OrderResponse>,
}

/// Live trading pipeline bound to one broker account.
pub struct Bot {
    config: RiskConfig,
    broker: BrokerClient,
    dry_run: bool,
}

impl Bot {
    pub fn new(config: RiskConfig, broker: BrokerClient, dry_run: bool) -> Self {
        Self {
            config,
            broker,
            dry_run,
        }
    }

    /// Handle one inbound message end to end.
    ///
    /// Returns `Ok(None)` for messages the classifier rejects as ordinary
    /// chat. Parse and risk failures are returned as errors for the caller
    /// to report verbatim; the partial signal is discarded and nothing is
    /// retried.
    pub async fn handle_message(&self, text: &str) -> Result<Option<ProcessedSignal>> {
        if !looks_like_signal(text) {
            debug!("message does not look like a signal, ignoring");
            return Ok(None);
        }

        let lines = normalize(text)?;
        let mut trade = parse(&lines, &self.config)?;
        info!(symbol = %trade.symbol, order_type = %trade.order_type, "signal parsed");

        let account = self.broker.account_information().await?;

        // Market-now entries are pinned to the live quote here, before any
        // arithmetic: bid for buys, ask for sells.
        if trade.entry.is_market() {
            let quote = self.broker.symbol_quote(&trade.symbol).await?;
            let price = if trade.order_type.is_buy() {
                quote.bid
            } else {
                quote.ask
            };
            debug!(%price, "resolved market entry");
            trade.resolve_entry(price);
        }

        compute_risk(&mut trade, account.balance, &self.config)?;
        let report = build_report(&trade, account.balance, &self.config);

        let orders = if self.dry_run {
            info!("dry run: skipping order placement");
            Vec::new()
        } else {
            self.broker
                .place_signal(&trade, self.config.trailing_stop)
                .await?
        };

        Ok(Some(ProcessedSignal {
            trade,
            report,
            orders,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_bot() -> Bot {
        // Unroutable base URL: these tests must finish before the pipeline
        // ever contacts the broker.
        let broker = BrokerClient::with_base_url(
            "http://127.0.0.1:1".to_string(),
            "test-account".to_string(),
            "test-key".to_string(),
        )
        .unwrap();
        Bot::new(RiskConfig::default(), broker, true)
    }

    #[test]
    fn test_chat_is_ignored_before_any_broker_contact() {
        let bot = offline_bot();
        let outcome = tokio_test::block_on(bot.handle_message("morning all\nquiet session"));
        assert!(outcome.unwrap().is_none());
    }

    #[test]
    fn test_short_signal_fails_parse_before_any_broker_contact() {
        let bot = offline_bot();
        let err = tokio_test::block_on(bot.handle_message("BUY EURUSD\nSL 1.0800")).unwrap_err();
        assert!(err.to_string().contains("fewer than 3"));
    }
}
