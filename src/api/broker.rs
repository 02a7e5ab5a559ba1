//! Brokerage REST client: account state, quotes, and order placement.
//!
//! Everything here sits outside the parser/calculator core: quote lookup for
//! market-now entries, transient-failure retries, and the per-take-profit
//! order fan-out all belong to this execution collaborator.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use backoff::ExponentialBackoffBuilder;
use futures::future::try_join_all;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{Sizing, TradeSignal};

use super::types::{AccountInformation, OrderRequest, OrderResponse, SymbolQuote};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRY_ELAPSED: Duration = Duration::from_secs(60);

/// Client for the brokerage account API.
pub struct BrokerClient {
    client: Client,
    base_url: String,
    account_id: String,
    api_key: String,
}

impl BrokerClient {
    /// Create a client from `BROKER_URL`, `ACCOUNT_ID`, and `API_KEY`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("BROKER_URL").context("BROKER_URL is not set")?;
        let account_id = env::var("ACCOUNT_ID").context("ACCOUNT_ID is not set")?;
        let api_key = env::var("API_KEY").context("API_KEY is not set")?;
        Self::with_base_url(base_url, account_id, api_key)
    }

    /// Create with an explicit base URL (for testing).
    pub fn with_base_url(base_url: String, account_id: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            account_id,
            api_key,
        })
    }

    /// Current balance and equity for the configured account.
    pub async fn account_information(&self) -> Result<AccountInformation> {
        let url = format!(
            "{}/accounts/{}/account-information",
            self.base_url, self.account_id
        );
        self.get_json(&url).await.context("Failed to fetch account information")
    }

    /// Current bid/ask for a symbol.
    pub async fn symbol_quote(&self, symbol: &str) -> Result<SymbolQuote> {
        let url = format!(
            "{}/accounts/{}/symbols/{}/current-price",
            self.base_url, self.account_id, symbol
        );
        self.get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch quote for {symbol}"))
    }

    /// Submit one order.
    pub async fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse> {
        let url = format!("{}/accounts/{}/orders", self.base_url, self.account_id);
        debug!(
            client_order_id = %request.client_order_id,
            action = ?request.action,
            volume = %request.volume,
            "submitting order"
        );

        let response: OrderResponse = self
            .post_json(&url, request)
            .await
            .context("Failed to place order")?;

        info!(
            order_id = %response.order_id,
            code = %response.string_code,
            "order placed"
        );
        Ok(response)
    }

    /// Submit a fully computed signal: one order per take-profit level.
    ///
    /// A fixed-fraction signal divides its single lot evenly across targets;
    /// a reward-weighted signal already carries one lot per target.
    pub async fn place_signal(
        &self,
        trade: &TradeSignal,
        trailing_stop: bool,
    ) -> Result<Vec<OrderResponse>> {
        let risk = trade
            .risk
            .as_ref()
            .context("signal has no computed risk figures")?;

        let volumes: Vec<Decimal> = match &risk.sizing {
            Sizing::Single { lot } => {
                let share = *lot / Decimal::from(trade.take_profits.len().max(1));
                vec![share; trade.take_profits.len()]
            }
            Sizing::PerTarget { lots, .. } => lots.clone(),
        };

        let requests: Vec<OrderRequest> = trade
            .take_profits
            .iter()
            .zip(volumes)
            .map(|(take_profit, volume)| OrderRequest {
                client_order_id: uuid::Uuid::new_v4().to_string(),
                symbol: trade.symbol.clone(),
                action: trade.order_type.into(),
                volume,
                // Market orders fill at the prevailing quote; the resolved
                // entry price is only forwarded for limit/stop orders.
                open_price: if trade.order_type.is_market() {
                    None
                } else {
                    trade.entry.price()
                },
                stop_loss: trade.stop_loss,
                take_profit: *take_profit,
                trailing_stop,
            })
            .collect();

        try_join_all(requests.iter().map(|request| self.place_order(request))).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = backoff::future::retry(self.retry_policy(), || async {
            let response = self
                .client
                .get(url)
                .header("auth-token", &self.api_key)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(anyhow!(e)))?;

            if response.status().is_server_error() {
                return Err(backoff::Error::transient(anyhow!(
                    "broker returned {}",
                    response.status()
                )));
            }
            Ok(response)
        })
        .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("broker request failed: {} - {}", status, body);
        }

        response.json().await.context("Failed to parse broker response")
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let response = backoff::future::retry(self.retry_policy(), || async {
            let response = self
                .client
                .post(url)
                .header("auth-token", &self.api_key)
                .json(body)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(anyhow!(e)))?;

            if response.status().is_server_error() {
                return Err(backoff::Error::transient(anyhow!(
                    "broker returned {}",
                    response.status()
                )));
            }
            Ok(response)
        })
        .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("broker request failed: {} - {}", status, body);
        }

        response.json().await.context("Failed to parse broker response")
    }

    fn retry_policy(&self) -> backoff::ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(MAX_RETRY_ELAPSED))
            .build()
    }
}
