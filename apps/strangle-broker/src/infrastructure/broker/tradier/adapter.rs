//! Tradier broker adapter implementing BrokerPort.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{
    AccountBalances, CalendarDay, Expiration, HistoricalBar, HistoryInterval, MarketClock,
    OrderResult, Quote,
};
use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::option_contract::{OptionContract, SymbolCodec};
use crate::domain::order::{
    CloseOrderParams, OrderBuilder, OrderRequest, OtocoRequest, ProfitTarget,
    StrangleCloseParams, StrangleOrderParams, ValidationError,
};
use crate::domain::strangle::Position;

use super::api_types::{
    BalancesResponse, CalendarResponse, ChainResponse, ClockResponse, ExpirationsResponse,
    HistoryResponse, OrderResponse, PositionsResponse, QuotesResponse, order_form, otoco_form,
};
use super::config::{TradierConfig, TradierEnvironment};
use super::error::TradierError;
use super::http_client::TradierHttpClient;
use super::otoco::{OrderSubmitter, place_strangle};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tradier broker adapter.
///
/// Implements `BrokerPort` for the Tradier brokerage API.
#[derive(Debug, Clone)]
pub struct TradierBrokerAdapter {
    client: TradierHttpClient,
    account_id: String,
    environment: TradierEnvironment,
    builder: OrderBuilder,
    otoco_target: Option<ProfitTarget>,
}

impl TradierBrokerAdapter {
    /// Create a new Tradier broker adapter.
    pub fn new(config: TradierConfig) -> Result<Self, TradierError> {
        let account_id = config.account_id.trim().to_string();
        if account_id.is_empty() {
            return Err(TradierError::MissingCredentials("account id"));
        }

        let client = TradierHttpClient::new(&config)?;
        let codec = SymbolCodec::new(config.accept_lowercase_option_type);

        Ok(Self {
            client,
            account_id,
            environment: config.environment,
            builder: OrderBuilder::new(codec),
            otoco_target: config.otoco_target(),
        })
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }

    /// Codec used to read option symbols.
    #[must_use]
    pub const fn codec(&self) -> SymbolCodec {
        self.builder.codec()
    }

    fn account_path(&self, suffix: &str) -> String {
        format!("/accounts/{}{suffix}", self.account_id)
    }

    fn log_submission(&self, class: &str, underlying: &str) {
        if self.is_live() {
            tracing::warn!(
                class,
                underlying,
                "Submitting LIVE order - this will execute real trades"
            );
        }
    }

    async fn post_order(
        &self,
        form: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        let response: OrderResponse = self
            .client
            .post_form(&self.account_path("/orders"), form, cancel)
            .await?;
        let result = response.into_result()?;

        tracing::info!(
            order_id = ?result.id,
            status = ?result.status,
            "Order accepted by Tradier"
        );
        Ok(result)
    }
}

/// Order ids go into the request path, so only plain ids are accepted.
fn validate_order_id(order_id: &str) -> Result<&str, ValidationError> {
    let trimmed = order_id.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidOrderId {
            order_id: order_id.to_string(),
        });
    }
    Ok(trimmed)
}

fn not_found_on_404(err: TradierError, what: String) -> BrokerError {
    match err {
        TradierError::Api { status: 404, .. } => BrokerError::NotFound { what },
        other => other.into(),
    }
}

#[async_trait]
impl OrderSubmitter for TradierBrokerAdapter {
    async fn submit_order(
        &self,
        order: &OrderRequest,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.log_submission(order.class.as_str(), &order.underlying);
        tracing::info!(
            class = order.class.as_str(),
            underlying = %order.underlying,
            order_type = order.order_type.as_str(),
            price = ?order.price,
            legs = order.legs.len(),
            tag = ?order.tag.as_ref().map(|t| t.as_str()),
            "Submitting order to Tradier"
        );
        self.post_order(&order_form(order), cancel).await
    }

    async fn submit_otoco(
        &self,
        order: &OtocoRequest,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.log_submission("otoco", &order.entry.underlying);
        tracing::info!(
            underlying = %order.entry.underlying,
            entry_price = ?order.entry.price,
            exit_price = ?order.exit.price,
            tag = ?order.tag.as_ref().map(|t| t.as_str()),
            "Submitting OTOCO order to Tradier"
        );
        self.post_order(&otoco_form(order), cancel).await
    }
}

#[async_trait]
impl BrokerPort for TradierBrokerAdapter {
    async fn get_balances(&self, cancel: &CancellationToken) -> Result<AccountBalances, BrokerError> {
        let response: BalancesResponse = self
            .client
            .get(&self.account_path("/balances"), &[], cancel)
            .await?;
        Ok(response.into_balances())
    }

    async fn get_positions(&self, cancel: &CancellationToken) -> Result<Vec<Position>, BrokerError> {
        let response: PositionsResponse = self
            .client
            .get(&self.account_path("/positions"), &[], cancel)
            .await?;
        Ok(response.into_positions())
    }

    async fn get_quote(&self, symbol: &str, cancel: &CancellationToken) -> Result<Quote, BrokerError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        let response: QuotesResponse = self
            .client
            .get(
                "/markets/quotes",
                &[("symbols", symbol.clone()), ("greeks", "false".to_string())],
                cancel,
            )
            .await?;
        response.into_quote(&symbol).ok_or(BrokerError::NotFound {
            what: format!("quote for {symbol}"),
        })
    }

    async fn get_expirations(
        &self,
        symbol: &str,
        include_strikes: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Expiration>, BrokerError> {
        let response: ExpirationsResponse = self
            .client
            .get(
                "/markets/options/expirations",
                &[
                    ("symbol", symbol.trim().to_ascii_uppercase()),
                    ("includeAllRoots", "true".to_string()),
                    ("strikes", include_strikes.to_string()),
                ],
                cancel,
            )
            .await?;
        Ok(response.into_expirations())
    }

    async fn get_option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
        greeks: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<OptionContract>, BrokerError> {
        let response: ChainResponse = self
            .client
            .get(
                "/markets/options/chains",
                &[
                    ("symbol", symbol.trim().to_ascii_uppercase()),
                    ("expiration", expiration.format(DATE_FORMAT).to_string()),
                    ("greeks", greeks.to_string()),
                ],
                cancel,
            )
            .await?;
        Ok(response.into_contracts()?)
    }

    async fn get_market_clock(
        &self,
        delayed: bool,
        cancel: &CancellationToken,
    ) -> Result<MarketClock, BrokerError> {
        let response: ClockResponse = self
            .client
            .get("/markets/clock", &[("delayed", delayed.to_string())], cancel)
            .await?;
        Ok(response.clock)
    }

    async fn get_market_calendar(
        &self,
        year: i32,
        month: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<CalendarDay>, BrokerError> {
        let response: CalendarResponse = self
            .client
            .get(
                "/markets/calendar",
                &[("month", format!("{month:02}")), ("year", year.to_string())],
                cancel,
            )
            .await?;
        Ok(response.into_days())
    }

    async fn get_historical_bars(
        &self,
        symbol: &str,
        interval: HistoryInterval,
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<HistoricalBar>, BrokerError> {
        let response: HistoryResponse = self
            .client
            .get(
                "/markets/history",
                &[
                    ("symbol", symbol.trim().to_ascii_uppercase()),
                    ("interval", interval.as_str().to_string()),
                    ("start", start.format(DATE_FORMAT).to_string()),
                    ("end", end.format(DATE_FORMAT).to_string()),
                ],
                cancel,
            )
            .await?;
        Ok(response.into_bars())
    }

    async fn place_strangle_order(
        &self,
        params: &StrangleOrderParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        place_strangle(self, &self.builder, self.otoco_target, params, cancel).await
    }

    async fn close_strangle_order(
        &self,
        params: &StrangleCloseParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        let order = self.builder.strangle_close(params)?;
        self.submit_order(&order, cancel).await
    }

    async fn place_single_leg_close(
        &self,
        params: &CloseOrderParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        let order = self.builder.single_leg_close(params)?;
        self.submit_order(&order, cancel).await
    }

    async fn get_order_status(
        &self,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        let order_id = validate_order_id(order_id)?;
        let response: OrderResponse = self
            .client
            .get(
                &self.account_path(&format!("/orders/{order_id}")),
                &[("includeTags", "true".to_string())],
                cancel,
            )
            .await
            .map_err(|e| not_found_on_404(e, format!("order {order_id}")))?;
        Ok(response.into_result()?)
    }

    async fn cancel_order(
        &self,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        let order_id = validate_order_id(order_id)?;
        tracing::info!(order_id, "Canceling order");
        let response: OrderResponse = self
            .client
            .delete(&self.account_path(&format!("/orders/{order_id}")), cancel)
            .await
            .map_err(|e| not_found_on_404(e, format!("order {order_id}")))?;
        Ok(response.into_result()?)
    }
}
