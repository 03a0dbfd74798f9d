//! Open Strangle Use Case
//!
//! Skips underlyings that already carry a short strangle, otherwise picks
//! delta-targeted strikes from the chain, prices the pair at mid and places
//! the credit order.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::application::dto::OrderResult;
use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::option_contract::SymbolCodec;
use crate::domain::order::{OrderTag, StrangleOrderParams};
use crate::domain::strangle::{
    OpenStrangle, StrangleStrikes, StrategyError, find_open_strangle, select_strangle_strikes,
    strangle_credit,
};

/// Inputs for opening a strangle.
#[derive(Debug, Clone)]
pub struct OpenStrangleRequest {
    /// Underlying symbol.
    pub underlying: String,
    /// Expiration to trade.
    pub expiration: NaiveDate,
    /// Target |delta| for both legs.
    pub target_delta: f64,
    /// Contracts per leg.
    pub quantity: i64,
    /// Skip the trade if the mid credit is below this.
    pub min_credit: Option<Decimal>,
    /// Order duration.
    pub duration: String,
    /// Idempotency tag; one is generated from the underlying when absent.
    pub tag: Option<String>,
}

/// What the use case did.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenStrangleOutcome {
    /// A short strangle was already open; nothing was placed.
    AlreadyOpen(OpenStrangle),
    /// A new strangle order was placed.
    Placed {
        /// Selected strikes.
        strikes: StrangleStrikes,
        /// Credit limit sent with the order.
        credit: Decimal,
        /// Broker acknowledgment.
        order: OrderResult,
    },
}

/// Errors from the open strangle workflow.
#[derive(Debug, Error)]
pub enum OpenStrangleError {
    /// Broker call failed.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Strike selection or pricing failed.
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// Mid credit is below the requested minimum.
    #[error("Credit {credit} below minimum {minimum}")]
    CreditBelowMinimum {
        /// Computed credit.
        credit: Decimal,
        /// Requested minimum.
        minimum: Decimal,
    },
}

/// Use case for opening a delta-targeted short strangle.
pub struct OpenStrangleUseCase<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
    codec: SymbolCodec,
}

impl<B> OpenStrangleUseCase<B>
where
    B: BrokerPort,
{
    /// Create a new `OpenStrangleUseCase`.
    pub const fn new(broker: Arc<B>, codec: SymbolCodec) -> Self {
        Self { broker, codec }
    }

    /// Run the workflow.
    ///
    /// # Errors
    ///
    /// Returns the first broker, selection or pricing failure.
    pub async fn execute(
        &self,
        request: &OpenStrangleRequest,
        cancel: &CancellationToken,
    ) -> Result<OpenStrangleOutcome, OpenStrangleError> {
        // 1. Existing position
        let positions = self.broker.get_positions(cancel).await?;
        if let Some(open) = find_open_strangle(&positions, &request.underlying, self.codec) {
            tracing::info!(
                underlying = %request.underlying,
                put = %open.put.symbol,
                call = %open.call.symbol,
                "Strangle already open, skipping"
            );
            return Ok(OpenStrangleOutcome::AlreadyOpen(open));
        }

        // 2. Strikes
        let chain = self
            .broker
            .get_option_chain(&request.underlying, request.expiration, true, cancel)
            .await?;
        let strikes = select_strangle_strikes(&chain, request.target_delta)?;

        // 3. Credit
        let mid = strangle_credit(&chain, strikes.put_strike, strikes.call_strike)?;
        let credit = Decimal::from_f64(mid)
            .ok_or_else(|| BrokerError::Internal {
                message: format!("credit {mid} is not representable"),
            })?
            .round_dp(2);
        if let Some(minimum) = request.min_credit {
            if credit < minimum {
                return Err(OpenStrangleError::CreditBelowMinimum { credit, minimum });
            }
        }

        let tag = request.tag.clone().unwrap_or_else(|| {
            OrderTag::generate(&format!("strangle-{}", request.underlying)).to_string()
        });

        tracing::info!(
            underlying = %request.underlying,
            expiration = %request.expiration,
            tag = %tag,
            put_strike = strikes.put_strike,
            call_strike = strikes.call_strike,
            credit = %credit,
            "Placing strangle"
        );

        // 4. Order
        let mut params = StrangleOrderParams::new(
            request.underlying.clone(),
            strikes.put_strike,
            strikes.call_strike,
            request.expiration.format("%Y-%m-%d").to_string(),
            request.quantity,
            credit,
        )
        .with_duration(request.duration.clone());
        params.tag = Some(tag);

        let order = self.broker.place_strangle_order(&params, cancel).await?;

        Ok(OpenStrangleOutcome::Placed {
            strikes,
            credit,
            order,
        })
    }
}
