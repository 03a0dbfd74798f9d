//! Strangle submission policy: OTOCO first, plain multileg on fallback.
//!
//! The plain fallback fires only when the broker signals that OTOCO is
//! unsupported. Every other error, including rate limits and bad requests,
//! is returned as-is so the caller never sends a second order for a
//! request the broker may already have accepted.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::dto::OrderResult;
use crate::application::ports::BrokerError;
use crate::domain::order::{
    OrderBuilder, OrderRequest, OtocoRequest, ProfitTarget, StrangleOrderParams,
};
use crate::observability::record_otoco_fallback;

/// Sends built orders to the broker.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit a single-leg or multileg order.
    async fn submit_order(
        &self,
        order: &OrderRequest,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;

    /// Submit an OTOCO order.
    async fn submit_otoco(
        &self,
        order: &OtocoRequest,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;
}

/// Place a short strangle.
///
/// With `target` unset the plain multileg credit order is sent. With a
/// target the OTOCO form is tried first and the plain order is sent at most
/// once, only after an unsupported-feature signal.
pub async fn place_strangle<S>(
    submitter: &S,
    builder: &OrderBuilder,
    target: Option<ProfitTarget>,
    params: &StrangleOrderParams,
    cancel: &CancellationToken,
) -> Result<OrderResult, BrokerError>
where
    S: OrderSubmitter + ?Sized,
{
    let plain = builder.strangle_open(params)?;

    let Some(target) = target else {
        return submitter.submit_order(&plain, cancel).await;
    };

    let otoco = builder.otoco_strangle(params, target)?;
    match submitter.submit_otoco(&otoco, cancel).await {
        Err(e) if e.is_feature_unsupported() => {
            tracing::warn!(
                underlying = %plain.underlying,
                error = %e,
                "OTOCO not supported, submitting plain strangle"
            );
            record_otoco_fallback();
            submitter.submit_order(&plain, cancel).await
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderClass, OrderType, ValidationError};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Order(OrderType),
        Otoco,
    }

    struct FakeSubmitter {
        otoco_result: Result<OrderResult, BrokerError>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeSubmitter {
        fn new(otoco_result: Result<OrderResult, BrokerError>) -> Self {
            Self {
                otoco_result,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrderSubmitter for FakeSubmitter {
        async fn submit_order(
            &self,
            order: &OrderRequest,
            _cancel: &CancellationToken,
        ) -> Result<OrderResult, BrokerError> {
            assert_eq!(order.class, OrderClass::Multileg);
            self.calls.lock().unwrap().push(Call::Order(order.order_type));
            Ok(OrderResult {
                id: Some(2),
                ..Default::default()
            })
        }

        async fn submit_otoco(
            &self,
            _order: &OtocoRequest,
            _cancel: &CancellationToken,
        ) -> Result<OrderResult, BrokerError> {
            self.calls.lock().unwrap().push(Call::Otoco);
            self.otoco_result.clone()
        }
    }

    fn params() -> StrangleOrderParams {
        StrangleOrderParams::new("SPY", 430.0, 470.0, "2025-01-17", 1, dec!(2.45))
    }

    fn api(status: u16) -> BrokerError {
        BrokerError::Api {
            status,
            body: String::new(),
        }
    }

    async fn place(
        submitter: &FakeSubmitter,
        target: Option<ProfitTarget>,
        params: &StrangleOrderParams,
    ) -> Result<OrderResult, BrokerError> {
        place_strangle(
            submitter,
            &OrderBuilder::default(),
            target,
            params,
            &CancellationToken::new(),
        )
        .await
    }

    #[tokio::test]
    async fn test_plain_order_without_target() {
        let submitter = FakeSubmitter::new(Err(api(500)));
        let result = place(&submitter, None, &params()).await.unwrap();
        assert_eq!(result.id, Some(2));
        assert_eq!(submitter.calls(), vec![Call::Order(OrderType::Credit)]);
    }

    #[tokio::test]
    async fn test_otoco_success_sends_one_order() {
        let submitter = FakeSubmitter::new(Ok(OrderResult {
            id: Some(1),
            ..Default::default()
        }));
        let result = place(&submitter, Some(ProfitTarget::DEFAULT), &params())
            .await
            .unwrap();
        assert_eq!(result.id, Some(1));
        assert_eq!(submitter.calls(), vec![Call::Otoco]);
    }

    #[tokio::test]
    async fn test_fallback_on_not_implemented() {
        let submitter = FakeSubmitter::new(Err(api(501)));
        let result = place(&submitter, Some(ProfitTarget::DEFAULT), &params())
            .await
            .unwrap();
        assert_eq!(result.id, Some(2));
        assert_eq!(
            submitter.calls(),
            vec![Call::Otoco, Call::Order(OrderType::Credit)]
        );
    }

    #[tokio::test]
    async fn test_fallback_on_unsupported_sentinel() {
        let submitter = FakeSubmitter::new(Err(BrokerError::FeatureUnsupported {
            feature: "otoco".to_string(),
        }));
        place(&submitter, Some(ProfitTarget::DEFAULT), &params())
            .await
            .unwrap();
        assert_eq!(submitter.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_no_fallback_on_rate_limit() {
        let submitter = FakeSubmitter::new(Err(api(429)));
        let err = place(&submitter, Some(ProfitTarget::DEFAULT), &params())
            .await
            .unwrap_err();
        assert_eq!(err, api(429));
        assert_eq!(submitter.calls(), vec![Call::Otoco]);
    }

    #[tokio::test]
    async fn test_no_fallback_on_bad_request() {
        let submitter = FakeSubmitter::new(Err(api(400)));
        place(&submitter, Some(ProfitTarget::DEFAULT), &params())
            .await
            .unwrap_err();
        assert_eq!(submitter.calls(), vec![Call::Otoco]);
    }

    #[tokio::test]
    async fn test_no_fallback_on_cancel() {
        let submitter = FakeSubmitter::new(Err(BrokerError::Cancelled));
        let err = place(&submitter, Some(ProfitTarget::DEFAULT), &params())
            .await
            .unwrap_err();
        assert_eq!(err, BrokerError::Cancelled);
        assert_eq!(submitter.calls(), vec![Call::Otoco]);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let submitter = FakeSubmitter::new(Err(api(501)));
        let mut bad = params();
        bad.put_strike = 480.0;
        let err = place(&submitter, Some(ProfitTarget::DEFAULT), &bad)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BrokerError::Validation(ValidationError::InvertedStrikes { .. })
        ));
        assert!(submitter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_zero_exit_debit_sends_nothing() {
        let submitter = FakeSubmitter::new(Err(api(501)));
        let target = ProfitTarget::new(1.0).unwrap();
        let err = place(&submitter, Some(target), &params())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BrokerError::Validation(ValidationError::InvalidPrice { .. })
        ));
        assert!(submitter.calls().is_empty());
    }
}
