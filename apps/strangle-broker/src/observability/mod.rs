//! Observability: metric helpers shared by the broker client and the
//! resilience layer.

mod metrics;

pub use self::metrics::{
    record_broker_request, record_circuit_breaker_rejection, record_circuit_breaker_transition,
    record_otoco_fallback,
};
