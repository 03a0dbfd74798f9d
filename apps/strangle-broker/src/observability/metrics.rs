//! Metrics for broker requests and circuit breakers.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! host process installs a recorder.

use metrics::{counter, histogram};

// ============================================================================
// Broker Request Metrics
// ============================================================================

/// Record one broker HTTP request.
///
/// # Arguments
///
/// * `endpoint` - Path template (e.g., `"/markets/quotes"`)
/// * `outcome` - `"ok"`, the HTTP status, `"transport"`, `"timeout"` or `"cancelled"`
/// * `latency_seconds` - Time from send to response in seconds
pub fn record_broker_request(endpoint: &str, outcome: &str, latency_seconds: f64) {
    counter!(
        "broker_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        "broker_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(latency_seconds);
}

/// Record a fallback from native OTOCO to a plain strangle order.
pub fn record_otoco_fallback() {
    counter!("otoco_fallbacks_total").increment(1);
}

// ============================================================================
// Circuit Breaker Metrics
// ============================================================================

/// Record a circuit breaker state change.
///
/// # Arguments
///
/// * `name` - Breaker name (e.g., "tradier")
/// * `to` - New state (`"CLOSED"`, `"OPEN"`, `"HALF_OPEN"`)
pub fn record_circuit_breaker_transition(name: &str, to: &str) {
    counter!(
        "circuit_breaker_transitions_total",
        "name" => name.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record a call rejected because the circuit was open.
///
/// # Arguments
///
/// * `name` - Breaker name
pub fn record_circuit_breaker_rejection(name: &str) {
    counter!(
        "circuit_breaker_rejections_total",
        "name" => name.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // No recorder is installed; these only check the calls do not panic.

    #[test]
    fn test_record_broker_request() {
        record_broker_request("/markets/quotes", "ok", 0.120);
        record_broker_request("/accounts/{id}/orders", "429", 0.050);
    }

    #[test]
    fn test_record_otoco_fallback() {
        record_otoco_fallback();
    }

    #[test]
    fn test_record_circuit_breaker_transition() {
        record_circuit_breaker_transition("tradier", "OPEN");
    }

    #[test]
    fn test_record_circuit_breaker_rejection() {
        record_circuit_breaker_rejection("tradier");
    }
}
