//! Prometheus metrics for the social API
//!
//! Registered on the default registry so that the pool gauges published by
//! `db-pool` are exported from the same `/metrics` endpoint.

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Requests rejected by the visibility guard (labels: actor)
    /// actor: anonymous, authenticated
    pub static ref VISIBILITY_DENIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "social_api_visibility_denied_total",
        "Requests denied because the author is private and not followed",
        &["actor"]
    )
    .expect("Prometheus metrics registration should succeed at startup");
}

pub fn record_visibility_denied(anonymous: bool) {
    let actor = if anonymous { "anonymous" } else { "authenticated" };
    VISIBILITY_DENIED_TOTAL.with_label_values(&[actor]).inc();
}

/// Gather all metrics in Prometheus text format
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denials_are_exported() {
        record_visibility_denied(true);
        record_visibility_denied(false);

        let text = render().unwrap();
        assert!(text.contains("social_api_visibility_denied_total"));
        assert!(text.contains("actor=\"anonymous\""));
    }
}
