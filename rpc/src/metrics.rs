//! Prometheus metrics for the HTTP API.
//!
//! [`ApiMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

/// Verification outcomes, used as the `outcome` label value.
pub const OUTCOME_VERIFIED: &str = "verified";
pub const OUTCOME_REJECTED: &str = "rejected";
pub const OUTCOME_ERROR: &str = "error";

pub struct ApiMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Petitions accepted and stored.
    pub petitions_created: IntCounter,
    /// Create requests rejected by validation.
    pub petitions_rejected: IntCounter,
    /// Proof checks, labelled by outcome.
    pub verifications: IntCounterVec,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Petitions currently in the store.
    pub petitions_stored: IntGauge,
}

impl ApiMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let petitions_created = register_int_counter_with_registry!(
            Opts::new(
                "petitions_created_total",
                "Total petitions accepted and stored"
            ),
            registry
        )?;

        let petitions_rejected = register_int_counter_with_registry!(
            Opts::new(
                "petitions_rejected_total",
                "Total create requests rejected by validation"
            ),
            registry
        )?;

        let verifications = register_int_counter_vec_with_registry!(
            Opts::new(
                "verifications_total",
                "Identity proof checks by outcome"
            ),
            &["outcome"],
            registry
        )?;

        let petitions_stored = register_int_gauge_with_registry!(
            Opts::new("petitions_stored", "Petitions currently in the store"),
            registry
        )?;

        Ok(Self {
            registry,
            petitions_created,
            petitions_rejected,
            verifications,
            petitions_stored,
        })
    }

    /// Set the stored-petitions gauge, saturating at `i64::MAX`.
    pub fn set_stored(&self, count: u64) {
        self.petitions_stored.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    pub fn record_verification(&self, outcome: &str) {
        self.verifications.with_label_values(&[outcome]).inc();
    }

    /// Encode all metrics in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.petitions_created.inc();
        metrics.petitions_stored.set(4);
        metrics.record_verification(OUTCOME_REJECTED);

        let text = metrics.encode().unwrap();
        assert!(text.contains("petitions_created_total 1"));
        assert!(text.contains("petitions_stored 4"));
        assert!(text.contains("verifications_total{outcome=\"rejected\"} 1"));
    }

    #[test]
    fn stored_gauge_saturates() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.set_stored(u64::MAX);
        assert_eq!(metrics.petitions_stored.get(), i64::MAX);
        metrics.set_stored(7);
        assert_eq!(metrics.petitions_stored.get(), 7);
    }
}
