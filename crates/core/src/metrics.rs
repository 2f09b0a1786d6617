//! Prometheus metrics for provisioning runs.
//!
//! Collectors are process-wide statics; the binary registers them via
//! [`all_metrics`] and decides how to expose them.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Runs
// =============================================================================

/// Provisioning runs by outcome.
pub static PROVISIONING_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("daoforge_provisioning_runs_total", "Total provisioning runs"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Failed runs by the stage reached before failing.
pub static STAGE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "daoforge_stage_failures_total",
            "Provisioning failures by last completed stage",
        ),
        &["stage", "kind"],
    )
    .unwrap()
});

/// Time spent reaching each stage.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "daoforge_stage_duration_seconds",
            "Duration of each provisioning stage",
        )
        .buckets(vec![0.05, 0.25, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0]),
        &["stage"],
    )
    .unwrap()
});

// =============================================================================
// DAO creation
// =============================================================================

/// Step notifications observed on DAO-creation streams.
pub static DAO_STEPS_OBSERVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "daoforge_dao_steps_observed_total",
            "DAO creation steps observed",
        ),
        &["step"], // "creating", "done"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROVISIONING_RUNS.clone()),
        Box::new(STAGE_FAILURES.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(DAO_STEPS_OBSERVED.clone()),
    ]
}

/// Register all core metrics in `registry`.
pub fn register_metrics(registry: &prometheus::Registry) -> Result<(), prometheus::Error> {
    for metric in all_metrics() {
        registry.register(metric)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        let registry = prometheus::Registry::new();
        register_metrics(&registry).unwrap();

        PROVISIONING_RUNS.with_label_values(&["success"]).inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"daoforge_provisioning_runs_total".to_string()));

        // Registering twice is rejected by the registry.
        assert!(register_metrics(&registry).is_err());
    }
}
