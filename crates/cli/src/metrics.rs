//! Metrics registry and text exposition.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    if let Err(e) = daoforge_core::metrics::register_metrics(&registry) {
        tracing::warn!("Failed to register metrics: {}", e);
    }
    registry
});

/// Encode all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics are not valid UTF-8")
}

/// Write the text exposition to `path` for a node-exporter textfile collector.
///
/// Written to a sibling temp file first so the collector never reads a
/// partial file.
pub fn write_textfile(path: &Path) -> Result<()> {
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, encode_metrics()?)
        .with_context(|| format!("Failed to write {:?}", tmp))?;
    std::fs::rename(&tmp, path).with_context(|| format!("Failed to move metrics to {:?}", path))
}
