//! Observability: structured logging and Prometheus metrics.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    if config.json_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// Metrics registry and helpers.
pub mod metrics {
    use metrics::describe_counter;
    use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

    /// Install the global Prometheus recorder and describe every metric.
    ///
    /// Returns `None` when metrics are disabled; counters then become no-ops.
    pub fn install(enabled: bool) -> anyhow::Result<Option<PrometheusHandle>> {
        if !enabled {
            return Ok(None);
        }

        let handle = PrometheusBuilder::new().install_recorder()?;
        register_metrics();
        tracing::info!("Metrics initialized");
        Ok(Some(handle))
    }

    /// Register all metric descriptions.
    pub fn register_metrics() {
        describe_counter!(
            "auth_tokens_issued_total",
            "Signed tokens issued, by purpose"
        );
        describe_counter!(
            "auth_failures_total",
            "Authentication failures by reason"
        );
        describe_counter!(
            "auth_denials_total",
            "Authenticated requests denied for missing permissions"
        );
        describe_counter!(
            "rbac_resolutions_total",
            "Permission resolutions by outcome"
        );
        describe_counter!(
            "eventify_errors_total",
            "Application errors by code and category"
        );
    }
}
