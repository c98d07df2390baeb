use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies. JSON
/// output carries the current span so modal sessions can be correlated.
pub fn init_telemetry(observability: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&observability.log_level))?;

    if observability.json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(filter)
            .try_init()?;
    }

    tracing::debug!("Portfolio carousel telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking everything one modal session does
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span with common modal attributes
pub fn create_modal_span(
    operation: &str,
    slug: Option<&str>,
    correlation_id: Option<&str>,
) -> tracing::Span {
    tracing::info_span!(
        "portfolio_modal",
        operation = operation,
        portfolio.slug = slug,
        correlation.id = correlation_id,
    )
}
