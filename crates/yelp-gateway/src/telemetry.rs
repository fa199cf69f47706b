use anyhow::Result;
use opentelemetry::trace::TracerProvider;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::runtime::Tokio;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::Resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const SERVICE_NAME: &str = "yelp-gateway";

/// Flushes pending spans to the collector when dropped.
#[must_use = "dropping the guard shuts the trace exporter down"]
pub struct TelemetryGuard {
    otlp: bool,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if self.otlp {
            opentelemetry::global::shutdown_tracer_provider();
        }
    }
}

/// JSON logs filtered by `RUST_LOG` (default `info`), plus OTLP export when
/// an endpoint is configured.
pub fn init(config: &Config) -> Result<TelemetryGuard> {
    let otlp_layer = config
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| otlp_tracer(endpoint).map(|t| tracing_opentelemetry::layer().with_tracer(t)))
        .transpose()?;
    let guard = TelemetryGuard {
        otlp: otlp_layer.is_some(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .with(otlp_layer)
        .try_init()?;

    Ok(guard)
}

fn otlp_tracer(endpoint: &str) -> Result<Tracer> {
    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(opentelemetry_sdk::trace::Config::default().with_resource(resource()))
        .install_batch(Tokio)?;

    Ok(provider.tracer(SERVICE_NAME))
}

fn resource() -> Resource {
    Resource::new([KeyValue::new("service.name", SERVICE_NAME)])
}
