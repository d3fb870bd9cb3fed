//! Subscriber setup: `EnvFilter` plus an OpenTelemetry layer exporting to file.

use super::exporter::{tracer_provider, SCOPE};
use super::rotation::RotationPolicy;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the trace export inside the data directory.
pub const TRACE_FILE_NAME: &str = "musician-search-otlp.json";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.trace_level`, which wins over `"info"`.
/// Returns the trace file path, or `None` when the data directory cannot be
/// created or a subscriber is already installed. Tracing is optional and
/// failures here are never fatal.
///
/// ```rust
/// use musician_search::{observability::init_tracing, Config};
///
/// let _trace_file = init_tracing(&Config::default());
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = crate::infrastructure::data_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    let trace_file = data_dir.join(TRACE_FILE_NAME);

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SCOPE),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer_provider(trace_file.clone(), RotationPolicy::default(), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .ok()?;

    Some(trace_file)
}
