use crate::app_env;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Tracer, TracerProvider};
use opentelemetry_sdk::{Resource, runtime};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::filter::FromEnvError;
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// The name of the client as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "tasks-client";

/// OpenTelemetry primitives which export spans to a tracing server
pub struct OtelExporter {
    pub provider: TracerProvider,
    pub tracer: Tracer,
}

impl OtelExporter {
    /// Flushes any spans still waiting in the batch exporter. The provider blocks while it
    /// flushes, so it runs off the runtime thread that drives the gRPC channel.
    pub async fn shutdown(self) {
        let provider = self.provider;
        match tokio::task::spawn_blocking(move || provider.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("Failed to flush spans on shutdown: {err}"),
            Err(err) => warn!("Span flush did not complete: {err}"),
        }
    }
}

/// Awaits [work], then flushes spans through [otel_exporter] whether or not [work] succeeded
pub async fn flush_spans_after<T>(
    otel_exporter: Option<OtelExporter>,
    work: impl Future<Output = T>,
) -> T {
    let outcome = work.await;
    if let Some(exporter) = otel_exporter {
        exporter.shutdown().await;
    }

    outcome
}

/// Instantiates an OpenTelemetry span exporter which runs in the background and sends tracing
/// data to an opentelemetry-compatible gRPC endpoint (typically http://localhost:4317 with a
/// standard sidecar setup)
pub fn init_exporter(otlp_traces_endpoint: &str) -> Result<OtelExporter, anyhow::Error> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_traces_endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::TokioCurrentThread)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();
    let tracer = provider.tracer(SERVICE_NAME);
    global::set_tracer_provider(provider.clone());

    Ok(OtelExporter { provider, tracer })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> Result<EnvFilter, FromEnvError> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
}

/// Sets up the global logging and tracing sinks. Everything at the "debug" level and above is
/// sent to OpenTelemetry if [otel_exporter] is provided. [env_filter] applies only to the JSON
/// logger, which writes to stderr so it stays out of the shell's own output.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporter: Option<&OtelExporter>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    registry()
        .with(LevelFilter::DEBUG)
        .with(otel_exporter.map(|exporter| OpenTelemetryLayer::new(exporter.tracer.clone())))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();
}
