use anyhow::Context;
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, metrics::SdkMeterProvider, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const SERVICE_NAME: &str = "user-service";

struct Providers {
    tracer: SdkTracerProvider,
    meter: SdkMeterProvider,
}

/// Handle to the installed exporters, flushed by [`Telemetry::shutdown`].
pub struct Telemetry {
    providers: Option<Providers>,
}

/// Installs the global `tracing` subscriber. Spans and metrics are also
/// exported over OTLP when `otlp_endpoint` is given.
pub fn init(otlp_endpoint: Option<&str>) -> anyhow::Result<Telemetry> {
    let providers = otlp_endpoint.map(init_providers).transpose()?;

    let otel_layer = providers
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = otlp_endpoint {
        tracing::info!(%endpoint, "Exporting telemetry over OTLP");
    }

    Ok(Telemetry { providers })
}

fn init_providers(endpoint: &str) -> anyhow::Result<Providers> {
    let resource = Resource::builder().with_service_name(SERVICE_NAME).build();

    let span_exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("Failed to create OTLP span exporter")?;

    let tracer = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();

    let metric_exporter = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("Failed to create OTLP metric exporter")?;

    let meter = SdkMeterProvider::builder()
        .with_periodic_exporter(metric_exporter)
        .with_resource(resource)
        .build();

    global::set_tracer_provider(tracer.clone());
    global::set_meter_provider(meter.clone());

    Ok(Providers { tracer, meter })
}

impl Telemetry {
    pub fn shutdown(self) {
        let Some(providers) = self.providers else {
            return;
        };

        if let Err(err) = providers.tracer.shutdown() {
            tracing::warn!(%err, "Failed to flush spans");
        }
        if let Err(err) = providers.meter.shutdown() {
            tracing::warn!(%err, "Failed to flush metrics");
        }
    }
}
