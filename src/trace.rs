//! Log output and, when an OTLP collector is configured, span and metric export.

use std::time::Duration;

use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{TonicExporterBuilder, WithExportConfig};
use opentelemetry_sdk::{
	metrics::{
		reader::{DefaultAggregationSelector, DefaultTemporalitySelector},
		MeterProviderBuilder, PeriodicReader, SdkMeterProvider,
	},
	runtime,
	trace::{BatchConfig, Sampler, Tracer},
	Resource,
};
use opentelemetry_semantic_conventions::{
	resource::{DEPLOYMENT_ENVIRONMENT, SERVICE_NAME, SERVICE_VERSION},
	SCHEMA_URL,
};
use tracing::level_filters::LevelFilter;
use tracing_opentelemetry::MetricsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const METRICS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("metrics exporter: {0}")]
	Metrics(#[from] opentelemetry::metrics::MetricsError),
	#[error("trace exporter: {0}")]
	Trace(#[from] opentelemetry::trace::TraceError),
	#[error("subscriber: {0}")]
	Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

fn environment() -> &'static str {
	if cfg!(debug_assertions) {
		"development"
	} else {
		"production"
	}
}

/// Describes this service on every exported span and metric.
fn resource() -> Resource {
	Resource::from_schema_url(
		[
			KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
			KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
			KeyValue::new(DEPLOYMENT_ENVIRONMENT, environment()),
		],
		SCHEMA_URL,
	)
}

fn exporter(endpoint: &str) -> TonicExporterBuilder {
	opentelemetry_otlp::new_exporter()
		.tonic()
		.with_endpoint(endpoint)
}

fn meter_provider(endpoint: &str) -> Result<SdkMeterProvider, Error> {
	let exporter = exporter(endpoint).build_metrics_exporter(
		Box::new(DefaultAggregationSelector::new()),
		Box::new(DefaultTemporalitySelector::new()),
	)?;

	let reader = PeriodicReader::builder(exporter, runtime::Tokio)
		.with_interval(METRICS_INTERVAL)
		.build();

	let provider = MeterProviderBuilder::default()
		.with_resource(resource())
		.with_reader(reader)
		.build();

	global::set_meter_provider(provider.clone());

	Ok(provider)
}

fn tracer(endpoint: &str) -> Result<Tracer, Error> {
	let tracer = opentelemetry_otlp::new_pipeline()
		.tracing()
		.with_trace_config(
			opentelemetry_sdk::trace::Config::default()
				.with_sampler(Sampler::AlwaysOn)
				.with_resource(resource()),
		)
		.with_batch_config(BatchConfig::default())
		.with_exporter(exporter(endpoint))
		.install_batch(runtime::Tokio)?;

	Ok(tracer)
}

/// Installs the global subscriber.
///
/// Logs at `level` and above always go to stdout. With an `otlp_endpoint`,
/// spans and metrics are exported too, until the returned [`Telemetry`] is dropped.
pub fn init_tracing_subscriber(
	level: LevelFilter,
	otlp_endpoint: Option<&str>,
) -> Result<Telemetry, Error> {
	let fmt = tracing_subscriber::fmt::layer().with_ansi(true);
	let registry = tracing_subscriber::registry().with(level).with(fmt);

	let Some(endpoint) = otlp_endpoint else {
		registry.try_init()?;

		return Ok(Telemetry {
			meter_provider: None,
		});
	};

	let meter_provider = meter_provider(endpoint)?;

	registry
		.with(MetricsLayer::new(meter_provider.clone()))
		.with(tracing_opentelemetry::layer().with_tracer(tracer(endpoint)?))
		.try_init()?;

	tracing::info!(endpoint, "exporting telemetry");

	Ok(Telemetry {
		meter_provider: Some(meter_provider),
	})
}

/// Flushes exported telemetry on drop.
pub struct Telemetry {
	meter_provider: Option<SdkMeterProvider>,
}

impl Drop for Telemetry {
	fn drop(&mut self) {
		let Some(meter_provider) = self.meter_provider.take() else {
			return;
		};

		if let Err(error) = meter_provider.shutdown() {
			eprintln!("failed to flush metrics: {error:?}");
		}

		global::shutdown_tracer_provider();
	}
}
