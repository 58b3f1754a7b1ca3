use anyhow::{Context, Result};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, Resource};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Telemetry configuration structure
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub otlp_endpoint: Option<String>,
    pub enable_tracing: bool,
    pub export_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: std::env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
            enable_tracing: std::env::var("OTEL_TRACES_ENABLED")
                .map(|v| v.parse().unwrap_or(true))
                .unwrap_or(true),
            export_timeout: Duration::from_secs(30),
        }
    }
}

/// Keeps the exporter alive until [`TelemetryHandles::shutdown`] flushes it
pub struct TelemetryHandles {
    exporting: bool,
}

impl TelemetryHandles {
    pub async fn shutdown(self) -> Result<()> {
        if self.exporting {
            info!("Flushing pending spans before exit");
            global::shutdown_tracer_provider();
        }
        Ok(())
    }
}

/// Install the tracing subscriber and, when an OTLP endpoint is configured,
/// the span exporter.
pub async fn init_telemetry(config: Option<TelemetryConfig>) -> Result<TelemetryHandles> {
    let config = config.unwrap_or_default();

    setup_tracing_subscriber()?;

    info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        "Initializing telemetry"
    );

    let exporting = config.enable_tracing && init_tracing(&config)?;

    Ok(TelemetryHandles { exporting })
}

fn create_resource(config: &TelemetryConfig) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ])
}

/// Returns whether an exporter was installed.
fn init_tracing(config: &TelemetryConfig) -> Result<bool> {
    let Some(endpoint) = &config.otlp_endpoint else {
        info!("No OTLP endpoint configured, spans stay local");
        return Ok(false);
    };

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint)
                .with_timeout(config.export_timeout),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::config()
                .with_resource(create_resource(config))
                .with_sampler(opentelemetry_sdk::trace::Sampler::AlwaysOn),
        )
        .install_batch(runtime::Tokio)
        .context("Failed to initialize OTLP tracer")?;

    info!(endpoint = %endpoint, "Distributed tracing initialized with OTLP exporter");
    Ok(true)
}

fn setup_tracing_subscriber() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into());

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

/// Named source of counters and histograms.
///
/// Instruments currently report through `tracing` at debug level; no metrics
/// exporter is wired.
pub fn get_meter(name: &str) -> Meter {
    Meter {
        name: name.to_string(),
    }
}

#[derive(Debug)]
pub struct Meter {
    name: String,
}

impl Meter {
    pub fn u64_counter(&self, name: &str) -> InstrumentBuilder<Counter> {
        InstrumentBuilder::new(&self.name, name)
    }

    pub fn f64_histogram(&self, name: &str) -> InstrumentBuilder<Histogram> {
        InstrumentBuilder::new(&self.name, name)
    }
}

#[derive(Debug)]
pub struct InstrumentBuilder<T> {
    meter: String,
    name: String,
    description: Option<String>,
    _kind: std::marker::PhantomData<T>,
}

impl<T> InstrumentBuilder<T> {
    fn new(meter: &str, name: &str) -> Self {
        Self {
            meter: meter.to_string(),
            name: name.to_string(),
            description: None,
            _kind: std::marker::PhantomData,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl InstrumentBuilder<Counter> {
    pub fn build(self) -> Counter {
        Counter {
            meter: self.meter,
            name: self.name,
            description: self.description,
        }
    }
}

impl InstrumentBuilder<Histogram> {
    pub fn build(self) -> Histogram {
        Histogram {
            meter: self.meter,
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug)]
pub struct Counter {
    meter: String,
    name: String,
    description: Option<String>,
}

impl Counter {
    pub fn add(&self, value: u64, attributes: &[KeyValue]) {
        tracing::debug!(
            meter = %self.meter,
            counter = %self.name,
            description = self.description.as_deref().unwrap_or_default(),
            value,
            attributes = ?attributes,
            "Counter incremented"
        );
    }
}

#[derive(Debug)]
pub struct Histogram {
    meter: String,
    name: String,
    description: Option<String>,
}

impl Histogram {
    pub fn record(&self, value: f64, attributes: &[KeyValue]) {
        tracing::debug!(
            meter = %self.meter,
            histogram = %self.name,
            description = self.description.as_deref().unwrap_or_default(),
            value,
            attributes = ?attributes,
            "Histogram recorded"
        );
    }
}

/// Health flags reported by `/health`
pub fn telemetry_health_check() -> HashMap<String, bool> {
    let mut health = HashMap::new();
    health.insert("tracer_provider".to_string(), true);
    health.insert(
        "otlp_exporter".to_string(),
        std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok(),
    );
    health
}
