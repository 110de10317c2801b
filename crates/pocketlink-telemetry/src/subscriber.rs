use thiserror::Error;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install the global subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

pub fn build_json_subscriber<Sink>(
    env_filter: EnvFilter,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let formatting_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(sink);

    layered_subscriber(env_filter).with(formatting_layer)
}

pub fn build_plain_subscriber<Sink>(
    env_filter: EnvFilter,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(sink);

    layered_subscriber(env_filter).with(formatting_layer)
}

pub fn try_init_subscriber(
    subscriber: impl Subscriber + Send + Sync + 'static,
) -> Result<(), TelemetryError> {
    set_global_default(subscriber)?;
    Ok(())
}

/// Installs the global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`; an unparsable
/// `default_filter` falls back to `warn`.
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<(), TelemetryError> {
    let env_filter = env_filter(default_filter);
    match format {
        LogFormat::Plain => try_init_subscriber(build_plain_subscriber(env_filter, std::io::stderr)),
        LogFormat::Json => try_init_subscriber(build_json_subscriber(env_filter, std::io::stderr)),
    }
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn layered_subscriber(env_filter: EnvFilter) -> Layered<EnvFilter, Registry> {
    Registry::default().with(env_filter)
}
