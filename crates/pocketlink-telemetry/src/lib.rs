//! Logging setup for PocketLink binaries.
//!
//! [`init_tracing`] installs the global `tracing` subscriber, and
//! [`TracingSink`] forwards the services' domain events into it.

pub mod sink;
pub mod subscriber;

pub use sink::{TracingSink, EVENT_TARGET};
pub use subscriber::{
    build_json_subscriber, build_plain_subscriber, init_tracing, try_init_subscriber, LogFormat,
    TelemetryError,
};
