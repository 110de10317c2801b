//! Core types and traits for the PocketLink URL shortener.
//!
//! This crate holds the data model shared by the shortener and the
//! redirector, the input validators, and the collaborator traits
//! (clock, locale, event log, repository) that the services are built on.

pub mod clock;
pub mod error;
pub mod event_log;
pub mod locale;
pub mod model;
pub mod repository;
pub mod shortcode;
pub mod time;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, StorageError};
pub use event_log::{EventLogger, EventSink, Level, RecordedEvent, RecordingSink};
pub use locale::{FixedLocale, Locale, SystemLocale};
pub use model::{ClickEvent, Geo, Meta, StoreDocument, UrlEntry};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
