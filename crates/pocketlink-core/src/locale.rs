use jiff::tz::TimeZone;

/// Read-only view of the visitor's locale.
///
/// Only the time zone is exposed; it is the sole "geo" signal recorded
/// with a click.
pub trait Locale: Send + Sync {
    /// IANA identifier of the local time zone, e.g. `Europe/Oslo`.
    fn time_zone(&self) -> Option<String>;
}

/// The host's configured time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl Locale for SystemLocale {
    fn time_zone(&self) -> Option<String> {
        TimeZone::system().iana_name().map(str::to_owned)
    }
}

/// A locale with a preset time zone.
#[derive(Debug, Clone, Default)]
pub struct FixedLocale {
    time_zone: Option<String>,
}

impl FixedLocale {
    pub fn new(time_zone: impl Into<String>) -> Self {
        Self {
            time_zone: Some(time_zone.into()),
        }
    }

    /// A locale whose time zone cannot be determined.
    pub fn unknown() -> Self {
        Self { time_zone: None }
    }
}

impl Locale for FixedLocale {
    fn time_zone(&self) -> Option<String> {
        self.time_zone.clone()
    }
}
