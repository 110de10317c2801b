use std::sync::Arc;

use crate::navigator::Navigator;
use crate::outcome::{RedirectOutcome, NO_SHORTCODE_MESSAGE, PROCESSING_ERROR_MESSAGE};
use crate::redirector::Redirector;
use crate::request::RedirectRequest;
use pocketlink_core::{
    ClickEvent, Clock, EventLogger, Geo, Locale, Repository, ShortCode, SystemClock,
    SystemLocale,
};
use serde_json::json;
use tracing::{debug, trace, warn};

/// Service for handling visits to short URLs.
///
/// Looks entries up, checks expiry against the injected clock and records a
/// click for every live hit.
#[derive(Clone)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    locale: Arc<dyn Locale>,
    logger: EventLogger,
}

impl<R: Repository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository, the system
    /// clock and locale, and no event logging.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            clock: Arc::new(SystemClock),
            locale: Arc::new(SystemLocale),
            logger: EventLogger::noop(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_locale(mut self, locale: Arc<dyn Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_logger(mut self, logger: EventLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Resolves a request. See [`Redirector::resolve`].
    pub fn resolve(&self, request: &RedirectRequest) -> RedirectOutcome {
        Redirector::resolve(self, request)
    }

    /// Parses `path` and resolves it. A path that cannot be parsed ends in
    /// the generic error state.
    pub fn resolve_path(&self, path: &str, referrer: Option<&str>) -> RedirectOutcome {
        match RedirectRequest::from_path(path) {
            Ok(mut request) => {
                request.referrer = referrer.map(str::to_owned);
                self.resolve(&request)
            }
            Err(e) => {
                warn!(path, error = %e, "unparsable redirect path");
                self.logger.error(
                    "redirect_error",
                    json!({ "shortcode": path, "error": e.to_string() }),
                );
                RedirectOutcome::error(PROCESSING_ERROR_MESSAGE)
            }
        }
    }

    /// Resolves the request and, on a live hit, navigates to the long URL.
    /// The click has already been recorded (or failed to) by then.
    pub fn visit<N: Navigator + ?Sized>(
        &self,
        request: &RedirectRequest,
        navigator: &N,
    ) -> RedirectOutcome {
        navigate_on_redirect(self.resolve(request), navigator)
    }

    /// [`Self::resolve_path`] followed by navigation on a live hit.
    pub fn visit_path<N: Navigator + ?Sized>(
        &self,
        path: &str,
        referrer: Option<&str>,
        navigator: &N,
    ) -> RedirectOutcome {
        navigate_on_redirect(self.resolve_path(path, referrer), navigator)
    }

    /// Builds the click event for a visit happening now.
    pub fn build_click_event(&self, source: &str, referrer: Option<&str>) -> ClickEvent {
        ClickEvent {
            timestamp: self.clock.now(),
            source: source.to_string(),
            geo: Geo {
                region: self.locale.time_zone(),
                ..Geo::default()
            },
            referrer: referrer
                .filter(|r| !r.trim().is_empty())
                .map(str::to_owned),
        }
    }
}

fn navigate_on_redirect<N: Navigator + ?Sized>(
    outcome: RedirectOutcome,
    navigator: &N,
) -> RedirectOutcome {
    if let RedirectOutcome::Redirect { long_url, .. } = &outcome {
        navigator.navigate(long_url);
    }
    outcome
}

impl<R: Repository> Redirector for RedirectorService<R> {
    fn resolve(&self, request: &RedirectRequest) -> RedirectOutcome {
        let Some(raw) = request.shortcode.as_deref().filter(|c| !c.is_empty()) else {
            trace!("redirect without a short code");
            return RedirectOutcome::error(NO_SHORTCODE_MESSAGE);
        };

        self.logger
            .info("redirect_page_load", json!({ "shortcode": raw }));

        // malformed codes can never be stored, so they simply miss
        let code = ShortCode::new_unchecked(raw);
        let Some(entry) = self.repository.get_by_shortcode(&code) else {
            trace!(code = %code, "short code not found");
            self.logger
                .warn("redirect_not_found", json!({ "shortcode": code }));
            return RedirectOutcome::NotFound {
                shortcode: raw.to_string(),
            };
        };

        if entry.is_expired(self.clock.now()) {
            debug!(code = %code, "entry has expired");
            self.logger.warn(
                "redirect_expired",
                json!({ "shortcode": code, "expiresAt": entry.expires_at }),
            );
            return RedirectOutcome::Expired { entry };
        }

        let source = request.source_or_default();
        let event = self.build_click_event(source, request.referrer());
        let click_recorded = match self.repository.record_click(&code, event) {
            Ok(total) => {
                trace!(code = %code, total, "click recorded");
                true
            }
            Err(e) => {
                warn!(code = %code, error = %e, "failed to record click");
                self.logger.error(
                    "redirect_click_record_failed",
                    json!({ "shortcode": code, "error": e.to_string() }),
                );
                false
            }
        };

        debug!(code = %code, url = %entry.long_url, "resolved short code");
        self.logger.info(
            "redirect_success",
            json!({ "shortcode": code, "longUrl": entry.long_url, "source": source }),
        );

        RedirectOutcome::Redirect {
            long_url: entry.long_url,
            click_recorded,
        }
    }
}
