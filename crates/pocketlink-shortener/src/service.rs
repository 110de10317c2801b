use crate::error::ShortenerError;
use crate::row::{CreatedUrl, RowInput, RowResult};
use crate::shortener::Shortener;
use pocketlink_core::time::add_minutes;
use pocketlink_core::validate::{is_valid_http_url, parse_validity_minutes};
use pocketlink_core::{Clock, EventLogger, Repository, ShortCode, SystemClock, UrlEntry};
use pocketlink_generator::{generate_unique, Generator, DEFAULT_MAX_ATTEMPTS};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Tunables of the shortening service.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// Validity used when a row leaves it blank.
    #[builder(default = 30)]
    pub default_validity_minutes: u32,
    /// Candidates tried before auto-generation gives up.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL and validity validation
/// - custom shortcode checks, or collision-checked code generation
/// - expiry computation and persistence
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
    clock: Arc<dyn Clock>,
    logger: EventLogger,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings, the system
    /// clock and no event logging.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings: ShortenerSettings::default(),
            clock: Arc::new(SystemClock),
            logger: EventLogger::noop(),
        }
    }

    pub fn with_settings(mut self, settings: ShortenerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: EventLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Uses the requested code if it is valid and free, otherwise generates
    /// one.
    fn pick_code(&self, requested: Option<&str>) -> Result<ShortCode, ShortenerError> {
        if let Some(requested) = requested {
            let code = ShortCode::new(requested).inspect_err(|_| {
                self.logger
                    .warn("shorten_row_invalid_shortcode", json!({ "code": requested }));
            })?;

            if self.repository.is_shortcode_taken(&code) {
                self.logger
                    .warn("shorten_row_shortcode_collision", json!({ "code": code }));
                return Err(ShortenerError::AliasConflict(code));
            }
            return Ok(code);
        }

        let attempts = self.settings.max_attempts;
        generate_unique(
            self.generator.as_ref(),
            |candidate| self.repository.is_shortcode_taken(candidate),
            attempts,
        )
        .ok_or_else(|| {
            self.logger
                .error("shorten_row_generation_failure", json!({}));
            ShortenerError::GenerationExhausted { attempts }
        })
    }
}

impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    fn shorten(&self, row: &RowInput) -> Result<CreatedUrl, ShortenerError> {
        let url = row.url.trim();
        let validity = row.validity.as_deref().map(str::trim);
        let requested = row
            .shortcode
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if !is_valid_http_url(url) {
            self.logger
                .warn("shorten_row_invalid_url", json!({ "url": url }));
            return Err(ShortenerError::InvalidUrl(url.to_string()));
        }

        let minutes = parse_validity_minutes(validity)
            .inspect_err(|_| {
                self.logger.warn(
                    "shorten_row_invalid_validity",
                    json!({ "validityStr": validity }),
                );
            })?
            .unwrap_or(self.settings.default_validity_minutes);

        let shortcode = self.pick_code(requested)?;
        trace!(code = %shortcode, minutes, "short code chosen");

        let created_at = self.clock.now();
        let expires_at = add_minutes(created_at, minutes)?;
        let entry = UrlEntry::new(shortcode.clone(), url, created_at, expires_at);

        self.repository.upsert_url_entry(entry).inspect_err(|_| {
            self.logger
                .error("shorten_row_save_failed", json!({ "shortcode": shortcode }));
        })?;

        debug!(code = %shortcode, url, "shortened url");
        self.logger.info(
            "shorten_row_success",
            json!({ "shortcode": shortcode, "url": url, "minutes": minutes }),
        );

        Ok(CreatedUrl {
            shortcode,
            long_url: url.to_string(),
            created_at,
            expires_at,
        })
    }

    fn create_short_urls(&self, rows: &[RowInput]) -> Vec<RowResult> {
        self.logger
            .info("shorten_batch_attempt", json!({ "count": rows.len() }));
        rows.iter().map(|row| self.shorten(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};
    use pocketlink_core::{FixedClock, RecordingSink, StorageError};
    use pocketlink_generator::{RandomGenerator, SeqGenerator};
    use pocketlink_storage::{DocumentRepository, InMemoryBackend, ReadRepository};

    type TestRepo = Arc<DocumentRepository<Arc<InMemoryBackend>>>;

    struct Fixture {
        repo: TestRepo,
        backend: Arc<InMemoryBackend>,
        sink: Arc<RecordingSink>,
        clock: FixedClock,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(InMemoryBackend::new());
        let clock = FixedClock::new("2026-10-16T12:00:00Z".parse::<Timestamp>().unwrap());
        let sink = Arc::new(RecordingSink::new());
        let repo = Arc::new(
            DocumentRepository::new(backend.clone()).with_clock(Arc::new(clock.clone())),
        );
        Fixture {
            repo,
            backend,
            sink,
            clock,
        }
    }

    fn service<G: Generator>(f: &Fixture, generator: G) -> ShortenerService<TestRepo, G> {
        ShortenerService::new(f.repo.clone(), generator)
            .with_clock(Arc::new(f.clock.clone()))
            .with_logger(EventLogger::new(f.sink.clone()))
    }

    fn row(url: &str) -> RowInput {
        RowInput::builder().url(url).build()
    }

    #[test]
    fn shorten_with_auto_generated_code() {
        let f = fixture();
        let service = service(&f, RandomGenerator::default());

        let created = service.shorten(&row("https://example.com")).unwrap();

        assert_eq!(created.shortcode.as_str().len(), 7);
        assert_eq!(created.long_url, "https://example.com");
        assert_eq!(created.created_at, f.clock.now());
        assert_eq!(
            created.expires_at,
            f.clock.now() + SignedDuration::from_mins(30)
        );
        assert!(f.repo.is_shortcode_taken(&created.shortcode));
    }

    #[test]
    fn stored_entry_starts_without_clicks() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        let created = service.shorten(&row("https://example.com")).unwrap();

        let stored = f.repo.get_by_shortcode(&created.shortcode).unwrap();
        assert_eq!(stored.clicks, 0);
        assert!(stored.click_events.is_empty());
        assert_eq!(stored.expires_at, created.expires_at);
    }

    #[test]
    fn shorten_with_custom_code_and_validity() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        let created = service
            .shorten(
                &RowInput::builder()
                    .url("  https://example.com/page  ")
                    .validity(" 90 ")
                    .shortcode(" my-alias ")
                    .build(),
            )
            .unwrap();

        assert_eq!(created.shortcode.as_str(), "my-alias");
        assert_eq!(created.long_url, "https://example.com/page");
        assert_eq!(
            created.expires_at,
            created.created_at + SignedDuration::from_mins(90)
        );
    }

    #[test]
    fn blank_validity_and_shortcode_fall_back_to_defaults() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        let created = service
            .shorten(
                &RowInput::builder()
                    .url("https://example.com")
                    .validity("")
                    .shortcode("   ")
                    .build(),
            )
            .unwrap();

        assert_eq!(created.shortcode.as_str(), "wh000000");
        assert_eq!(
            created.expires_at,
            created.created_at + SignedDuration::from_mins(30)
        );
    }

    #[test]
    fn configured_default_validity() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh")).with_settings(
            ShortenerSettings::builder()
                .default_validity_minutes(5)
                .build(),
        );

        let created = service.shorten(&row("https://example.com")).unwrap();
        assert_eq!(
            created.expires_at,
            created.created_at + SignedDuration::from_mins(5)
        );
        assert_eq!(service.settings().max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn invalid_url_fails() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        let err = service.shorten(&row("not-a-valid-url")).unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));
        assert_eq!(err.to_string(), "Invalid URL. Must start with http(s).");

        let event = f.sink.find("shorten_row_invalid_url").unwrap();
        assert_eq!(event.payload["url"], "not-a-valid-url");
    }

    #[test]
    fn invalid_validity_fails() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        for bad in ["0", "7201", "ten", "-1"] {
            let err = service
                .shorten(
                    &RowInput::builder()
                        .url("https://example.com")
                        .validity(bad)
                        .build(),
                )
                .unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidValidity(_)), "{bad}");
        }
        assert!(f.repo.get_all().urls.is_empty());
        assert!(f.sink.find("shorten_row_invalid_validity").is_some());
    }

    #[test]
    fn invalid_custom_code_fails() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        let err = service
            .shorten(
                &RowInput::builder()
                    .url("https://example.com")
                    .shortcode("a.b")
                    .build(),
            )
            .unwrap_err();

        assert_eq!(err, ShortenerError::InvalidShortCode("a.b".to_string()));
        assert!(f.sink.find("shorten_row_invalid_shortcode").is_some());
    }

    #[test]
    fn duplicate_custom_code_fails() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));
        let aliased = |url: &str| {
            RowInput::builder()
                .url(url)
                .shortcode("my-alias")
                .build()
        };

        service.shorten(&aliased("https://example1.com")).unwrap();
        let err = service.shorten(&aliased("https://example2.com")).unwrap_err();

        assert!(matches!(err, ShortenerError::AliasConflict(_)));
        assert_eq!(err.to_string(), "Shortcode already in use.");
        // the first mapping is untouched
        let stored = f
            .repo
            .get_by_shortcode(&ShortCode::new_unchecked("my-alias"))
            .unwrap();
        assert_eq!(stored.long_url, "https://example1.com");
    }

    #[test]
    fn expired_but_unswept_code_is_still_taken() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));
        let aliased = RowInput::builder()
            .url("https://example.com")
            .validity("1")
            .shortcode("short-lived")
            .build();

        service.shorten(&aliased).unwrap();
        f.clock.advance(SignedDuration::from_mins(5));

        let err = service.shorten(&aliased).unwrap_err();
        assert!(matches!(err, ShortenerError::AliasConflict(_)));
    }

    #[test]
    fn generation_skips_taken_codes() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));
        service
            .shorten(
                &RowInput::builder()
                    .url("https://example.com")
                    .shortcode("wh000000")
                    .build(),
            )
            .unwrap();

        let created = service.shorten(&row("https://example.com")).unwrap();
        assert_eq!(created.shortcode.as_str(), "wh000001");
    }

    #[test]
    fn generation_exhaustion_does_not_touch_storage() {
        let f = fixture();
        // a cloned generator replays the same sequence, so every candidate
        // it produces is already taken
        let seed = SeqGenerator::with_prefix("wh");
        let first = service(&f, seed.clone());
        for _ in 0..DEFAULT_MAX_ATTEMPTS {
            first.shorten(&row("https://example.com")).unwrap();
        }
        let before = f.backend.raw(pocketlink_storage::STORAGE_KEY);

        let second = service(&f, seed);
        let err = second.shorten(&row("https://example.com")).unwrap_err();

        assert_eq!(
            err,
            ShortenerError::GenerationExhausted {
                attempts: DEFAULT_MAX_ATTEMPTS
            }
        );
        assert_eq!(
            err.to_string(),
            "Failed to generate a unique shortcode. Try again."
        );
        assert_eq!(f.backend.raw(pocketlink_storage::STORAGE_KEY), before);
        assert!(f.sink.find("shorten_row_generation_failure").is_some());
    }

    #[test]
    fn persistence_failure_is_a_row_error() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));
        f.backend.set_available(false);

        let err = service.shorten(&row("https://example.com")).unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Unavailable(_))
        ));
        assert_eq!(err.to_string(), "Failed to save URL. Please try again.");
        assert!(f.sink.find("shorten_row_save_failed").is_some());
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let f = fixture();
        let service = service(&f, RandomGenerator::default());
        let rows = vec![
            row("https://a.com"),
            row("not-a-url"),
            RowInput::builder()
                .url("https://b.com")
                .shortcode("ab")
                .build(),
        ];

        let results = service.create_short_urls(&rows);

        assert_eq!(results.len(), 3);
        let created = results[0].as_ref().unwrap();
        assert_eq!(created.long_url, "https://a.com");
        assert_eq!(created.shortcode.as_str().len(), 7);
        assert_eq!(
            created.expires_at,
            created.created_at + SignedDuration::from_mins(30)
        );
        assert!(results[1]
            .as_ref()
            .unwrap_err()
            .to_string()
            .starts_with("Invalid URL"));
        assert!(results[2]
            .as_ref()
            .unwrap_err()
            .to_string()
            .starts_with("Shortcode must be 3–20 chars"));

        assert_eq!(f.repo.get_all().urls.len(), 1);
        let event = f.sink.find("shorten_batch_attempt").unwrap();
        assert_eq!(event.payload["count"], 3);
    }

    #[test]
    fn batch_with_conflicts_inside_the_same_batch() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));
        let aliased = |url: &str| {
            RowInput::builder()
                .url(url)
                .shortcode("shared")
                .build()
        };

        let results =
            service.create_short_urls(&[aliased("https://a.com"), aliased("https://b.com")]);

        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ShortenerError::AliasConflict(_))
        ));
    }

    #[test]
    fn success_event_carries_code_url_and_minutes() {
        let f = fixture();
        let service = service(&f, SeqGenerator::with_prefix("wh"));

        service
            .shorten(
                &RowInput::builder()
                    .url("https://example.com")
                    .validity("15")
                    .build(),
            )
            .unwrap();

        let event = f.sink.find("shorten_row_success").unwrap();
        assert_eq!(event.payload["shortcode"], "wh000000");
        assert_eq!(event.payload["url"], "https://example.com");
        assert_eq!(event.payload["minutes"], 15);
    }
}
