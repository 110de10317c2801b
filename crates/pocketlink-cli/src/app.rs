use anyhow::Context;
use pocketlink_core::{Clock, EventLogger, Locale, ShortCode, SystemClock, SystemLocale};
use pocketlink_generator::{Generator, RandomGenerator};
use pocketlink_redirector::RedirectorService;
use pocketlink_shortener::ShortenerService;
use pocketlink_storage::{DocumentRepository, FileBackend, KvBackend};
use pocketlink_telemetry::TracingSink;
use std::path::Path;
use std::sync::Arc;

pub type SharedRepository<B> = Arc<DocumentRepository<B>>;

/// Everything a command needs, wired over one shared repository.
pub struct App<B, G> {
    pub repository: SharedRepository<B>,
    pub shortener: ShortenerService<SharedRepository<B>, G>,
    pub redirector: RedirectorService<SharedRepository<B>>,
    pub clock: Arc<dyn Clock>,
    pub logger: EventLogger,
    base_url: String,
}

impl App<FileBackend, RandomGenerator> {
    /// Opens the store in `data_dir` with the system clock and locale, and
    /// events routed to `tracing`.
    pub fn open(data_dir: &Path, base_url: &str) -> anyhow::Result<Self> {
        let backend = FileBackend::open(data_dir)
            .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;

        Ok(Self::new(
            backend,
            RandomGenerator::default(),
            Arc::new(SystemClock),
            Arc::new(SystemLocale),
            EventLogger::new(Arc::new(TracingSink)),
            base_url,
        ))
    }
}

impl<B: KvBackend, G: Generator> App<B, G> {
    pub fn new(
        backend: B,
        generator: G,
        clock: Arc<dyn Clock>,
        locale: Arc<dyn Locale>,
        logger: EventLogger,
        base_url: impl Into<String>,
    ) -> Self {
        let repository = Arc::new(
            DocumentRepository::new(backend)
                .with_clock(clock.clone())
                .with_logger(logger.clone()),
        );
        let shortener = ShortenerService::new(repository.clone(), generator)
            .with_clock(clock.clone())
            .with_logger(logger.clone());
        let redirector = RedirectorService::new(repository.clone())
            .with_clock(clock.clone())
            .with_locale(locale)
            .with_logger(logger.clone());

        Self {
            repository,
            shortener,
            redirector,
            clock,
            logger,
            base_url: base_url.into(),
        }
    }

    pub fn short_url(&self, code: &ShortCode) -> String {
        code.to_url(&self.base_url)
    }
}
