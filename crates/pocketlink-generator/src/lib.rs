//! Short code generation.
//!
//! Generators only produce candidates; they never look at storage. Callers
//! that need a code nobody holds yet go through [`generate_unique`] (or
//! [`generate_unique_shortcode`]) with an "is taken" predicate backed by
//! their repository.

pub mod random;
pub mod seq;

pub use random::{generate_shortcode, RandomGenerator};
pub use seq::SeqGenerator;

use pocketlink_core::ShortCode;
use tracing::{debug, trace};

/// Length of auto-generated short codes.
pub const DEFAULT_LENGTH: usize = 7;

/// How many candidates are tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Trait for generating short code candidates.
///
/// Implementations are pure generators that don't interact with storage.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate. Candidates may collide.
    fn generate(&self) -> ShortCode;
}

/// Draws candidates from `generator` until one is not taken.
///
/// Makes at least one attempt and at most `max_attempts`. Returns `None`
/// if every candidate was taken.
pub fn generate_unique<G, F>(generator: &G, is_taken: F, max_attempts: usize) -> Option<ShortCode>
where
    G: Generator + ?Sized,
    F: FnMut(&ShortCode) -> bool,
{
    let mut is_taken = is_taken;
    for attempt in 1..=max_attempts.max(1) {
        let candidate = generator.generate();
        if !is_taken(&candidate) {
            trace!(code = %candidate, attempt, "generated unique short code");
            return Some(candidate);
        }
        debug!(code = %candidate, attempt, "short code candidate already taken");
    }
    None
}

/// Random variant of [`generate_unique`] producing codes of `len`
/// characters.
pub fn generate_unique_shortcode<F>(is_taken: F, len: usize, max_attempts: usize) -> Option<ShortCode>
where
    F: FnMut(&ShortCode) -> bool,
{
    let generator = RandomGenerator::builder().length(len).build();
    generate_unique(&generator, is_taken, max_attempts)
}
