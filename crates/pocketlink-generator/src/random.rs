use crate::{Generator, DEFAULT_LENGTH};
use pocketlink_core::ShortCode;
use rand::Rng;
use typed_builder::TypedBuilder;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Samples `len` characters uniformly from `[a-zA-Z0-9]`.
///
/// Uses the thread-local RNG; the result is not checked against anything
/// and may collide with existing codes.
pub fn generate_shortcode(len: usize) -> ShortCode {
    let mut rng = rand::rng();
    let code: String = (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    ShortCode::new_unchecked(code)
}

/// A generator of random alphanumeric codes.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        generate_shortcode(self.length)
    }
}
