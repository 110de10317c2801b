use crate::outcome::RedirectOutcome;
use crate::request::RedirectRequest;

pub trait Redirector: Send + Sync + 'static {
    /// Resolves a request to its terminal state, recording a click when the
    /// entry is live. Never navigates.
    fn resolve(&self, request: &RedirectRequest) -> RedirectOutcome;
}
