//! Redirect resolution for PocketLink short codes.
//!
//! [`RedirectorService`] turns a [`RedirectRequest`] into one of the
//! terminal [`RedirectOutcome`]s. On a live hit it records a click before
//! handing the long URL to a [`Navigator`].
//!
//! ```rust
//! use pocketlink_redirector::{RedirectOutcome, RedirectRequest, RedirectorService};
//! use pocketlink_storage::{DocumentRepository, InMemoryBackend};
//!
//! let service = RedirectorService::new(DocumentRepository::new(InMemoryBackend::new()));
//! let request = RedirectRequest::from_path("/abc123?src=qr").unwrap();
//!
//! match service.resolve(&request) {
//!     RedirectOutcome::Redirect { long_url, .. } => println!("go to {long_url}"),
//!     other => println!("{other}"),
//! }
//! ```

pub mod navigator;
pub mod outcome;
pub mod redirector;
pub mod request;
pub mod service;

pub use navigator::Navigator;
pub use outcome::RedirectOutcome;
pub use redirector::Redirector;
pub use request::{RedirectRequest, DEFAULT_SOURCE};
pub use service::RedirectorService;
