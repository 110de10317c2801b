use pocketlink_core::UrlEntry;
use std::fmt::{self, Display};

pub const NO_SHORTCODE_MESSAGE: &str = "No shortcode provided";
pub const PROCESSING_ERROR_MESSAGE: &str = "An error occurred while processing the redirect";

/// Terminal state of a redirect.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectOutcome {
    /// The entry is live. `click_recorded` is `false` if recording the click
    /// failed; navigation goes ahead regardless.
    Redirect { long_url: String, click_recorded: bool },
    NotFound { shortcode: String },
    /// The entry exists but `now >= expires_at`. It is kept so the caller
    /// can offer to recreate the link.
    Expired { entry: UrlEntry },
    Error { message: String },
}

impl RedirectOutcome {
    pub(crate) fn error(message: &str) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

impl Display for RedirectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect { long_url, .. } => write!(f, "Redirecting to {long_url}"),
            Self::NotFound { .. } => write!(f, "Short URL not found"),
            Self::Expired { entry } => {
                write!(f, "Link expired (original URL: {})", entry.long_url)
            }
            Self::Error { message } => write!(f, "{message}"),
        }
    }
}
