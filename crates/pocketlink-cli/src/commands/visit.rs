use crate::app::App;
use pocketlink_core::ShortCode;
use pocketlink_generator::Generator;
use pocketlink_redirector::{Navigator, RedirectOutcome};
use pocketlink_storage::KvBackend;
use std::io::Write;
use std::process::ExitCode;

/// "Navigates" by printing the target on stdout, so it can be piped into a
/// browser opener.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&self, long_url: &str) {
        println!("{long_url}");
    }
}

/// Follows `path`. A live link is handed to `navigator`; every other state
/// is described on `out` and exits non-zero.
pub fn run<B: KvBackend, G: Generator>(
    app: &App<B, G>,
    path: &str,
    referrer: Option<&str>,
    navigator: &dyn Navigator,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let outcome = app.redirector.visit_path(path, referrer, navigator);

    match &outcome {
        RedirectOutcome::Redirect { click_recorded, .. } => {
            if !click_recorded {
                writeln!(out, "warning: the click could not be recorded")?;
            }
            return Ok(ExitCode::SUCCESS);
        }
        RedirectOutcome::NotFound { shortcode } => {
            let code = ShortCode::new_unchecked(shortcode.as_str());
            writeln!(out, "{outcome}: {}", app.short_url(&code))?;
        }
        RedirectOutcome::Expired { entry } => {
            writeln!(out, "Link expired at {}", entry.expires_at)?;
            writeln!(out, "Original URL: {}", entry.long_url)?;
            writeln!(
                out,
                "Recreate it with: pocketlink purge && pocketlink shorten \"{} - {}\"",
                entry.long_url, entry.shortcode
            )?;
        }
        RedirectOutcome::Error { .. } => writeln!(out, "{outcome}")?,
    }

    Ok(ExitCode::FAILURE)
}
