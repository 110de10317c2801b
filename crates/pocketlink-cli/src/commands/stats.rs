use crate::app::App;
use anyhow::bail;
use pocketlink_core::time::format_time_remaining;
use pocketlink_core::{ReadRepository, Repository, ShortCode, UrlEntry};
use pocketlink_generator::Generator;
use pocketlink_storage::KvBackend;
use serde_json::json;
use std::io::Write;
use std::process::ExitCode;
use tracing::warn;

/// Sweeps expired links, then lists the rest newest first, or the click
/// history of `clicks_for`.
pub fn run<B: KvBackend, G: Generator>(
    app: &App<B, G>,
    clicks_for: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    // a failed sweep still leaves something worth listing
    if let Err(e) = app.repository.delete_expired() {
        warn!(error = %e, "expiry sweep failed");
        app.logger
            .error("stats_load_failed", json!({ "error": e.to_string() }));
    }

    match clicks_for {
        Some(code) => print_clicks(app, code, out)?,
        None => print_entries(app, out)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn print_entries<B: KvBackend, G: Generator>(
    app: &App<B, G>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let doc = app.repository.get_all();
    let entries = doc.newest_first();
    app.logger
        .info("stats_urls_loaded", json!({ "count": entries.len() }));

    if entries.is_empty() {
        writeln!(out, "No short URLs yet")?;
        return Ok(());
    }

    let now = app.clock.now();
    writeln!(out, "{:<20} {:>6}  {:<18} LINK", "SHORTCODE", "CLICKS", "EXPIRES")?;
    for entry in entries {
        writeln!(
            out,
            "{:<20} {:>6}  {:<18} {} -> {}",
            entry.shortcode.as_str(),
            entry.clicks,
            format_time_remaining(entry.expires_at, now),
            app.short_url(&entry.shortcode),
            entry.long_url,
        )?;
    }
    Ok(())
}

fn print_clicks<B: KvBackend, G: Generator>(
    app: &App<B, G>,
    code: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(entry) = app
        .repository
        .get_by_shortcode(&ShortCode::new_unchecked(code))
    else {
        bail!("no short URL with code '{code}'");
    };
    app.logger
        .info("stats_view_clicks", json!({ "shortcode": entry.shortcode }));

    writeln!(
        out,
        "{} -> {}",
        app.short_url(&entry.shortcode),
        entry.long_url
    )?;
    writeln!(out, "{}", click_summary(&entry))?;
    for event in &entry.click_events {
        writeln!(
            out,
            "{}  {:<12} {:<20} {}",
            event.timestamp,
            event.source,
            event.geo.region.as_deref().unwrap_or("-"),
            event.referrer.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

fn click_summary(entry: &UrlEntry) -> String {
    match entry.clicks {
        1 => "1 click".to_string(),
        n => format!("{n} clicks"),
    }
}
