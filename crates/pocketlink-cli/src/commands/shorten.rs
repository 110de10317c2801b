use crate::app::App;
use crate::row::parse_rows;
use anyhow::bail;
use pocketlink_core::time::format_time_remaining;
use pocketlink_generator::Generator;
use pocketlink_shortener::{RowInput, RowResult, Shortener, MAX_BATCH_ROWS};
use pocketlink_storage::KvBackend;
use serde_json::{json, Value};
use std::io::Write;
use std::process::ExitCode;

pub fn run<B: KvBackend, G: Generator>(
    app: &App<B, G>,
    lines: &[String],
    as_json: bool,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let rows: Vec<RowInput> = parse_rows(lines)?
        .into_iter()
        .filter(|row| !row.is_blank())
        .collect();

    if rows.is_empty() {
        bail!("nothing to shorten: every row is blank");
    }
    if rows.len() > MAX_BATCH_ROWS {
        bail!(
            "at most {MAX_BATCH_ROWS} rows can be shortened at once, got {}",
            rows.len()
        );
    }

    let results = app.shortener.create_short_urls(&rows);

    if as_json {
        let report: Vec<Value> = results
            .iter()
            .map(|result| json_result(app, result))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        let now = app.clock.now();
        for (index, (row, result)) in rows.iter().zip(&results).enumerate() {
            let n = index + 1;
            match result {
                Ok(created) => writeln!(
                    out,
                    "[{n}] {} -> {} (expires {}, {})",
                    app.short_url(&created.shortcode),
                    created.long_url,
                    created.expires_at,
                    format_time_remaining(created.expires_at, now),
                )?,
                Err(e) => writeln!(out, "[{n}] {}: {e}", row.url.trim())?,
            }
        }
    }

    if results.iter().all(Result::is_err) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn json_result<B: KvBackend, G: Generator>(app: &App<B, G>, result: &RowResult) -> Value {
    match result {
        Ok(created) => json!({
            "ok": true,
            "shortUrl": app.short_url(&created.shortcode),
            "shortcode": created.shortcode,
            "longUrl": created.long_url,
            "createdAt": created.created_at,
            "expiresAt": created.expires_at,
        }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{harness, output};
    use pocketlink_core::{ReadRepository, ShortCode};

    fn lines(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn reports_each_row_in_order() {
        let h = harness();
        let mut out = Vec::new();

        let code = run(
            &h.app,
            &lines(&["https://a.com", "", "not-a-url", "https://b.com - ab"]),
            false,
            &mut out,
        )
        .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        let output = output(out);
        let printed: Vec<&str> = output.lines().collect();
        assert_eq!(
            printed,
            [
                "[1] http://localhost:3000/pl000000 -> https://a.com (expires 2026-10-16T12:30:00Z, 30m remaining)",
                "[2] not-a-url: Invalid URL. Must start with http(s).",
                "[3] https://b.com: Shortcode must be 3–20 chars, alphanumeric, - or _.",
            ]
        );
        assert!(h
            .app
            .repository
            .is_shortcode_taken(&ShortCode::new_unchecked("pl000000")));
    }

    #[test]
    fn fails_when_every_row_fails() {
        let h = harness();
        let mut out = Vec::new();

        let code = run(&h.app, &lines(&["nope", "https://a.com 0"]), false, &mut out).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(output(out).contains("Validity must be an integer"));
    }

    #[test]
    fn storage_outage_fails_every_row() {
        let h = harness();
        h.backend.set_available(false);
        let mut out = Vec::new();

        let code = run(&h.app, &lines(&["https://a.com", "https://b.com 60"]), false, &mut out)
            .unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        let output = output(out);
        assert!(output.contains("[1] https://a.com: Failed to save URL. Please try again."));
        assert!(output.contains("[2] https://b.com: Failed to save URL. Please try again."));
        assert!(h.backend.raw(pocketlink_storage::STORAGE_KEY).is_none());
        assert!(h.sink.find("shorten_row_save_failed").is_some());
    }

    #[test]
    fn rejects_oversized_and_empty_batches() {
        let h = harness();

        let six = lines(&["https://a.com"; 6]);
        let err = run(&h.app, &six, false, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("at most 5 rows"));

        let err = run(&h.app, &lines(&["", "  "]), false, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("every row is blank"));
        assert!(h.app.repository.get_all().urls.is_empty());
    }

    #[test]
    fn json_report() {
        let h = harness();
        let mut out = Vec::new();

        run(
            &h.app,
            &lines(&["https://a.com 120 launch", "https://a.com 120 launch"]),
            true,
            &mut out,
        )
        .unwrap();

        let report: Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(report[0]["ok"], true);
        assert_eq!(report[0]["shortUrl"], "http://localhost:3000/launch");
        assert_eq!(report[0]["expiresAt"], "2026-10-16T14:00:00Z");
        assert_eq!(report[1]["ok"], false);
        assert_eq!(report[1]["error"], "Shortcode already in use.");
    }
}
