use crate::row::parse_rows;
use pocketlink_core::validate::validate_row;
use std::io::Write;
use std::process::ExitCode;

/// Reports the validation errors of each row, the same checks the shortener
/// applies before touching storage. Codes are not checked for availability.
pub fn run(lines: &[String], out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let mut all_valid = true;

    for (index, row) in parse_rows(lines)?.iter().enumerate() {
        let n = index + 1;
        let errors = validate_row(
            &row.url,
            row.validity.as_deref(),
            row.shortcode.as_deref(),
        );

        if errors.is_empty() {
            writeln!(out, "[{n}] ok")?;
        } else {
            all_valid = false;
            for error in errors {
                writeln!(out, "[{n}] {error}")?;
            }
        }
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
