use anyhow::bail;
use pocketlink_shortener::RowInput;

/// Placeholder for "use the default validity" when a shortcode follows.
const DEFAULT_VALIDITY: &str = "-";

/// Parses `"URL [MINUTES|-] [SHORTCODE]"` into a row.
///
/// Fields are whitespace separated. A blank line gives a blank row, which
/// callers drop.
pub fn parse_row(line: &str) -> anyhow::Result<RowInput> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (url, validity, shortcode) = match fields.as_slice() {
        [] => ("", None, None),
        [url] => (*url, None, None),
        [url, validity] => (*url, Some(*validity), None),
        [url, validity, shortcode] => (*url, Some(*validity), Some(*shortcode)),
        _ => bail!("row '{line}' has more than three fields"),
    };

    Ok(RowInput {
        url: url.to_string(),
        validity: validity
            .filter(|v| *v != DEFAULT_VALIDITY)
            .map(str::to_owned),
        shortcode: shortcode.map(str::to_owned),
    })
}

pub fn parse_rows(lines: &[String]) -> anyhow::Result<Vec<RowInput>> {
    lines.iter().map(|line| parse_row(line)).collect()
}
