use clap::{Parser, Subcommand, ValueEnum};
use pocketlink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "POCKETLINK_DATA_DIR";
pub const BASE_URL_ENV: &str = "POCKETLINK_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "POCKETLINK_LOG_FORMAT";
pub const LOG_FILTER_ENV: &str = "POCKETLINK_LOG";

pub const DEFAULT_DATA_DIR: &str = ".pocketlink";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "plain")]
    Plain,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Plain => write!(f, "plain"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Plain => LogFormat::Plain,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pocketlink", version, about = "Local short links with expiry and click stats")]
pub struct CLI {
    /// Directory holding the store document.
    #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Origin that short codes are appended to when printing short URLs.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Plain
    )]
    pub log_format: LogFormatArg,

    /// Filter directive for diagnostics on stderr. `RUST_LOG` wins if set.
    #[arg(long, env = LOG_FILTER_ENV, default_value = DEFAULT_LOG_FILTER)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten up to five rows of the form "URL [MINUTES|-] [SHORTCODE]".
    Shorten {
        #[arg(required = true)]
        rows: Vec<String>,

        /// Print the results as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate rows without storing anything.
    Check {
        #[arg(required = true)]
        rows: Vec<String>,
    },
    /// Follow a short URL path such as "/abc1234?src=qr".
    Visit {
        path: String,

        #[arg(long)]
        referrer: Option<String>,
    },
    /// Sweep expired links, then list the rest with their clicks.
    Stats {
        /// Show the click history of one short code.
        #[arg(long, value_name = "SHORTCODE")]
        clicks: Option<String>,
    },
    /// Remove every expired link.
    Purge,
}
