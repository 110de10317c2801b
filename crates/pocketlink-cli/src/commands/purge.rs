use crate::app::App;
use pocketlink_core::Repository;
use pocketlink_generator::Generator;
use pocketlink_storage::KvBackend;
use std::io::Write;
use std::process::ExitCode;

pub fn run<B: KvBackend, G: Generator>(
    app: &App<B, G>,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let removed = app.repository.delete_expired()?;
    writeln!(
        out,
        "Removed {removed} expired {}",
        if removed == 1 { "link" } else { "links" }
    )?;
    Ok(ExitCode::SUCCESS)
}
