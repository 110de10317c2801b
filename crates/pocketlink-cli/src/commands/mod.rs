//! One module per subcommand. Each writes its report to `out` and returns
//! the process exit code.

pub mod check;
pub mod purge;
pub mod shorten;
pub mod stats;
pub mod visit;
