use std::io;
use std::path::PathBuf;
use std::process;

use crate::formats::FormatError;

/// Exit codes for the CLI. Usage errors (exit code 2) are reported by clap.
pub const EXIT_ERROR: i32 = 1;

/// Unified error type for CLI operations.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Neither format sniffer recognized the file.
    #[error("file format of {} not recognized", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The file looks like a known format but its header is damaged.
    #[error("{} is not a valid {format} file: {source}", path.display())]
    Malformed {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: FormatError,
    },

    /// Writing the tree to stdout failed.
    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    tracing::debug!(target: skope_core::logging::targets::CLI, error = ?err, "exiting with error");
    eprintln!("error: {err}");
    process::exit(EXIT_ERROR)
}
