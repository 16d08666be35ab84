mod app;
mod cli;
mod error;
mod formats;

use std::io::Write;

use clap::Parser;
use cli::Cli;
use error::{CliError, exit_with_error};
use skope_core::TreeFormatOptions;

fn init_tracing(cli: &Cli) {
    // --quiet silences everything, --verbose honours RUST_LOG (info if unset),
    // otherwise only warnings reach stderr so stdout stays a clean tree.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        exit_with_error(e);
    }
}

fn run(cli: Cli) -> error::CliResult<()> {
    let mut app = app::App::load(&cli.file)?;
    app.expand(cli.depth);
    tracing::info!(
        target: skope_core::logging::targets::CLI,
        path = %app.path().display(),
        format = %app.format(),
        blocks = app.model().block_count(),
        "rendering tree"
    );

    let options = TreeFormatOptions::default()
        .with_style(cli.style.into())
        .with_header(!cli.no_header);
    let tree = app.render(options);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{tree}").map_err(CliError::Output)?;
    stdout.flush().map_err(CliError::Output)
}
