// Entrypoint for the CLI application.
// - Parses flags, installs logging and runs exactly one command.
// - Any error is reported by anyhow and exits non-zero.

use clap::Parser;
use webpurify_cli::cli::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())?;
    Ok(())
}
