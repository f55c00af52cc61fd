//! swagcheck CLI: run the storefront scenarios
//!
//! ## Usage
//!
//! ```bash
//! swagcheck run --env stage --browser chrome --headless
//! swagcheck run --simulate --filter AUTH
//! swagcheck run --browser firefox --webdriver-url http://localhost:4444
//! swagcheck list
//! swagcheck envs --config config.json
//! ```
//!
//! Exit code 0 when every selected scenario passed, 1 when some failed,
//! 2 when the run could not start.

use clap::Parser;
use std::process::ExitCode;
use swagcheck_cli::{Cli, CliResult, Commands, Output};

fn main() -> ExitCode {
    let cli = Cli::parse();
    set_log_level(&cli);
    let out = Output::new(cli.color, cli.quiet);
    match execute(&cli, &out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute(cli: &Cli, out: &Output) -> CliResult<()> {
    match cli.command {
        Commands::Run(ref args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(swagcheck::SwagError::from)?;
            runtime.block_on(swagcheck_cli::run(args, out))
        }
        Commands::List(ref args) => swagcheck_cli::list(args, out),
        Commands::Envs(ref args) => swagcheck_cli::envs(args, out),
    }
}

/// `-v`/`-q` pick a log level unless `RUST_LOG` is already set
fn set_log_level(cli: &Cli) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "swagcheck=debug,info",
        (false, _) => "debug",
    };
    std::env::set_var("RUST_LOG", level);
}
