use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use fim::cli::{Cli, Commands};
use fim::output::{self, Verbosity};
use fim::{FimContext, commands};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        output::error(&format!("{e:#}"));
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "fim=debug" } else { "off" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        verbose,
        quiet,
        database,
        config,
        fingerprint,
    } = cli;

    output::set_verbosity(Verbosity::from_flags(quiet, verbose));

    let context = || -> Result<FimContext> {
        Ok(FimContext::new(config.clone())?.with_overrides(database.clone(), fingerprint))
    };

    match command {
        Commands::Init { directory } => commands::init::execute(&context()?, &directory),
        Commands::Check { directory } => commands::check::execute(&context()?, &directory),
        Commands::List => commands::list::execute(&context()?),
        Commands::Config { key, value } => {
            // Saved settings come from the file alone, not from this run's overrides
            let mut ctx = FimContext::new(config.clone())?;
            commands::config::execute(&mut ctx, key.as_deref(), value.as_deref())
        }
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
