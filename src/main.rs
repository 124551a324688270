//! discus CLI entry point.

use clap::Parser;
use discus::cli::commands;
use discus::cli::{Cli, Commands};
use discus::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Sync {
            source,
            dry_run,
            page_size,
            max_records,
        } => commands::sync::execute(cli, source.as_deref(), *dry_run, *page_size, *max_records),
        Commands::Status => commands::status::execute(cli),
        Commands::List { category, keys } => commands::record::list(cli, category, *keys),
        Commands::Show { category, slug } => commands::record::show(cli, category, slug),
        Commands::Delete { category, slug } => commands::record::delete(cli, category, slug),
        Commands::Completions { shell } => commands::completions::execute(*shell),
        Commands::Version => commands::version::execute(cli.json),
    }
}
