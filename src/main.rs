use anyhow::Result;
use clap::Parser;
use classpath_check::cli::{Cli, OutputFormat};
use classpath_check::engine::{self, CheckOptions, CheckOutcome};
use classpath_check::scan::expand_archives;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(outcome) => {
            if let Err(err) = write_outcome(&outcome, cli.format) {
                eprintln!("classpath-check: {err:#}");
                std::process::exit(1);
            }
        }
        Err(err) => {
            // Hard failure: the archive set itself is unusable. Report a
            // diagnostic and a conservative verdict, per the CLI contract.
            eprintln!("classpath-check: {err:#}");
            println!("false");
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<CheckOutcome> {
    let archives = expand_archives(&cli.archives)?;
    let options = CheckOptions {
        threads: cli.threads,
    };
    let outcome = engine::check_dependencies_with(&cli.class_name, &archives, &options)?;
    Ok(outcome)
}

fn write_outcome(outcome: &CheckOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", outcome.sufficient),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "entry_class": outcome.entry_class,
                "sufficient": outcome.sufficient,
                "classes_visited": outcome.classes_visited,
                "dependencies_found": outcome.dependencies.len(),
                "duration_ms": outcome.duration_ms,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
