use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use pathgraph::PathgraphError;
use pathgraph_cli::{Args, error_adapter::ErrorAdapter};

/// Parses the requested level, falling back to `warn` on a typo.
fn init_logging(level: &str) -> LevelFilter {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    log_level
}

/// Renders `err` as a miette report, or as its plain message if rendering fails.
fn render_error(err: &PathgraphError) -> String {
    let mut rendered = String::new();
    match miette::GraphicalReportHandler::new().render_report(&mut rendered, &ErrorAdapter(err)) {
        Ok(()) => rendered,
        Err(_) => err.to_string(),
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let log_level = init_logging(&args.log_level);
    debug!(log_level:?, args:?; "Checking diagram document");

    match pathgraph_cli::run(&args) {
        Ok(()) => info!(input_path = args.input.as_str(); "Diagram checked"),
        Err(err) => {
            error!("Check failed\n{}", render_error(&err));
            process::exit(1);
        }
    }
}
