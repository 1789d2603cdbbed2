// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! Motel Traffic CLI
//!
//! Runs one traffic task against the motel and reservation APIs

use clap::Parser;
use motel_traffic::cli::{Cli, Runner};
use motel_traffic::{Error, LogFormat, LogLevel};
use tracing_subscriber::EnvFilter;

fn init_logging(level: LogLevel, format: LogFormat) {
    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(tracing::Level::from(level).into())
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    let runner = Runner::new(cli);
    if let Err(e) = runner.run().await {
        match e {
            Error::UnknownTask { task, valid } => {
                eprintln!("Error: unknown task '{task}'");
                eprintln!("Valid tasks: {valid}");
                std::process::exit(2);
            }
            e => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
