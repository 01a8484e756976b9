//! `scrapevision`: submit a crawl for sentiment analysis and report the results.

use std::process::ExitCode;

use clap::Parser;

mod app;
mod cli;
mod config;
mod error;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    match app::run(args).await {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
