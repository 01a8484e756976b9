use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use scrapevision_core::{FilterCriteria, JobSnapshot, JobState, ViewSelector};
use scrapevision_engine::{export_csv, Controller, ExportError, ReqwestJobApi};
use scrapevision_logging::{sv_info, sv_warn};

use crate::cli::Args;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::render::{progress_line, render_view};

/// How a run ended, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Canceled,
}

impl Outcome {
    pub fn from_state(state: JobState) -> Self {
        match state {
            JobState::Completed => Outcome::Completed,
            JobState::CanceledLocally => Outcome::Canceled,
            _ => Outcome::Failed,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Outcome::Completed => 0,
            Outcome::Failed => 1,
            Outcome::Canceled => 130,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

pub async fn run(args: Args) -> Result<Outcome> {
    let criteria = args.filter_criteria()?;
    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(api_base) = &args.api_base {
        config.api_base_url = api_base.clone();
    }
    scrapevision_logging::initialize(config.log_destination, config.level_filter()?);

    let api = ReqwestJobApi::new(config.client_settings()).map_err(AppError::from)?;
    let controller = Controller::spawn(Arc::new(api), config.poll_policy());
    sv_info!("Using analysis service at {}", config.api_base_url);

    let snapshot = drive(&controller, &args).await;
    controller.shutdown().await;

    let outcome = Outcome::from_state(snapshot.state);
    match outcome {
        Outcome::Completed => {
            print_results(&snapshot, &args, &criteria);
            if let Some(dir) = &args.export {
                export(dir, &snapshot)?;
            }
        }
        Outcome::Failed => {
            eprintln!(
                "Job failed: {}",
                snapshot.last_error.as_deref().unwrap_or("unknown error")
            );
        }
        Outcome::Canceled => eprintln!("Job canceled."),
    }
    Ok(outcome)
}

/// Submit the job and follow it until it leaves the active states.
///
/// Ctrl-C cancels the job; the remote cancel runs in the background.
async fn drive(controller: &Controller, args: &Args) -> JobSnapshot {
    let mut rx = controller.subscribe();
    let mut snapshot = controller.submit(args.url.clone(), args.job_params()).await;
    println!("{}", progress_line(&snapshot));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;

    while snapshot.state.is_active() {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = rx.borrow_and_update().clone();
                if next != snapshot {
                    println!("{}", progress_line(&next));
                    snapshot = next;
                }
            }
            signal = &mut ctrl_c, if listening => {
                listening = false;
                match signal {
                    Ok(()) => {
                        sv_info!("Interrupted, canceling job");
                        snapshot = controller.cancel().await;
                    }
                    Err(err) => sv_warn!("Could not listen for Ctrl-C: {}", err),
                }
            }
        }
    }
    snapshot
}

fn print_results(snapshot: &JobSnapshot, args: &Args, criteria: &FilterCriteria) {
    match ViewSelector::new(args.view.into()).active_for(snapshot) {
        Some(view) => println!("\n{}", render_view(view, snapshot, criteria)),
        None => println!("The job completed without results."),
    }
}

fn export(dir: &Path, snapshot: &JobSnapshot) -> Result<(), AppError> {
    match export_csv(dir, &snapshot.results) {
        Ok(summary) => {
            println!(
                "Exported {} rows to {} ({})",
                summary.rows,
                summary.path.display(),
                summary.mime_type
            );
            Ok(())
        }
        Err(ExportError::NoResults) => {
            sv_warn!("Nothing to export to {:?}", dir);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
