use std::time::Duration;

use scrapevision_logging::{sv_debug, sv_info, sv_warn};
use url::Url;

use crate::job::{JobError, JobState, RemoteStatus, SubmitRequest, JOB_FAILED_MESSAGE};
use crate::{ControllerState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ControllerState, msg: Msg) -> (ControllerState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitRequested { url, params } => {
            if state.job_state().is_active() {
                sv_warn!(
                    "Submit ignored: job generation {} is still {}",
                    state.generation(),
                    state.job_state()
                );
                return (state, Vec::new());
            }
            let generation = state.begin_submission();
            match validate_start_url(&url) {
                Ok(url) => vec![Effect::SubmitJob {
                    generation,
                    request: SubmitRequest { url, params },
                }],
                Err(reason) => {
                    state.fail(JobError::Submission(reason));
                    Vec::new()
                }
            }
        }
        Msg::SubmitAccepted { generation, job_id } => {
            if !state.accepts(generation, JobState::Submitting) {
                // The user moved on while the job was being created; the remote
                // job would otherwise run unobserved.
                sv_info!(
                    "Stale acceptance for job {} (generation {}), canceling it remotely",
                    job_id,
                    generation
                );
                return (state, vec![Effect::CancelRemote { job_id }]);
            }
            state.start_polling(job_id.clone());
            schedule_poll(&mut state, job_id, Duration::ZERO)
        }
        Msg::SubmitRejected {
            generation,
            failure,
        } => {
            if !state.accepts(generation, JobState::Submitting) {
                sv_debug!("Discarding stale submit failure for generation {}", generation);
                return (state, Vec::new());
            }
            sv_warn!("Submit failed: {}", failure);
            state.fail(JobError::Submission(failure.submission_message()));
            state.clear_results();
            Vec::new()
        }
        Msg::StatusReceived { generation, report } => {
            if !state.accepts(generation, JobState::Polling) {
                sv_debug!("Discarding stale status for generation {}", generation);
                return (state, Vec::new());
            }
            if let Some(error) = report.error.filter(|message| !message.is_empty()) {
                state.fail(JobError::Polling(error));
                return (state, vec![Effect::StopPolling { generation }]);
            }
            state.replace_results(report.results);
            match report.status {
                RemoteStatus::Completed => {
                    state.complete();
                    vec![Effect::StopPolling { generation }]
                }
                RemoteStatus::Failed => {
                    state.fail(JobError::JobFailed(JOB_FAILED_MESSAGE.to_string()));
                    vec![Effect::StopPolling { generation }]
                }
                RemoteStatus::Pending | RemoteStatus::Other(_) => {
                    let Some(job_id) = state.job_id().map(str::to_owned) else {
                        return (state, Vec::new());
                    };
                    let interval = state.policy().interval;
                    schedule_poll(&mut state, job_id, interval)
                }
            }
        }
        Msg::PollFailed {
            generation,
            failure,
        } => {
            if !state.accepts(generation, JobState::Polling) {
                sv_debug!("Discarding stale poll failure for generation {}", generation);
                return (state, Vec::new());
            }
            sv_warn!("Status poll failed: {}", failure);
            state.fail(JobError::Polling(failure.polling_message()));
            vec![Effect::StopPolling { generation }]
        }
        Msg::CancelRequested => {
            if !state.job_state().is_active() {
                return (state, Vec::new());
            }
            let generation = state.generation();
            let mut effects = vec![Effect::StopPolling { generation }];
            if let Some(job_id) = state.cancel_locally() {
                effects.push(Effect::CancelRemote { job_id });
            }
            effects
        }
        Msg::ResetRequested => {
            let generation = state.generation();
            let was_active = state.job_state().is_active();
            state.reset();
            if was_active {
                vec![Effect::StopPolling { generation }]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Issue the next status check, or fail the job once the poll budget is spent.
fn schedule_poll(state: &mut ControllerState, job_id: String, delay: Duration) -> Vec<Effect> {
    let generation = state.generation();
    if state.try_consume_poll_attempt() {
        return vec![Effect::FetchStatus {
            generation,
            job_id,
            delay,
        }];
    }
    let attempts = state.poll_attempts();
    state.fail(JobError::Polling(format!(
        "Gave up waiting for job after {attempts} status checks."
    )));
    vec![
        Effect::StopPolling { generation },
        Effect::CancelRemote { job_id },
    ]
}

fn validate_start_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Please enter a start URL.".to_string());
    }
    let parsed = Url::parse(trimmed).map_err(|err| format!("Invalid URL {trimmed:?}: {err}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(format!("Unsupported URL scheme {other:?}.")),
    }
}
