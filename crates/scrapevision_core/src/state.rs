use std::sync::Arc;

use scrapevision_logging::{sv_info, sv_warn};

use crate::job::{Generation, JobError, JobState, PollPolicy};
use crate::record::ResultRecord;
use crate::view_model::JobSnapshot;

/// Everything the controller owns about the current job.
///
/// Only [`crate::update`] mutates it; observers get [`JobSnapshot`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    policy: PollPolicy,
    generation: Generation,
    job_state: JobState,
    job_id: Option<String>,
    last_error: Option<JobError>,
    results: Arc<Vec<ResultRecord>>,
    poll_attempts: u32,
    dirty: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PollPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> JobSnapshot {
        JobSnapshot {
            state: self.job_state,
            job_id: self.job_id.clone(),
            last_error: self.last_error.as_ref().map(|err| err.message().to_string()),
            results: Arc::clone(&self.results),
            generation: self.generation,
            poll_attempts: self.poll_attempts,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn job_state(&self) -> JobState {
        self.job_state
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn last_error(&self) -> Option<&JobError> {
        self.last_error.as_ref()
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn poll_attempts(&self) -> u32 {
        self.poll_attempts
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// A reply tagged with `generation` may be applied only while that job is
    /// still waiting on the service.
    pub(crate) fn accepts(&self, generation: Generation, expected: JobState) -> bool {
        generation == self.generation && self.job_state == expected
    }

    pub(crate) fn begin_submission(&mut self) -> Generation {
        self.clear_job();
        self.job_state = JobState::Submitting;
        sv_info!("Job generation {} submitting", self.generation);
        self.generation
    }

    pub(crate) fn start_polling(&mut self, job_id: String) {
        sv_info!(
            "Job {} accepted (generation {}), polling",
            job_id,
            self.generation
        );
        self.job_id = Some(job_id);
        self.job_state = JobState::Polling;
        self.mark_dirty();
    }

    /// Count one more status check; `false` once the budget is spent.
    pub(crate) fn try_consume_poll_attempt(&mut self) -> bool {
        if let Some(max) = self.policy.max_attempts {
            if self.poll_attempts >= max {
                return false;
            }
        }
        self.poll_attempts += 1;
        self.mark_dirty();
        true
    }

    pub(crate) fn replace_results(&mut self, results: Vec<ResultRecord>) {
        if results.len() < self.results.len() {
            sv_warn!(
                "Job {:?} snapshot shrank from {} to {} records",
                self.job_id,
                self.results.len(),
                results.len()
            );
        }
        if results.as_slice() != self.results.as_slice() {
            self.results = Arc::new(results);
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_results(&mut self) {
        if !self.results.is_empty() {
            self.results = Arc::default();
            self.mark_dirty();
        }
    }

    pub(crate) fn complete(&mut self) {
        sv_info!(
            "Job {:?} completed with {} records",
            self.job_id,
            self.results.len()
        );
        self.job_state = JobState::Completed;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, error: JobError) {
        sv_warn!("Job {:?} failed: {:?}", self.job_id, error);
        self.job_state = JobState::Failed;
        self.last_error = Some(error);
        self.mark_dirty();
    }

    /// Drop the job locally; returns the remote id if one was issued.
    pub(crate) fn cancel_locally(&mut self) -> Option<String> {
        let job_id = self.job_id.take();
        self.clear_job();
        self.job_state = JobState::CanceledLocally;
        sv_info!(
            "Job {:?} canceled locally (now generation {})",
            job_id,
            self.generation
        );
        job_id
    }

    pub(crate) fn reset(&mut self) {
        if self.job_state == JobState::Idle && self.job_id.is_none() && self.results.is_empty()
        {
            return;
        }
        self.clear_job();
        self.job_state = JobState::Idle;
    }

    /// Forget the current job and move to a fresh generation.
    fn clear_job(&mut self) {
        self.generation += 1;
        self.job_id = None;
        self.last_error = None;
        self.poll_attempts = 0;
        self.results = Arc::default();
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
