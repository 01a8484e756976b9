use std::sync::Arc;

use crate::aggregate::{compute_average_confidence, compute_star_histogram, StarConfidence, StarCount};
use crate::filter::{filter, FilterCriteria};
use crate::job::{Generation, JobState};
use crate::record::ResultRecord;

/// Read-only view of the controller at one point in time.
///
/// The result list is shared, never copied, so holding a snapshot is cheap
/// and it cannot change underneath a render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobSnapshot {
    pub state: JobState,
    pub job_id: Option<String>,
    pub last_error: Option<String>,
    pub results: Arc<Vec<ResultRecord>>,
    pub generation: Generation,
    pub poll_attempts: u32,
}

impl JobSnapshot {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn histogram(&self) -> [StarCount; 5] {
        compute_star_histogram(&self.results)
    }

    pub fn average_confidence(&self) -> [StarConfidence; 5] {
        compute_average_confidence(&self.results)
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<&ResultRecord> {
        filter(&self.results, criteria)
    }

    pub fn to_csv(&self) -> String {
        crate::export::to_csv(&self.results)
    }
}
