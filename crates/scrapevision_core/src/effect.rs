use std::time::Duration;

use crate::job::{Generation, SubmitRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create the remote job; reply with `SubmitAccepted` or `SubmitRejected`.
    SubmitJob {
        generation: Generation,
        request: SubmitRequest,
    },
    /// Wait `delay`, then poll status; reply with `StatusReceived` or `PollFailed`.
    FetchStatus {
        generation: Generation,
        job_id: String,
        delay: Duration,
    },
    /// Revoke any scheduled or in-flight poll for `generation`.
    StopPolling { generation: Generation },
    /// Fire-and-forget remote cancel; failures are only logged.
    CancelRemote { job_id: String },
}
