use crate::job::{Generation, JobParams, RequestFailure, StatusReport};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked to analyse a URL.
    SubmitRequested { url: String, params: JobParams },
    /// The service accepted the job created for `generation`.
    SubmitAccepted {
        generation: Generation,
        job_id: String,
    },
    /// Job creation for `generation` failed.
    SubmitRejected {
        generation: Generation,
        failure: RequestFailure,
    },
    /// A status poll for `generation` returned.
    StatusReceived {
        generation: Generation,
        report: StatusReport,
    },
    /// A status poll for `generation` produced no usable reply.
    PollFailed {
        generation: Generation,
        failure: RequestFailure,
    },
    /// User canceled the active job.
    CancelRequested,
    /// User dismissed the finished job.
    ResetRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
