//! ScrapeVision core: result model, derived views, and the pure job state machine.
mod aggregate;
mod effect;
mod export;
mod filter;
mod job;
mod msg;
mod record;
mod state;
mod update;
mod view;
mod view_model;

pub use aggregate::{compute_average_confidence, compute_star_histogram, StarConfidence, StarCount};
pub use effect::Effect;
pub use export::{to_csv, CSV_HEADER, EXPORT_FILENAME, EXPORT_MIME_TYPE};
pub use filter::{filter, Criterion, FilterCriteria};
pub use job::{
    CrawlMethod, Generation, JobError, JobParams, JobState, PollPolicy, RemoteStatus,
    RequestFailure, StatusReport, SubmitRequest, JOB_FAILED_MESSAGE, NETWORK_ERROR_MESSAGE,
    STATUS_FETCH_ERROR_MESSAGE, SUBMIT_SERVER_ERROR_MESSAGE,
};
pub use msg::Msg;
pub use record::{Label, LabelValue, ResultRecord, SentimentLabel, StarLabel};
pub use state::ControllerState;
pub use update::update;
pub use view::{ActiveView, ViewSelector};
pub use view_model::JobSnapshot;
