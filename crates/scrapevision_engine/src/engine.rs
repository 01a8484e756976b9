use std::sync::Arc;

use scrapevision_core::{
    update, ControllerState, Effect, Generation, JobParams, JobSnapshot, Msg, PollPolicy,
    RequestFailure,
};
use scrapevision_logging::{sv_debug, sv_info, sv_warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::JobApi;

struct Command {
    msg: Msg,
    /// Present for user commands; answered once the message has been applied.
    ack: Option<oneshot::Sender<JobSnapshot>>,
}

/// Owns one job lifecycle and runs the I/O its state machine asks for.
///
/// All state changes happen on a single actor task; callers send commands and
/// read [`JobSnapshot`]s. Dropping the controller stops the actor and any
/// scheduled polls.
pub struct Controller {
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshot_rx: watch::Receiver<JobSnapshot>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Controller {
    /// Start the controller on the current tokio runtime.
    pub fn spawn(api: Arc<dyn JobApi>, policy: PollPolicy) -> Self {
        let state = ControllerState::with_policy(policy);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.view());
        let shutdown = CancellationToken::new();

        let actor = Actor {
            api,
            state,
            cmd_tx: cmd_tx.clone(),
            snapshot_tx,
            shutdown: shutdown.clone(),
            poll_token: None,
        };
        let task = tokio::spawn(actor.run(cmd_rx));

        Self {
            cmd_tx,
            snapshot_rx,
            shutdown,
            task: Some(task),
        }
    }

    /// Start a job for `url`. Returns the state after the request was issued.
    pub async fn submit(&self, url: impl Into<String>, params: JobParams) -> JobSnapshot {
        self.send(Msg::SubmitRequested {
            url: url.into(),
            params,
        })
        .await
    }

    /// Stop the active job locally and ask the service to drop it.
    pub async fn cancel(&self) -> JobSnapshot {
        self.send(Msg::CancelRequested).await
    }

    /// Return to `Idle`, forgetting the job, its error and its results.
    pub async fn reset(&self) -> JobSnapshot {
        self.send(Msg::ResetRequested).await
    }

    pub fn observe(&self) -> JobSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that is notified whenever the snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until no job is submitting or polling.
    pub async fn wait_for_terminal(&self) -> JobSnapshot {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(|snapshot| !snapshot.state.is_active())
            .await
            .map(|snapshot| snapshot.clone());
        settled.unwrap_or_else(|_| self.observe())
    }

    /// Stop the actor and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                sv_warn!("Controller task ended abnormally: {}", err);
            }
        }
    }

    async fn send(&self, msg: Msg) -> JobSnapshot {
        let (ack_tx, ack_rx) = oneshot::channel();
        let command = Command {
            msg,
            ack: Some(ack_tx),
        };
        if self.cmd_tx.send(command).is_err() {
            return self.observe();
        }
        ack_rx.await.unwrap_or_else(|_| self.observe())
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Actor {
    api: Arc<dyn JobApi>,
    state: ControllerState,
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshot_tx: watch::Sender<JobSnapshot>,
    shutdown: CancellationToken,
    /// Revocation handle for the poll chain of one generation.
    poll_token: Option<(Generation, CancellationToken)>,
}

impl Actor {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                command = cmd_rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }
        if let Some((_, token)) = self.poll_token.take() {
            token.cancel();
        }
        sv_debug!("Controller stopped at generation {}", self.state.generation());
    }

    fn handle(&mut self, command: Command) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, command.msg);
        self.state = state;
        if self.state.consume_dirty() {
            self.snapshot_tx.send_replace(self.state.view());
        }
        for effect in effects {
            self.run_effect(effect);
        }
        if let Some(ack) = command.ack {
            let _ = ack.send(self.state.view());
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SubmitJob {
                generation,
                request,
            } => {
                let api = Arc::clone(&self.api);
                let cmd_tx = self.cmd_tx.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => return,
                        result = api.submit(&request) => result,
                    };
                    let msg = match result {
                        Ok(job_id) => Msg::SubmitAccepted { generation, job_id },
                        Err(err) => Msg::SubmitRejected {
                            generation,
                            failure: RequestFailure::from(err),
                        },
                    };
                    let _ = cmd_tx.send(Command { msg, ack: None });
                });
            }
            Effect::FetchStatus {
                generation,
                job_id,
                delay,
            } => {
                let token = self.poll_token_for(generation);
                let api = Arc::clone(&self.api);
                let cmd_tx = self.cmd_tx.clone();
                tokio::spawn(async move {
                    if !delay.is_zero() {
                        tokio::select! {
                            biased;
                            _ = token.cancelled() => return,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    let result = tokio::select! {
                        biased;
                        _ = token.cancelled() => return,
                        result = api.status(&job_id) => result,
                    };
                    let msg = match result {
                        Ok(report) => Msg::StatusReceived { generation, report },
                        Err(err) => Msg::PollFailed {
                            generation,
                            failure: RequestFailure::from(err),
                        },
                    };
                    let _ = cmd_tx.send(Command { msg, ack: None });
                });
            }
            Effect::StopPolling { generation } => {
                if matches!(&self.poll_token, Some((current, _)) if *current == generation) {
                    if let Some((_, token)) = self.poll_token.take() {
                        token.cancel();
                    }
                }
            }
            Effect::CancelRemote { job_id } => {
                let api = Arc::clone(&self.api);
                tokio::spawn(async move {
                    match api.cancel(&job_id).await {
                        Ok(()) => sv_info!("Remote cancel for job {} acknowledged", job_id),
                        Err(err) => sv_warn!("Remote cancel for job {} failed: {}", job_id, err),
                    }
                });
            }
        }
    }

    /// Token for `generation`'s poll chain; an older chain is revoked first.
    fn poll_token_for(&mut self, generation: Generation) -> CancellationToken {
        match &self.poll_token {
            Some((current, token)) if *current == generation => token.clone(),
            _ => {
                if let Some((_, stale)) = self.poll_token.take() {
                    stale.cancel();
                }
                let token = self.shutdown.child_token();
                self.poll_token = Some((generation, token.clone()));
                token
            }
        }
    }
}
