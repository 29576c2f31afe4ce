use crate::{
    client::TokenSource,
    error::MonitorError,
    state::{PollSummary, SharedState},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

/// Cancellable refresh timer driving the poll loop.
pub mod schedule;

pub use schedule::RefreshSchedule;

/// Instruction sent to a running poller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum PollerCommand {
    /// Start a poll cycle immediately. The timer is left as it is.
    RefreshNow,
    /// Cancel the pending timer and re-arm it with a new period.
    Reschedule(Duration),
}

/// Fetches snapshots from a [`TokenSource`] and publishes them into [`SharedState`].
///
/// Every trigger runs as an independent cycle. Overlapping cycles are neither deduplicated nor
/// cancelled, so the last one to complete determines the published state.
#[derive(Debug)]
pub struct Poller<Source> {
    source: Arc<Source>,
    state: SharedState,
}

impl<Source> Clone for Poller<Source> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

impl<Source> Poller<Source>
where
    Source: TokenSource + 'static,
{
    pub fn new(source: Source, state: SharedState) -> Self {
        Self {
            source: Arc::new(source),
            state,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Run a single poll cycle to completion.
    ///
    /// The state lock is only taken before and after the fetch, so a completion applies
    /// atomically.
    pub async fn poll_once(&self) -> Result<PollSummary, MonitorError> {
        self.state.write().begin_cycle();
        debug!("token list poll started");

        match self.source.fetch_tokens().await {
            Ok(raw) => Ok(self.state.write().apply_snapshot(raw, Utc::now())),
            Err(error) => {
                self.state.write().apply_failure(error.clone());
                Err(error)
            }
        }
    }

    /// Start an independent poll cycle on the runtime.
    pub fn trigger(&self) -> JoinHandle<Result<PollSummary, MonitorError>> {
        let poller = self.clone();
        tokio::spawn(async move { poller.poll_once().await })
    }

    /// Spawn the poll loop: one cycle at startup, then one per `interval`, plus any requested
    /// through the returned [`PollerHandle`].
    pub fn spawn(self, interval: Duration) -> PollerHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(RefreshSchedule::new(interval), command_rx));

        PollerHandle {
            commands: command_tx,
            task,
        }
    }

    async fn run(
        self,
        mut schedule: RefreshSchedule,
        mut commands: mpsc::UnboundedReceiver<PollerCommand>,
    ) {
        info!(interval = ?schedule.period(), "token list poller started");
        self.trigger();

        loop {
            tokio::select! {
                _ = schedule.tick() => {
                    debug!("refresh timer fired");
                    self.trigger();
                }
                command = commands.recv() => match command {
                    Some(PollerCommand::RefreshNow) => {
                        info!("manual refresh requested");
                        self.trigger();
                    }
                    Some(PollerCommand::Reschedule(period)) => {
                        schedule.reschedule(period);
                        info!(interval = ?period, "refresh interval changed");
                    }
                    None => break,
                },
            }
        }

        info!("token list poller stopped");
    }
}

/// Control handle of a spawned [`Poller`].
#[derive(Debug)]
pub struct PollerHandle {
    commands: mpsc::UnboundedSender<PollerCommand>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn send(&self, command: PollerCommand) {
        if self.commands.send(command).is_err() {
            warn!(?command, "poller stopped, dropping command");
        }
    }

    pub fn refresh_now(&self) {
        self.send(PollerCommand::RefreshNow)
    }

    pub fn reschedule(&self, period: Duration) {
        self.send(PollerCommand::Reschedule(period))
    }

    /// Stop the poll loop. Cycles already in flight run to completion on the runtime.
    pub async fn shutdown(self) {
        let Self { commands, task } = self;
        drop(commands);

        if let Err(error) = task.await {
            warn!(%error, "poller task terminated abnormally");
        }
    }
}
