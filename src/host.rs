//! Cooperative host for the execution state machine.
//!
//! [`Program`] owns the model and a FIFO of pending messages. Each turn takes one message, runs
//! [`update`], publishes the new [`Snapshot`], performs the returned command and then yields to
//! the async runtime. Because a dispatch command only enqueues the next [`Msg::Dispatch`], at
//! most one test runs per turn and any other task on the runtime (a renderer, an input handler)
//! gets scheduled between tests.

use std::collections::VecDeque;

use tokio::sync::watch;
use testloom_core::{Seed, Suite};

use crate::app::{Cmd, LifecycleError, Model, Msg, Snapshot, update, view};
use crate::clock::Clock;
use crate::config::RunConfig;
use crate::report::Reporter;

/// Final state of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub snapshot: Snapshot,
    pub seed: Option<Seed>,
}

/// Event loop driving a [`Model`] to completion.
pub struct Program<C> {
    model: Model,
    pending: VecDeque<Msg>,
    clock: C,
    snapshots: watch::Sender<Snapshot>,
}

impl<C: Clock> Program<C> {
    pub fn new(suite: Suite, config: &RunConfig, clock: C) -> Self {
        let (model, cmd) = Model::init(suite, config);
        let (snapshots, _) = watch::channel(view(&model));
        let mut program = Self {
            model,
            pending: VecDeque::new(),
            clock,
            snapshots,
        };
        program.perform(cmd);
        program
    }

    /// Watch the snapshot published after every update.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Queue a message behind the pending ones.
    pub fn send(&mut self, msg: Msg) {
        self.pending.push_back(msg);
    }

    fn perform(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::RequestStartTime => self.pending.push_back(Msg::Start(self.clock.now())),
            Cmd::Dispatch => self.pending.push_back(Msg::Dispatch),
            Cmd::RequestFinishTime => self.pending.push_back(Msg::Finish(self.clock.now())),
        }
    }

    /// Process messages until none are pending.
    ///
    /// ## Errors
    ///
    /// Stops at the first [`LifecycleError`]; the model is discarded.
    pub async fn run(mut self) -> Result<RunOutcome, LifecycleError> {
        while let Some(msg) = self.pending.pop_front() {
            tracing::trace!(msg = msg.name(), "processing message");
            let (model, cmd) = update(msg, self.model)?;
            self.model = model;
            self.snapshots.send_replace(view(&self.model));
            self.perform(cmd);
            tokio::task::yield_now().await;
        }

        Ok(RunOutcome {
            snapshot: view(&self.model),
            seed: self.model.seed(),
        })
    }
}

/// Run `program` while `reporter` renders its snapshots on a separate task.
///
/// The reporter sees the latest snapshot whenever it gets scheduled, and always sees the final
/// one before this returns.
pub async fn run_reported<C, R>(program: Program<C>, reporter: R) -> Result<RunOutcome, LifecycleError>
where
    C: Clock,
    R: Reporter + Send + 'static,
{
    let render = tokio::spawn(render_loop(program.subscribe(), reporter));
    // `run` consumes the program, so the snapshot sender is dropped once it returns and the
    // render loop drains and exits.
    let outcome = program.run().await;
    if let Err(err) = render.await {
        tracing::error!(%err, "reporter task failed");
    }
    outcome
}

async fn render_loop<R: Reporter>(mut snapshots: watch::Receiver<Snapshot>, mut reporter: R) {
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        reporter.render(&snapshot);
        if snapshots.changed().await.is_err() {
            break;
        }
    }
}
