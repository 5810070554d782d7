//! Fire-and-forget job queue.
//!
//! [`DispatchQueue::dispatch`] never blocks and never reports back. The
//! [`DispatchWorker`] runs each job as its own task and is the single place
//! where job failures are logged.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, warn};

use super::error::ServiceResult;

type Job = Pin<Box<dyn Future<Output = ServiceResult<()>> + Send>>;

struct Dispatch {
    name: &'static str,
    job: Job,
}

/// Sending half of the job queue
#[derive(Clone)]
pub struct DispatchQueue {
    tx: mpsc::UnboundedSender<Dispatch>,
}

impl DispatchQueue {
    /// Create a queue and the worker that drains it
    pub fn new() -> (Self, DispatchWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, DispatchWorker { rx })
    }

    /// Queue `job` for background execution
    pub fn dispatch<F>(&self, name: &'static str, job: F)
    where
        F: Future<Output = ServiceResult<()>> + Send + 'static,
    {
        let dispatch = Dispatch {
            name,
            job: Box::pin(job),
        };

        if self.tx.send(dispatch).is_err() {
            warn!(job = name, "Dispatch worker has stopped, dropping job");
        }
    }

    /// Check whether the worker is still accepting jobs
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of the job queue
pub struct DispatchWorker {
    rx: mpsc::UnboundedReceiver<Dispatch>,
}

impl DispatchWorker {
    /// Run until every [`DispatchQueue`] handle is dropped and in-flight jobs finish
    pub async fn run(mut self) {
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                dispatch = self.rx.recv() => {
                    match dispatch {
                        Some(Dispatch { name, job }) => {
                            tasks.spawn(run_job(name, job));
                        }
                        None => break,
                    }
                }
                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = result {
                        error!(error = %e, "Dispatched job task failed");
                    }
                }
            }
        }

        debug!(in_flight = tasks.len(), "Dispatch queue closed, draining jobs");
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Dispatched job task failed");
            }
        }
    }

    /// Run the worker on its own task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

async fn run_job(name: &'static str, job: Job) {
    match AssertUnwindSafe(job).catch_unwind().await {
        Ok(Ok(())) => debug!(job = name, "Dispatched job completed"),
        Ok(Err(e)) => error!(job = name, error = %e, "Dispatched job failed"),
        Err(_) => error!(job = name, "Dispatched job panicked"),
    }
}
