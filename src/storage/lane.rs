//! Single write lane for persistence jobs.
//!
//! All durable writes (preset files and the remote mirror value) go through
//! one background thread, so callers never block on disk and two writes to
//! the same resource can never interleave. A failed job logs a warning; the
//! in-memory working set stays authoritative until the next save.

use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use tracing::{debug, warn};

enum Job {
    Run(Box<dyn FnOnce() + Send>),
    Flush(Sender<()>),
    Shutdown,
}

/// Serializes persistence work onto a single background thread.
pub struct WriteLane {
    tx: Sender<Job>,
    handle: Option<JoinHandle<()>>,
}

impl WriteLane {
    /// Spawn the lane worker.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = std::thread::Builder::new()
            .name("preset-write-lane".to_string())
            .spawn(move || {
                debug!("Write lane started");
                while let Ok(job) = rx.recv() {
                    match job {
                        Job::Run(work) => work(),
                        Job::Flush(ack) => {
                            // Every job enqueued before the flush has run by
                            // the time this ack sends.
                            let _ = ack.send(());
                        }
                        Job::Shutdown => break,
                    }
                }
                debug!("Write lane stopped");
            })
            .expect("failed to spawn write lane thread");

        Self {
            tx,
            handle: Some(handle),
        }
    }

    /// Enqueue a job without waiting for it to run.
    pub fn submit<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Job::Run(Box::new(work))).is_err() {
            warn!("Write lane is gone, dropping persistence job");
        }
    }

    /// Block until every previously submitted job has completed.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.tx.send(Job::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Default for WriteLane {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WriteLane {
    fn drop(&mut self) {
        let _ = self.tx.send(Job::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
