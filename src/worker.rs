//! Background generation of derived artifacts.
//!
//! Card previews and thumbnails are expensive to render, so the editor
//! offloads them to a worker thread and keeps interacting with the
//! document. Each request carries a stable key and the [`Age`] of the
//! source data at request time; when a result is drained the consumer
//! compares that stamp against the value's current one to decide whether
//! the artifact is already stale.
//!
//! # Architecture
//!
//! ```text
//! Owning Thread                        Worker Thread
//! -------------                        -------------
//! request(key, owner, age, job)  ────▶ queue job
//!                                      run one job at a time
//! poll() drains results  ◀──────────── send Completed
//! abort(owner)           ────────────▶ drop queued jobs for owner
//! shutdown()             ────────────▶ exit and join
//! ```
//!
//! Jobs are moved through channels, never shared; the worker holds no
//! document state. Only the `Age` stamps cross threads, as plain values.

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::age::Age;
use crate::notify::{LogLevel, emit_log};

type Job<T> = Box<dyn FnOnce() -> T + Send>;

/// Commands sent from the owning thread to the worker thread.
enum Command<T> {
    /// Queue a generation job.
    Request {
        key: String,
        owner: String,
        freshness: Age,
        job: Job<T>,
    },
    /// Drop all queued jobs belonging to an owner.
    Abort { owner: String },
    /// Exit the worker thread.
    Shutdown,
}

/// A finished artifact, drained on the owning thread via
/// [`PreviewWorker::poll`].
#[derive(Debug)]
pub struct Completed<T> {
    /// The stable identity the request was made under.
    pub key: String,
    /// The owner the request belongs to.
    pub owner: String,
    /// Age of the source data when the request was made.
    pub freshness: Age,
    /// The generated artifact.
    pub artifact: T,
}

impl<T> Completed<T> {
    /// Whether the source data has changed since this artifact was
    /// requested.
    #[must_use]
    pub fn is_stale(&self, current: Age) -> bool {
        self.freshness < current
    }
}

/// Background worker generating derived artifacts one at a time.
///
/// The owning thread submits keyed jobs and drains results; the worker
/// thread runs them in request order. Requests whose key is already
/// pending are dropped, so repeated invalidation of the same card does
/// not pile up duplicate work.
pub struct PreviewWorker<T> {
    tx: Sender<Command<T>>,
    rx: Receiver<Completed<T>>,
    handle: Option<JoinHandle<()>>,
    /// Keys queued or running, by owner, until their result is drained.
    pending: HashMap<String, String>,
    /// Owners whose not-yet-drained results must be dropped.
    aborted: Vec<String>,
}

impl<T: Send + 'static> PreviewWorker<T> {
    /// Spawn the worker thread.
    #[must_use]
    pub fn new() -> Self {
        let (tx, command_rx) = mpsc::channel::<Command<T>>();
        let (done_tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || worker_loop(&command_rx, &done_tx));
        Self {
            tx,
            rx,
            handle: Some(handle),
            pending: HashMap::new(),
            aborted: Vec::new(),
        }
    }

    /// Queue a generation job under a stable key.
    ///
    /// `freshness` should be the source value's `last_update` stamp at
    /// request time. Returns `false` when the key is already pending and
    /// the job was dropped.
    pub fn request<F>(
        &mut self,
        key: impl Into<String>,
        owner: impl Into<String>,
        freshness: Age,
        job: F,
    ) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let key = key.into();
        let owner = owner.into();
        if self.pending.contains_key(&key) {
            return false;
        }
        self.pending.insert(key.clone(), owner.clone());
        self.aborted.retain(|aborted| *aborted != owner);
        let sent = self.tx.send(Command::Request {
            key,
            owner,
            freshness,
            job: Box::new(job),
        });
        if sent.is_err() {
            emit_log(LogLevel::Error, "preview worker is gone; request dropped");
            return false;
        }
        true
    }

    /// Drain all finished artifacts. Non-blocking; call from the owning
    /// thread's idle handling.
    pub fn poll(&mut self) -> Vec<Completed<T>> {
        let mut done = Vec::new();
        while let Ok(completed) = self.rx.try_recv() {
            self.pending.remove(&completed.key);
            if self.aborted.contains(&completed.owner) {
                continue;
            }
            done.push(completed);
        }
        done
    }

    /// Drop all pending requests and undrained results for an owner. Call
    /// before the owner is destroyed.
    pub fn abort(&mut self, owner: &str) {
        self.pending.retain(|_, pending_owner| pending_owner != owner);
        if !self.aborted.iter().any(|aborted| aborted == owner) {
            self.aborted.push(owner.to_owned());
        }
        let _ = self.tx.send(Command::Abort {
            owner: owner.to_owned(),
        });
    }

    /// Number of requests whose results have not been drained yet.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Stop the worker thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx.send(Command::Shutdown);
            if handle.join().is_err() {
                emit_log(LogLevel::Error, "preview worker panicked");
            }
        }
    }
}

impl<T: Send + 'static> Default for PreviewWorker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PreviewWorker<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx.send(Command::Shutdown);
            let _ = handle.join();
        }
    }
}

fn worker_loop<T>(commands: &Receiver<Command<T>>, done: &Sender<Completed<T>>) {
    let mut queue: VecDeque<(String, String, Age, Job<T>)> = VecDeque::new();
    loop {
        // ingest every waiting command before running the next job, so
        // aborts take effect ahead of queued work
        let command = if queue.is_empty() {
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => return,
            }
        } else {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => return,
            }
        };

        if let Some(command) = command {
            match command {
                Command::Request {
                    key,
                    owner,
                    freshness,
                    job,
                } => queue.push_back((key, owner, freshness, job)),
                Command::Abort { owner } => {
                    queue.retain(|(_, job_owner, _, _)| *job_owner != owner);
                }
                Command::Shutdown => return,
            }
            continue;
        }

        if let Some((key, owner, freshness, job)) = queue.pop_front() {
            let artifact = job();
            if done
                .send(Completed {
                    key,
                    owner,
                    freshness,
                    artifact,
                })
                .is_err()
            {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn drain_until<T: Send + 'static>(
        worker: &mut PreviewWorker<T>,
        want: usize,
    ) -> Vec<Completed<T>> {
        let mut done = Vec::new();
        for _ in 0..200 {
            done.extend(worker.poll());
            if done.len() >= want {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        done
    }

    #[test]
    fn test_request_and_poll() {
        let mut worker = PreviewWorker::new();
        let stamp = Age::now();
        assert!(worker.request("card-1/preview", "card-1", stamp, || 6 * 7));

        let done = drain_until(&mut worker, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].key, "card-1/preview");
        assert_eq!(done[0].artifact, 42);
        assert_eq!(done[0].freshness, stamp);
        assert_eq!(worker.pending_len(), 0);
        worker.shutdown();
    }

    #[test]
    fn test_duplicate_pending_key_dropped() {
        let mut worker = PreviewWorker::new();
        assert!(worker.request("card-1/preview", "card-1", Age::now(), || 1));
        assert!(!worker.request("card-1/preview", "card-1", Age::now(), || 2));
        let done = drain_until(&mut worker, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].artifact, 1);
        worker.shutdown();
    }

    #[test]
    fn test_staleness_comparison() {
        let mut worker = PreviewWorker::new();
        let at_request = Age::now();
        worker.request("card-1/preview", "card-1", at_request, || ());
        let done = drain_until(&mut worker, 1);
        assert!(!done[0].is_stale(at_request));
        assert!(done[0].is_stale(Age::now()));
        worker.shutdown();
    }

    #[test]
    fn test_abort_drops_owner_results() {
        let mut worker = PreviewWorker::new();
        worker.request("card-1/preview", "card-1", Age::now(), || 1);
        worker.request("card-2/preview", "card-2", Age::now(), || 2);
        worker.abort("card-1");

        let done = drain_until(&mut worker, 1);
        assert!(done.iter().all(|completed| completed.owner == "card-2"));
        assert_eq!(worker.pending_len(), 0);
        worker.shutdown();
    }
}
