//! Fixed-size thread pool
//!
//! `size` long-lived threads pull jobs from one shared queue. A job is
//! handed the name of the thread running it. Dropping the pool (or calling
//! [`WorkerPool::join`]) closes the queue and waits for every queued job.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::debug;

use crate::utils::{Result, SimError};

type Job = Box<dyn FnOnce(&str) + Send + 'static>;

/// Fixed number of workers sharing a job queue
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    size: usize,
}

impl WorkerPool {
    /// Spawn `size` workers named `{prefix}-{n}`
    pub fn new(size: usize, prefix: &str) -> Result<Self> {
        if size == 0 {
            return Err(SimError::Config(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);
        for n in 1..=size {
            let name = format!("{}-{}", prefix, n);
            let receiver = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker_loop(&name, &receiver))
                .map_err(|e| SimError::Worker(format!("failed to spawn pool worker {}: {}", n, e)))?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
            size,
        })
    }

    /// Number of workers
    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue a job
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| SimError::Worker("pool is shut down".to_string()))?;
        sender
            .send(Box::new(job))
            .map_err(|_| SimError::Worker("all pool workers have exited".to_string()))
    }

    /// Close the queue and wait for every worker to finish
    pub fn join(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        drop(self.sender.take());

        let mut panicked = 0;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                panicked += 1;
            }
        }

        if panicked > 0 {
            Err(SimError::Worker(format!("{} pool worker(s) panicked", panicked)))
        } else {
            Ok(())
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn worker_loop(name: &str, receiver: &Mutex<Receiver<Job>>) {
    loop {
        // Lock only for the dequeue so other workers can pick up jobs
        // while this one runs.
        let job = receiver.lock().recv();
        match job {
            Ok(job) => job(name),
            Err(_) => {
                debug!("{}: queue closed, exiting", name);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(WorkerPool::new(0, "w"), Err(SimError::Config(_))));
    }

    #[test]
    fn test_runs_every_job() {
        let pool = WorkerPool::new(3, "w").unwrap();
        assert_eq!(pool.size(), 3);
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            let done = Arc::clone(&done);
            pool.execute(move |_| {
                done.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.join().unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_jobs_see_worker_names() {
        let pool = WorkerPool::new(2, "pool").unwrap();
        let names = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..6 {
            let names = Arc::clone(&names);
            pool.execute(move |name| {
                thread::sleep(Duration::from_millis(5));
                names.lock().push(name.to_string());
            })
            .unwrap();
        }
        drop(pool);

        let names = names.lock();
        assert_eq!(names.len(), 6);
        assert!(names.iter().all(|n| n == "pool-1" || n == "pool-2"));
    }

    #[test]
    fn test_panicking_job_reported_on_join() {
        let pool = WorkerPool::new(1, "w").unwrap();
        pool.execute(|_| panic!("boom")).unwrap();
        assert!(matches!(pool.join(), Err(SimError::Worker(_))));
    }
}
