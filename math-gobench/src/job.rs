//! Jobs: one work item executed on its own OS thread.
//!
//! The status is an atomic the scheduler polls without blocking. A job reaches
//! `Finished` through a drop guard, so a panicking entrypoint still finishes.

use log::error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

/// A (function, dimension) pair to benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkItem {
    /// Registry name of the function
    pub name: String,
    /// Dimension, or `None` for the function's default
    pub dimension: Option<usize>,
}

impl WorkItem {
    /// Work item at the function's default dimension.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimension: None,
        }
    }

    /// Work item at an explicit dimension.
    pub fn with_dimension(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension: Some(dimension),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimension {
            Some(dim) => write!(f, "{}_{}", self.name, dim),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobStatus {
    /// Created, not yet dispatched
    Pending = 0,
    /// Executing on its thread
    Running = 1,
    /// Entrypoint returned or panicked
    Finished = 2,
}

impl JobStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => JobStatus::Pending,
            1 => JobStatus::Running,
            _ => JobStatus::Finished,
        }
    }
}

/// Work executed by a job for its item.
pub type Entrypoint = Arc<dyn Fn(&WorkItem) + Send + Sync>;

struct FinishGuard(Arc<AtomicU8>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.store(JobStatus::Finished as u8, Ordering::Release);
    }
}

/// One work item bound to a background thread.
pub struct Job {
    item: WorkItem,
    status: Arc<AtomicU8>,
    handle: Option<JoinHandle<()>>,
    spawn_failed: bool,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("item", &self.item)
            .field("status", &self.status())
            .finish()
    }
}

impl Job {
    /// A pending job for `item`.
    pub fn new(item: WorkItem) -> Self {
        Self {
            item,
            status: Arc::new(AtomicU8::new(JobStatus::Pending as u8)),
            handle: None,
            spawn_failed: false,
        }
    }

    /// The bound work item.
    pub fn item(&self) -> &WorkItem {
        &self.item
    }

    /// Current status, without blocking.
    pub fn status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Moves a pending job to `Running` and executes `entrypoint` on a new thread.
    ///
    /// Does nothing for a job that already left `Pending`. If the thread cannot
    /// be spawned the job is marked `Finished` and the error returned.
    pub fn start(&mut self, entrypoint: Entrypoint) -> std::io::Result<()> {
        if self.status() != JobStatus::Pending {
            return Ok(());
        }
        self.status
            .store(JobStatus::Running as u8, Ordering::Release);

        let item = self.item.clone();
        let guard = FinishGuard(Arc::clone(&self.status));
        let spawned = thread::Builder::new()
            .name(format!("job-{item}"))
            .spawn(move || {
                let _guard = guard;
                entrypoint(&item);
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                // the closure, and with it the guard, is dropped on failure
                self.status
                    .store(JobStatus::Finished as u8, Ordering::Release);
                self.spawn_failed = true;
                Err(err)
            }
        }
    }

    /// Joins the thread of a finished job.
    ///
    /// Returns `false` when the entrypoint panicked or never started.
    pub fn join(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(()) => true,
                Err(_) => {
                    error!("job {} panicked", self.item);
                    false
                }
            },
            None => !self.spawn_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn wait_finished(job: &Job) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while job.status() != JobStatus::Finished {
            assert!(Instant::now() < deadline, "job did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_work_item_display() {
        assert_eq!(WorkItem::new("ackley").to_string(), "ackley");
        assert_eq!(WorkItem::with_dimension("ackley", 20).to_string(), "ackley_20");
    }

    #[test]
    fn test_job_lifecycle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut job = Job::new(WorkItem::new("sphere"));
        assert_eq!(job.status(), JobStatus::Pending);

        job.start(Arc::new(move |item: &WorkItem| {
            assert_eq!(item.name, "sphere");
            thread::sleep(Duration::from_millis(20));
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
        assert_ne!(job.status(), JobStatus::Pending);

        wait_finished(&job);
        assert!(job.join());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // a finished job is never restarted
        job.start(Arc::new(|_: &WorkItem| panic!("must not run")))
            .unwrap();
        assert_eq!(job.status(), JobStatus::Finished);
    }

    #[test]
    fn test_panicking_job_still_finishes() {
        let mut job = Job::new(WorkItem::new("boom"));
        job.start(Arc::new(|_: &WorkItem| panic!("entrypoint failure")))
            .unwrap();
        wait_finished(&job);
        assert!(!job.join());
    }
}
