// Capture worker - dedicated encode thread behind a bounded queue
//
// Encoding a screenshot can take longer than a frame, so callers may move
// the encode off the presentation path. The queue is bounded (submission
// blocks when capture outruns the disk) and the thread is joined on
// shutdown, so no encode can outlive the process. Jobs report completion
// through a per-job channel; dropping the handle makes the job
// fire-and-forget, in which case the job's own error logging is all that
// remains of a failure.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::CaptureError;

const DEFAULT_QUEUE_DEPTH: usize = 8;

type CaptureJob = Box<dyn FnOnce() -> Result<(), CaptureError> + Send + 'static>;

struct QueuedJob {
    job: CaptureJob,
    done: Sender<Result<(), CaptureError>>,
}

/// Completion handle for a submitted capture job
pub struct CaptureHandle {
    done: Receiver<Result<(), CaptureError>>,
}

impl CaptureHandle {
    /// Block until the job finishes and return its result
    pub fn wait(self) -> Result<(), CaptureError> {
        match self.done.recv() {
            Ok(result) => result,
            Err(_) => Err(CaptureError::WorkerUnavailable),
        }
    }
}

/// Background thread that runs capture encode jobs in submission order
pub struct CaptureWorker {
    sender: Option<Sender<QueuedJob>>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    /// Start a worker with the default queue depth
    pub fn new() -> Self {
        Self::with_queue_depth(DEFAULT_QUEUE_DEPTH)
    }

    /// Start a worker whose queue holds at most `depth` pending jobs
    pub fn with_queue_depth(depth: usize) -> Self {
        let (sender, receiver) = bounded::<QueuedJob>(depth.max(1));

        let thread = thread::spawn(move || {
            // Runs until the sender side closes, then drains what is left.
            for queued in receiver {
                let result = (queued.job)();
                let _ = queued.done.send(result);
            }
        });

        Self {
            sender: Some(sender),
            thread: Some(thread),
        }
    }

    /// Queue a job, blocking while the queue is full
    ///
    /// The returned handle resolves when the job has run. Errors with
    /// [`CaptureError::WorkerUnavailable`] after shutdown.
    pub fn submit<F>(&self, job: F) -> Result<CaptureHandle, CaptureError>
    where
        F: FnOnce() -> Result<(), CaptureError> + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or(CaptureError::WorkerUnavailable)?;

        let (done_tx, done_rx) = bounded(1);
        sender
            .send(QueuedJob {
                job: Box::new(job),
                done: done_tx,
            })
            .map_err(|_| CaptureError::WorkerUnavailable)?;

        Ok(CaptureHandle { done: done_rx })
    }

    /// Close the queue, finish pending jobs and join the thread
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Default for CaptureWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_job_runs_and_handle_resolves() {
        let worker = CaptureWorker::new();
        let ran = Arc::new(AtomicUsize::new(0));

        let ran_in_job = Arc::clone(&ran);
        let handle = worker
            .submit(move || {
                ran_in_job.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert!(handle.wait().is_ok());
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_reports_job_error() {
        let worker = CaptureWorker::new();
        let handle = worker
            .submit(|| Err(CaptureError::ZeroSized))
            .unwrap();

        assert!(matches!(handle.wait(), Err(CaptureError::ZeroSized)));
    }

    #[test]
    fn test_jobs_run_in_submission_order() {
        let worker = CaptureWorker::with_queue_depth(4);
        let counter = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..4 {
            let counter = Arc::clone(&counter);
            handles.push(
                worker
                    .submit(move || {
                        // Each job sees exactly the jobs before it completed
                        assert_eq!(counter.fetch_add(1, Ordering::SeqCst), i);
                        Ok(())
                    })
                    .unwrap(),
            );
        }

        for handle in handles {
            assert!(handle.wait().is_ok());
        }
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_shutdown_drains_pending_jobs() {
        let mut worker = CaptureWorker::with_queue_depth(8);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..6 {
            let counter = Arc::clone(&counter);
            worker
                .submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }

        worker.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut worker = CaptureWorker::new();
        worker.shutdown();

        let result = worker.submit(|| Ok(()));
        assert!(matches!(result, Err(CaptureError::WorkerUnavailable)));
    }

    #[test]
    fn test_drop_joins_outstanding_work() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let worker = CaptureWorker::new();
            let counter = Arc::clone(&counter);
            worker
                .submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }
        // Drop joined the thread, so the job has finished
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
