//! Estimator jobs
//!
//! Gantree: L2_Estimator → Job
//!
//! A job is returned at submission and yields its result on completion.
//! Errors can surface at either step: `run` fails on submission problems,
//! [`Job::result`] fails on execution problems.

use crate::error::{EstimatorError, EstimatorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_JOB: AtomicU64 = AtomicU64::new(0);

fn next_job_id() -> String {
    format!("job-{}", NEXT_JOB.fetch_add(1, Ordering::Relaxed))
}

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Accepted, result not computed yet
    Queued,
    /// Result available
    Completed,
    /// Execution failed
    Failed,
}

impl JobStatus {
    /// Check if job is in terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

type Deferred<T> = Box<dyn FnOnce() -> EstimatorResult<T> + Send>;

enum JobState<T> {
    Done(EstimatorResult<T>),
    Pending(Deferred<T>),
}

/// Handle to a submitted estimator job
/// Gantree: Job<T> // 작업 핸들
pub struct Job<T> {
    job_id: String,
    state: JobState<T>,
}

impl<T> Job<T> {
    /// Job whose result is already known
    pub fn completed(value: T) -> Self {
        Self {
            job_id: next_job_id(),
            state: JobState::Done(Ok(value)),
        }
    }

    /// Job that was accepted but failed during execution
    pub fn failed(error: EstimatorError) -> Self {
        Self {
            job_id: next_job_id(),
            state: JobState::Done(Err(error)),
        }
    }

    /// Job computed when its result is requested
    pub fn deferred<F>(work: F) -> Self
    where
        F: FnOnce() -> EstimatorResult<T> + Send + 'static,
    {
        Self {
            job_id: next_job_id(),
            state: JobState::Pending(Box::new(work)),
        }
    }

    /// Job identifier
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current status
    pub fn status(&self) -> JobStatus {
        match &self.state {
            JobState::Done(Ok(_)) => JobStatus::Completed,
            JobState::Done(Err(_)) => JobStatus::Failed,
            JobState::Pending(_) => JobStatus::Queued,
        }
    }

    /// Wait for completion and take the result
    /// Gantree: result(self) -> Result<T> // 결과 대기
    pub fn result(self) -> EstimatorResult<T> {
        log::debug!("Waiting for {}", self.job_id);
        match self.state {
            JobState::Done(result) => result,
            JobState::Pending(work) => work(),
        }
    }
}

impl<T> fmt::Debug for Job<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("job_id", &self.job_id)
            .field("status", &self.status())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed() {
        let job = Job::completed(vec![1.0, 2.0]);
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.result().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_deferred_runs_on_result() {
        let job: Job<f64> = Job::deferred(|| Err(EstimatorError::ExecutionFailed("boom".into())));
        assert_eq!(job.status(), JobStatus::Queued);
        assert!(!job.status().is_terminal());
        assert!(matches!(
            job.result(),
            Err(EstimatorError::ExecutionFailed(msg)) if msg == "boom"
        ));
    }

    #[test]
    fn test_job_ids_unique() {
        let a = Job::completed(());
        let b = Job::completed(());
        assert_ne!(a.job_id(), b.job_id());
        assert_eq!(Job::<()>::failed(EstimatorError::Other("x".into())).status(), JobStatus::Failed);
    }
}
