//! Registry trait: submit a task, check or wait for its outcome.

use async_trait::async_trait;
use gdelt_types::JobInfo;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Error a task may fail with.
pub type TaskError = Box<dyn Error + Send + Sync>;

/// A unit of work with its arguments already bound.
pub type JobTask<T> = Pin<Box<dyn Future<Output = Result<T, TaskError>> + Send>>;

/// The error a failed task produced, shared between every caller that asks.
#[derive(Clone)]
pub struct TaskFailure(Arc<dyn Error + Send + Sync>);

impl TaskFailure {
    pub fn new(err: TaskError) -> Self {
        Self(Arc::from(err))
    }

    pub fn message(&self) -> String {
        self.0.to_string()
    }

    /// The original error as its concrete type, if it is an `E`.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("job not found: {0}")]
    UnknownJob(String),
    #[error("{0}")]
    TaskFailed(TaskFailure),
    #[error("registry error: {0}")]
    Other(String),
}

/// Registry of asynchronous jobs producing `T`.
///
/// Contract: ids are only ever issued by `submit`; every other method returns
/// `RegistryError::UnknownJob` for an id this registry never issued. A job's
/// terminal state never changes, so `is_complete` is monotonic and
/// `get_result` is idempotent.
#[async_trait]
pub trait JobRegistry<T: Send + 'static>: Send + Sync {
    /// Queue `task` on the worker pool and return its id without waiting.
    async fn submit(&self, task: JobTask<T>) -> Result<String, RegistryError>;

    /// True once the job has completed or failed. Never waits on the task.
    async fn is_complete(&self, job_id: &str) -> Result<bool, RegistryError>;

    /// Suspend until the job is terminal. Task failure is not reported here;
    /// it is only observed through `get_result` and `status`.
    async fn wait(&self, job_id: &str) -> Result<(), RegistryError>;

    /// Wait for the job, then return its value or `TaskFailed` with the
    /// task's own error.
    async fn get_result(&self, job_id: &str) -> Result<T, RegistryError>;

    /// Snapshot of the job's state and timestamps.
    async fn status(&self, job_id: &str) -> Result<JobInfo, RegistryError>;
}
