//! In-memory registry: job state in a map, one watch channel per job.

use crate::{JobRegistry, JobTask, RegistryError, TaskError, TaskFailure, WorkerPool};
use async_trait::async_trait;
use chrono::Utc;
use gdelt_types::{JobInfo, JobStatus};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinError;
use uuid::Uuid;

/// Failure recorded for a task that panicked or was cancelled.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TaskAborted(String);

impl From<JoinError> for TaskAborted {
    fn from(err: JoinError) -> Self {
        if !err.is_panic() {
            return Self("task cancelled".to_string());
        }
        let payload = err.into_panic();
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        match detail {
            Some(d) => Self(format!("task panicked: {d}")),
            None => Self("task panicked".to_string()),
        }
    }
}

#[derive(Clone)]
enum Phase<T> {
    Pending,
    Running,
    Completed(T),
    Failed(TaskFailure),
}

#[derive(Clone)]
struct JobCell<T> {
    phase: Phase<T>,
    updated_at: String,
}

impl<T> JobCell<T> {
    fn new(phase: Phase<T>) -> Self {
        Self {
            phase,
            updated_at: now_iso(),
        }
    }

    fn status(&self) -> JobStatus {
        match self.phase {
            Phase::Pending => JobStatus::Pending,
            Phase::Running => JobStatus::Running,
            Phase::Completed(_) => JobStatus::Completed,
            Phase::Failed(_) => JobStatus::Failed,
        }
    }

    fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

struct JobEntry<T> {
    created_at: String,
    cell: watch::Receiver<JobCell<T>>,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Runs on a pool worker: mark Running, run the task in its own tokio task,
/// publish the terminal state.
async fn run_job<T: Send + 'static>(
    job_id: String,
    task: JobTask<T>,
    cell: watch::Sender<JobCell<T>>,
) {
    cell.send_replace(JobCell::new(Phase::Running));
    tracing::debug!(job_id = %job_id, "job running");
    let phase = match tokio::spawn(task).await {
        Ok(Ok(value)) => {
            tracing::info!(job_id = %job_id, "job completed");
            Phase::Completed(value)
        }
        Ok(Err(err)) => {
            tracing::warn!(job_id = %job_id, error = %err, "job failed");
            Phase::Failed(TaskFailure::new(err))
        }
        Err(err) => {
            let aborted = TaskAborted::from(err);
            tracing::error!(job_id = %job_id, error = %aborted, "job aborted");
            Phase::Failed(TaskFailure::new(Box::new(aborted)))
        }
    };
    cell.send_replace(JobCell::new(phase));
}

/// Registry backed by a map of watch channels and a [`WorkerPool`].
///
/// The map lock is held only for map access; waiting is done on the job's
/// own channel after the lock is released. Jobs are never evicted.
pub struct InMemoryJobRegistry<T> {
    jobs: Mutex<HashMap<String, JobEntry<T>>>,
    pool: WorkerPool,
}

impl<T> InMemoryJobRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create the registry with `workers` pool workers. Needs a tokio runtime.
    pub fn new(workers: usize) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            pool: WorkerPool::new(workers),
        }
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    /// Number of jobs ever submitted and still tracked.
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }

    /// Submit `f(args)`.
    pub async fn submit_with<F, A, Fut, E>(&self, f: F, args: A) -> Result<String, RegistryError>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<TaskError> + Send + 'static,
    {
        let fut = f(args);
        self.submit(Box::pin(async move { fut.await.map_err(Into::into) }))
            .await
    }

    /// Submit a synchronous `f(args)`, run on tokio's blocking threads.
    pub async fn submit_blocking<F, A, E>(&self, f: F, args: A) -> Result<String, RegistryError>
    where
        F: FnOnce(A) -> Result<T, E> + Send + 'static,
        A: Send + 'static,
        E: Into<TaskError> + Send + 'static,
    {
        self.submit(Box::pin(async move {
            match tokio::task::spawn_blocking(move || f(args)).await {
                Ok(result) => result.map_err(Into::into),
                Err(err) => Err(Box::new(TaskAborted::from(err)) as TaskError),
            }
        }))
        .await
    }

    async fn receiver(&self, job_id: &str) -> Result<watch::Receiver<JobCell<T>>, RegistryError> {
        let jobs = self.jobs.lock().await;
        jobs.get(job_id)
            .map(|entry| entry.cell.clone())
            .ok_or_else(|| RegistryError::UnknownJob(job_id.to_string()))
    }

    async fn settled(&self, job_id: &str) -> Result<JobCell<T>, RegistryError> {
        let mut rx = self.receiver(job_id).await?;
        let settled = rx.wait_for(JobCell::is_terminal).await;
        match settled {
            Ok(cell) => Ok(cell.clone()),
            Err(_) => Err(RegistryError::Other(format!("job {job_id} was dropped"))),
        }
    }
}

#[async_trait]
impl<T> JobRegistry<T> for InMemoryJobRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn submit(&self, task: JobTask<T>) -> Result<String, RegistryError> {
        let (tx, rx) = watch::channel(JobCell::new(Phase::Pending));
        let job_id = {
            let mut jobs = self.jobs.lock().await;
            let mut id = Uuid::new_v4().to_string();
            while jobs.contains_key(&id) {
                id = Uuid::new_v4().to_string();
            }
            let created_at = rx.borrow().updated_at.clone();
            jobs.insert(id.clone(), JobEntry { created_at, cell: rx });
            id
        };
        if let Err(err) = self.pool.execute(Box::pin(run_job(job_id.clone(), task, tx))) {
            self.jobs.lock().await.remove(&job_id);
            return Err(err);
        }
        tracing::debug!(job_id = %job_id, "job queued");
        Ok(job_id)
    }

    async fn is_complete(&self, job_id: &str) -> Result<bool, RegistryError> {
        let rx = self.receiver(job_id).await?;
        let done = rx.borrow().is_terminal();
        Ok(done)
    }

    async fn wait(&self, job_id: &str) -> Result<(), RegistryError> {
        self.settled(job_id).await.map(|_| ())
    }

    async fn get_result(&self, job_id: &str) -> Result<T, RegistryError> {
        match self.settled(job_id).await?.phase {
            Phase::Completed(value) => Ok(value),
            Phase::Failed(failure) => Err(RegistryError::TaskFailed(failure)),
            Phase::Pending | Phase::Running => {
                Err(RegistryError::Other(format!("job {job_id} not settled")))
            }
        }
    }

    async fn status(&self, job_id: &str) -> Result<JobInfo, RegistryError> {
        let jobs = self.jobs.lock().await;
        let entry = jobs
            .get(job_id)
            .ok_or_else(|| RegistryError::UnknownJob(job_id.to_string()))?;
        let cell = entry.cell.borrow();
        Ok(JobInfo {
            job_id: job_id.to_string(),
            status: cell.status(),
            created_at: entry.created_at.clone(),
            updated_at: cell.updated_at.clone(),
            error: match &cell.phase {
                Phase::Failed(failure) => Some(failure.message()),
                _ => None,
            },
        })
    }
}
