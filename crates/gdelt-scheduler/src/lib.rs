//! Job registry: tasks run on a fixed worker pool and are tracked by id.

mod memory;
mod pool;
mod trait_;

pub use memory::{InMemoryJobRegistry, TaskAborted};
pub use pool::{PoolJob, WorkerPool, DEFAULT_WORKERS};
pub use trait_::{JobRegistry, JobTask, RegistryError, TaskError, TaskFailure};
