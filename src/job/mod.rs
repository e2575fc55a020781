pub mod decode;
pub mod error;
pub mod runner;
pub mod types;
pub mod worker;

pub use error::JobError;
pub use runner::JobRunner;
pub use types::{JobInput, JobKind, JobRequest, JobSuccess, WorkerOutput};
pub use worker::{SubprocessWorker, Worker};
