//! Domain model (IDs, job snapshots, label tables, errors).

pub mod errors;
pub mod ids;
pub mod job;
pub mod labels;

pub use self::errors::{ErrorKind, PollError, QueryError};
pub use self::ids::{JobId, ProjectId};
pub use self::job::{Job, JobOutcome, JobStatus, Project, Task, TaskEvent, Tenant};
