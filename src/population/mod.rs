//! Population layer - worker records and the labor pool

pub mod pool;
pub mod roster;
pub mod worker;

pub use pool::{available_workers, is_eligible, WorkerView};
pub use roster::Population;
pub use worker::{JobAssignment, Laborer, Role, Skill, Worker, WorkerStatus};
