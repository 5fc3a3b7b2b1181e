//! Job engine - slots, assignments, allocation, and daily production

pub mod allocator;
pub mod catalog;
pub mod fitness;
pub mod job_type;
pub mod ledger;
pub mod manager;
pub mod needs;
pub mod production;
pub mod slots;

pub use allocator::{Allocator, JobScore, ScoredSlot, Staffing};
pub use catalog::{CatalogLoadError, JobCatalog, JobSpec};
pub use fitness::worker_fitness;
pub use job_type::{JobCategory, JobType};
pub use ledger::{
    AssignmentLedger, AssignmentRejected, LedgerRestoreError, LedgerSnapshot, ReleaseRejected,
};
pub use manager::{AllocationReport, JobManager};
pub use needs::{estimate_needs, ResourceNeeds};
pub use production::{ProductionBreakdown, ProductionCalculator, ProductionLine, ResourceLines};
pub use slots::{OpenSlot, SlotInventory};
