//! Assignment ledger - who works where
//!
//! The ledger maps site -> job type -> worker ids and is the single source
//! of truth for job assignments. It never owns worker records: every
//! change is mirrored onto the roster through [`Population`].
//!
//! Invariants held by every mutation:
//! - a (site, job) list never grows past the slot inventory's capacity
//! - a worker id appears in at most one list

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{BuildingId, SiteId, WorkerId};
use crate::jobs::job_type::JobType;
use crate::jobs::slots::SlotInventory;
use crate::population::roster::Population;
use crate::population::worker::{JobAssignment, WorkerStatus};

/// Why an assignment was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignmentRejected {
    #[error("no {job} slots exist at {site}")]
    UnknownSlot { site: SiteId, job: JobType },
    #[error("all {capacity} {job} slots at {site} are filled")]
    SlotFull {
        site: SiteId,
        job: JobType,
        capacity: u32,
    },
    #[error("worker {0} not found")]
    WorkerNotFound(WorkerId),
    #[error("worker {0} already holds a job")]
    AlreadyAssigned(WorkerId),
}

/// Why a release was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReleaseRejected {
    #[error("worker {0} holds no job")]
    NotAssigned(WorkerId),
    #[error("worker {0} not found")]
    WorkerNotFound(WorkerId),
}

/// Why a snapshot could not be restored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerRestoreError {
    #[error("invalid site id: {0}")]
    InvalidSite(String),
    #[error("invalid job type: {0}")]
    InvalidJobType(String),
    #[error("worker {0} appears more than once")]
    DuplicateWorker(WorkerId),
}

/// Plain site -> job -> worker ids shape used for saving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot(pub BTreeMap<String, BTreeMap<String, Vec<u64>>>);

impl LedgerSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy)]
struct Position {
    assignment: JobAssignment,
    /// Monotonic order of assignment; higher is more recent
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentLedger {
    entries: BTreeMap<SiteId, BTreeMap<JobType, Vec<WorkerId>>>,
    positions: AHashMap<WorkerId, Position>,
    next_seq: u64,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a worker into a slot
    ///
    /// Refused when the pair has no capacity or is full, the worker does not
    /// exist (dead counts as gone), or the worker already holds a job.
    pub fn assign(
        &mut self,
        population: &mut Population,
        slots: &SlotInventory,
        worker: WorkerId,
        site: SiteId,
        job: JobType,
    ) -> Result<(), AssignmentRejected> {
        let capacity = slots.capacity(site, job);
        if capacity == 0 {
            return Err(AssignmentRejected::UnknownSlot { site, job });
        }
        if self.fill(site, job) >= capacity as usize {
            return Err(AssignmentRejected::SlotFull {
                site,
                job,
                capacity,
            });
        }
        let record = population
            .get(worker)
            .filter(|w| w.is_alive())
            .ok_or(AssignmentRejected::WorkerNotFound(worker))?;
        if record.assignment().is_some() || self.positions.contains_key(&worker) {
            return Err(AssignmentRejected::AlreadyAssigned(worker));
        }

        let assignment = JobAssignment { site, job };
        if !population.record_assignment(worker, assignment) {
            return Err(AssignmentRejected::AlreadyAssigned(worker));
        }
        self.insert(worker, assignment);
        tracing::debug!("Assigned {} to {} at {}", worker, job, site);
        Ok(())
    }

    fn insert(&mut self, worker: WorkerId, assignment: JobAssignment) {
        self.entries
            .entry(assignment.site)
            .or_default()
            .entry(assignment.job)
            .or_default()
            .push(worker);
        self.positions.insert(
            worker,
            Position {
                assignment,
                seq: self.next_seq,
            },
        );
        self.next_seq += 1;
    }

    /// Drop a worker from the ledger only, pruning empty entries
    fn remove_entry(&mut self, worker: WorkerId) -> Option<JobAssignment> {
        let position = self.positions.remove(&worker)?;
        let JobAssignment { site, job } = position.assignment;
        if let Some(jobs) = self.entries.get_mut(&site) {
            if let Some(list) = jobs.get_mut(&job) {
                list.retain(|id| *id != worker);
                if list.is_empty() {
                    jobs.remove(&job);
                }
            }
            if jobs.is_empty() {
                self.entries.remove(&site);
            }
        }
        Some(position.assignment)
    }

    /// Take a worker off their job and return them to idle
    pub fn release(
        &mut self,
        population: &mut Population,
        worker: WorkerId,
    ) -> Result<JobAssignment, ReleaseRejected> {
        let Some(assignment) = self.remove_entry(worker) else {
            if population.contains(worker) {
                return Err(ReleaseRejected::NotAssigned(worker));
            }
            return Err(ReleaseRejected::WorkerNotFound(worker));
        };
        population.clear_assignment(worker);
        tracing::debug!("Released {} from {} at {}", worker, assignment.job, assignment.site);
        Ok(assignment)
    }

    /// Release up to `max_count` workers of a job type across all sites
    ///
    /// Most recently assigned workers go first so long-serving workers keep
    /// their posts. `None` releases all of them.
    pub fn release_all_of_type(
        &mut self,
        population: &mut Population,
        job: JobType,
        max_count: Option<usize>,
    ) -> usize {
        let mut holders: Vec<(u64, WorkerId)> = self
            .positions
            .iter()
            .filter(|(_, p)| p.assignment.job == job)
            .map(|(id, p)| (p.seq, *id))
            .collect();
        holders.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        let limit = max_count.unwrap_or(usize::MAX);
        let mut released = 0;
        for (_, worker) in holders.into_iter().take(limit) {
            if self.release(population, worker).is_ok() {
                released += 1;
            }
        }
        released
    }

    /// Workers in one (site, job) list, oldest first
    pub fn workers_at(&self, site: SiteId, job: JobType) -> &[WorkerId] {
        self.entries
            .get(&site)
            .and_then(|jobs| jobs.get(&job))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn fill(&self, site: SiteId, job: JobType) -> usize {
        self.workers_at(site, job).len()
    }

    pub fn assignment_of(&self, worker: WorkerId) -> Option<JobAssignment> {
        self.positions.get(&worker).map(|p| p.assignment)
    }

    pub fn count_of_type(&self, job: JobType) -> usize {
        self.entries
            .values()
            .filter_map(|jobs| jobs.get(&job))
            .map(|list| list.len())
            .sum()
    }

    pub fn total_assigned(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Assigned worker count per job type
    pub fn job_counts(&self) -> BTreeMap<JobType, usize> {
        let mut counts = BTreeMap::new();
        for jobs in self.entries.values() {
            for (job, list) in jobs {
                *counts.entry(*job).or_insert(0) += list.len();
            }
        }
        counts
    }

    /// Every (site, job, worker) triple in site order
    pub fn iter(&self) -> impl Iterator<Item = (SiteId, JobType, WorkerId)> + '_ {
        self.entries.iter().flat_map(|(site, jobs)| {
            jobs.iter()
                .flat_map(move |(job, list)| list.iter().map(move |worker| (*site, *job, *worker)))
        })
    }

    /// Prune entries that point at demolished buildings or missing/dead workers
    ///
    /// The global site is always valid. Returns how many workers were freed.
    pub fn reconcile_orphans(
        &mut self,
        population: &mut Population,
        valid_buildings: &[BuildingId],
    ) -> usize {
        let valid: AHashSet<BuildingId> = valid_buildings.iter().copied().collect();

        let mut orphans: Vec<(WorkerId, &'static str)> = Vec::new();
        for (site, _, worker) in self.iter() {
            let site_gone = site.building().is_some_and(|id| !valid.contains(&id));
            let worker_gone = match population.get(worker) {
                None => true,
                Some(record) => record.status == WorkerStatus::Dead,
            };
            if site_gone {
                orphans.push((worker, "building no longer exists"));
            } else if worker_gone {
                orphans.push((worker, "worker no longer exists"));
            }
        }

        for (worker, reason) in &orphans {
            if let Some(assignment) = self.remove_entry(*worker) {
                population.clear_assignment(*worker);
                tracing::warn!(
                    "Pruned inconsistent ledger entry: {} at {} as {} ({})",
                    worker,
                    assignment.site,
                    assignment.job,
                    reason
                );
            }
        }
        orphans.len()
    }

    /// Release workers beyond each pair's current capacity
    ///
    /// Excess is trimmed from the end of each list, newest first.
    pub fn trim_to_capacity(&mut self, population: &mut Population, slots: &SlotInventory) -> usize {
        let mut excess: Vec<WorkerId> = Vec::new();
        for (site, jobs) in &self.entries {
            for (job, list) in jobs {
                let capacity = slots.capacity(*site, *job) as usize;
                if list.len() > capacity {
                    excess.extend(list[capacity..].iter().rev().copied());
                }
            }
        }

        for worker in &excess {
            if let Ok(assignment) = self.release(population, *worker) {
                tracing::debug!(
                    "Capacity shrank at {}: released {} from {}",
                    assignment.site,
                    worker,
                    assignment.job
                );
            }
        }
        excess.len()
    }

    /// Export the plain site -> job -> ids shape
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut out = BTreeMap::new();
        for (site, jobs) in &self.entries {
            let jobs_out: BTreeMap<String, Vec<u64>> = jobs
                .iter()
                .map(|(job, list)| (job.name().to_string(), list.iter().map(|w| w.0).collect()))
                .collect();
            out.insert(site.to_string(), jobs_out);
        }
        LedgerSnapshot(out)
    }

    /// Rebuild a ledger from a snapshot and resync every worker record
    ///
    /// Ids missing from the population are dropped with a warning. Workers
    /// the snapshot does not mention lose any stale assignment. Entries
    /// beyond the current capacity in `slots` are released, newest first.
    pub fn restore(
        snapshot: &LedgerSnapshot,
        population: &mut Population,
        slots: &SlotInventory,
    ) -> Result<Self, LedgerRestoreError> {
        let mut ledger = Self::new();

        for (site_key, jobs) in &snapshot.0 {
            let site: SiteId = site_key
                .parse()
                .map_err(|_| LedgerRestoreError::InvalidSite(site_key.clone()))?;
            for (job_key, ids) in jobs {
                let job = JobType::parse(job_key)
                    .ok_or_else(|| LedgerRestoreError::InvalidJobType(job_key.clone()))?;
                for raw in ids {
                    let worker = WorkerId(*raw);
                    if ledger.positions.contains_key(&worker) {
                        return Err(LedgerRestoreError::DuplicateWorker(worker));
                    }
                    if !population.contains(worker) {
                        tracing::warn!("Dropping restored assignment for missing worker {}", worker);
                        continue;
                    }
                    ledger.insert(worker, JobAssignment { site, job });
                }
            }
        }

        let ids: Vec<WorkerId> = population.iter().map(|w| w.id).collect();
        for id in ids {
            population.sync_assignment(id, ledger.assignment_of(id));
        }

        let trimmed = ledger.trim_to_capacity(population, slots);
        if trimmed > 0 {
            tracing::warn!("Restored ledger exceeded capacity; released {} workers", trimmed);
        }
        Ok(ledger)
    }
}
