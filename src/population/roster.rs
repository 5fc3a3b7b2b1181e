//! Population roster - owns every worker record
//!
//! The assignment ledger never holds worker records. It keeps ids and asks
//! the roster to update status and assignment through the methods below.

use ahash::AHashMap;

use crate::core::types::WorkerId;
use crate::population::worker::{JobAssignment, Worker, WorkerStatus};

#[derive(Debug, Clone, Default)]
pub struct Population {
    workers: Vec<Worker>,
    index: AHashMap<WorkerId, usize>,
    next_id: u64,
    leader: Option<WorkerId>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new unskilled commoner, returning its id
    pub fn spawn(&mut self, name: impl Into<String>, age: u32) -> WorkerId {
        let id = WorkerId(self.next_id);
        self.insert(Worker::new(id, name, age))
    }

    /// Insert a prepared worker, replacing any record with the same id
    ///
    /// A replaced record keeps its job assignment; only the ledger changes it.
    pub fn insert(&mut self, mut worker: Worker) -> WorkerId {
        let id = worker.id;
        self.next_id = self.next_id.max(id.0 + 1);
        match self.index.get(&id) {
            Some(&idx) => {
                let held = self.workers[idx].assignment();
                worker.set_assignment(held);
                if held.is_some() && worker.status == WorkerStatus::Idle {
                    worker.status = WorkerStatus::Working;
                }
                self.workers[idx] = worker;
            }
            None => {
                self.index.insert(id, self.workers.len());
                self.workers.push(worker);
            }
        }
        id
    }

    /// Remove a worker entirely (death, emigration)
    ///
    /// Callers must reconcile the job ledger afterwards.
    pub fn remove(&mut self, id: WorkerId) -> Option<Worker> {
        let idx = self.index.remove(&id)?;
        let worker = self.workers.swap_remove(idx);
        if let Some(moved) = self.workers.get(idx) {
            self.index.insert(moved.id, idx);
        }
        if self.leader == Some(id) {
            self.leader = None;
        }
        Some(worker)
    }

    pub fn get(&self, id: WorkerId) -> Option<&Worker> {
        self.index.get(&id).map(|&idx| &self.workers[idx])
    }

    pub fn get_mut(&mut self, id: WorkerId) -> Option<&mut Worker> {
        self.index.get(&id).map(|&idx| &mut self.workers[idx])
    }

    pub fn contains(&self, id: WorkerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Everyone who eats: all non-dead records
    pub fn living_count(&self) -> usize {
        self.workers.iter().filter(|w| w.is_alive()).count()
    }

    pub fn leader(&self) -> Option<WorkerId> {
        self.leader
    }

    pub fn set_leader(&mut self, leader: Option<WorkerId>) {
        self.leader = leader;
    }

    /// Mark a worker as holding a job. Fails if they already hold one.
    pub(crate) fn record_assignment(&mut self, id: WorkerId, assignment: JobAssignment) -> bool {
        match self.get_mut(id) {
            Some(worker) if worker.assignment().is_none() => {
                worker.set_assignment(Some(assignment));
                worker.status = WorkerStatus::Working;
                true
            }
            _ => false,
        }
    }

    /// Clear a worker's job and return them to idle
    ///
    /// Dead workers keep their status.
    pub(crate) fn clear_assignment(&mut self, id: WorkerId) -> Option<JobAssignment> {
        let worker = self.get_mut(id)?;
        let previous = worker.assignment();
        worker.set_assignment(None);
        if worker.status == WorkerStatus::Working {
            worker.status = WorkerStatus::Idle;
        }
        previous
    }

    /// Force a worker record to match the ledger after a load
    pub(crate) fn sync_assignment(&mut self, id: WorkerId, assignment: Option<JobAssignment>) {
        let Some(worker) = self.get_mut(id) else {
            return;
        };
        match assignment {
            Some(_) => {
                worker.set_assignment(assignment);
                if worker.is_alive() {
                    worker.status = WorkerStatus::Working;
                }
            }
            None => {
                worker.set_assignment(None);
                if worker.status == WorkerStatus::Working {
                    worker.status = WorkerStatus::Idle;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SiteId;
    use crate::jobs::job_type::JobType;

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let mut pop = Population::new();
        let a = pop.spawn("Alice", 20);
        let b = pop.spawn("Bob", 25);
        assert_ne!(a, b);
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.get(a).map(|w| w.name.as_str()), Some("Alice"));
    }

    #[test]
    fn test_insert_after_spawn_does_not_reuse_ids() {
        let mut pop = Population::new();
        pop.insert(Worker::new(WorkerId(10), "Ten", 30));
        let next = pop.spawn("Eleven", 30);
        assert_eq!(next, WorkerId(11));
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut pop = Population::new();
        let a = pop.spawn("Alice", 20);
        let b = pop.spawn("Bob", 25);
        let c = pop.spawn("Cleo", 30);
        pop.set_leader(Some(a));

        assert!(pop.remove(a).is_some());
        assert_eq!(pop.leader(), None);
        assert!(!pop.contains(a));
        assert_eq!(pop.get(b).map(|w| w.id), Some(b));
        assert_eq!(pop.get(c).map(|w| w.id), Some(c));
        assert!(pop.remove(a).is_none());
    }

    #[test]
    fn test_record_and_clear_assignment() {
        let mut pop = Population::new();
        let id = pop.spawn("Alice", 20);
        let job = JobAssignment {
            site: SiteId::Global,
            job: JobType::Builder,
        };

        assert!(pop.record_assignment(id, job));
        assert_eq!(pop.get(id).and_then(|w| w.assignment()), Some(job));
        assert_eq!(pop.get(id).map(|w| w.status), Some(WorkerStatus::Working));

        // Second job is refused
        assert!(!pop.record_assignment(id, job));

        assert_eq!(pop.clear_assignment(id), Some(job));
        assert_eq!(pop.get(id).map(|w| w.status), Some(WorkerStatus::Idle));
        assert_eq!(pop.get(id).and_then(|w| w.assignment()), None);
    }

    #[test]
    fn test_replacing_assigned_worker_keeps_job() {
        let mut pop = Population::new();
        let id = pop.spawn("Alice", 20);
        let job = JobAssignment {
            site: SiteId::Global,
            job: JobType::Gatherer,
        };
        assert!(pop.record_assignment(id, job));

        pop.insert(Worker::new(id, "Alice", 21).with_health(60.0));
        let worker = pop.get(id).expect("still present");
        assert_eq!(worker.age, 21);
        assert_eq!(worker.assignment(), Some(job));
        assert_eq!(worker.status, WorkerStatus::Working);
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn test_living_count_skips_dead() {
        let mut pop = Population::new();
        pop.spawn("Alice", 20);
        let b = pop.spawn("Bob", 80);
        if let Some(w) = pop.get_mut(b) {
            w.status = WorkerStatus::Dead;
        }
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.living_count(), 1);
    }
}
