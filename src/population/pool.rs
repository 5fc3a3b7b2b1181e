//! Worker pool - who can be handed a job right now

use ahash::AHashMap;
use serde::Serialize;

use crate::core::config::LaborConfig;
use crate::core::types::WorkerId;
use crate::population::roster::Population;
use crate::population::worker::{JobAssignment, Laborer, Skill, Worker, WorkerStatus};

/// Detached copy of the fields the allocator needs
///
/// Changing a view never touches the underlying record.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerView {
    pub id: WorkerId,
    pub name: String,
    pub age: u32,
    pub skills: AHashMap<Skill, u32>,
    pub health: f32,
    pub happiness: f32,
    pub assignment: Option<JobAssignment>,
    pub status: WorkerStatus,
}

impl From<&Worker> for WorkerView {
    fn from(worker: &Worker) -> Self {
        Self {
            id: worker.id,
            name: worker.name.clone(),
            age: worker.age,
            skills: worker.skills.clone(),
            health: worker.health,
            happiness: worker.happiness,
            assignment: worker.assignment(),
            status: worker.status,
        }
    }
}

impl Laborer for WorkerView {
    fn age(&self) -> u32 {
        self.age
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn happiness(&self) -> f32 {
        self.happiness
    }

    fn skill_xp(&self, skill: Skill) -> u32 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }
}

/// Whether a worker may be given a job
///
/// All of: working age, healthy enough, unassigned, not the ruling leader,
/// not an excluded role, and not away/drafted/dead.
pub fn is_eligible(worker: &Worker, leader: Option<WorkerId>, config: &LaborConfig) -> bool {
    (config.min_work_age..=config.max_work_age).contains(&worker.age)
        && worker.health >= config.min_work_health
        && worker.assignment().is_none()
        && leader != Some(worker.id)
        && !config.excluded_roles.contains(&worker.role)
        && !config.blocked_statuses.contains(&worker.status)
}

/// Every worker currently available for assignment, in roster order
pub fn available_workers(population: &Population, config: &LaborConfig) -> Vec<WorkerView> {
    let leader = population.leader();
    population
        .iter()
        .filter(|w| is_eligible(w, leader, config))
        .map(WorkerView::from)
        .collect()
}
