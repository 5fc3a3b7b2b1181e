//! Worker records supplied by the population subsystem

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{SiteId, WorkerId};
use crate::jobs::job_type::JobType;

/// What a person is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Working,
    Traveling,
    Sick,
    Dead,
    Drafted,
    Away,
}

/// Background role; some roles never take ordinary jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Commoner,
    Monarch,
    Royal,
    Noble,
}

/// Trained skills, tracked as raw experience points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Farming,
    Hunting,
    Foraging,
    Woodcutting,
    Masonry,
    Mining,
    Carpentry,
    Smithing,
    Construction,
    Leadership,
    Trade,
    Scholarship,
    Tactics,
    Arcana,
    Combat,
}

/// A worker's single job: which site, which job type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobAssignment {
    pub site: SiteId,
    pub job: JobType,
}

/// One person who may be put to work
///
/// The assignment field is private: only the assignment ledger changes it,
/// through [`crate::population::Population`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub age: u32,
    /// 0-100
    pub health: f32,
    /// 0-100
    pub happiness: f32,
    pub skills: AHashMap<Skill, u32>,
    pub status: WorkerStatus,
    pub role: Role,
    assignment: Option<JobAssignment>,
}

impl Worker {
    /// A healthy, content, unskilled commoner
    pub fn new(id: WorkerId, name: impl Into<String>, age: u32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            health: 100.0,
            happiness: 100.0,
            skills: AHashMap::new(),
            status: WorkerStatus::Idle,
            role: Role::Commoner,
            assignment: None,
        }
    }

    pub fn with_skill(mut self, skill: Skill, xp: u32) -> Self {
        self.skills.insert(skill, xp);
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self
    }

    pub fn with_happiness(mut self, happiness: f32) -> Self {
        self.happiness = happiness;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_status(mut self, status: WorkerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn assignment(&self) -> Option<JobAssignment> {
        self.assignment
    }

    pub fn is_alive(&self) -> bool {
        self.status != WorkerStatus::Dead
    }

    pub(crate) fn set_assignment(&mut self, assignment: Option<JobAssignment>) {
        self.assignment = assignment;
    }
}

/// Read access to the traits that decide how well someone works
pub trait Laborer {
    fn age(&self) -> u32;
    fn health(&self) -> f32;
    fn happiness(&self) -> f32;
    fn skill_xp(&self, skill: Skill) -> u32;
}

impl Laborer for Worker {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_worker_defaults() {
        let w = Worker::new(WorkerId(1), "Ada", 30);
        assert_eq!(w.status, WorkerStatus::Idle);
        assert_eq!(w.role, Role::Commoner);
        assert_eq!(w.assignment(), None);
        assert!(w.is_alive());
        assert_eq!(w.skill_xp(Skill::Farming), 0);
    }

    #[test]
    fn test_builder_methods() {
        let w = Worker::new(WorkerId(2), "Bram", 40)
            .with_skill(Skill::Smithing, 500)
            .with_health(60.0)
            .with_happiness(20.0)
            .with_role(Role::Royal)
            .with_status(WorkerStatus::Sick);
        assert_eq!(w.skill_xp(Skill::Smithing), 500);
        assert_eq!(w.health, 60.0);
        assert_eq!(w.happiness, 20.0);
        assert_eq!(w.role, Role::Royal);
        assert_eq!(w.status, WorkerStatus::Sick);
    }
}
