//! Worker fitness for a job
//!
//! fitness = age x health x happiness x skill, floored at 0.1 so nobody
//! ever produces nothing. Used both to pick workers and to scale output.

use crate::jobs::job_type::JobType;
use crate::population::worker::Laborer;

/// Lowest fitness any worker can have
pub const MIN_FITNESS: f32 = 0.1;

/// XP at which a relevant skill gives its full bonus
const SKILL_MASTERY_XP: f32 = 1000.0;
/// Largest bonus a skill can add
const MAX_SKILL_BONUS: f32 = 0.5;

/// Step function over age
pub fn age_factor(age: u32) -> f32 {
    match age {
        0..=17 => 0.7,
        18..=24 => 0.9,
        25..=45 => 1.0,
        46..=60 => 0.95,
        _ => 0.8,
    }
}

pub fn health_factor(health: f32) -> f32 {
    (health / 100.0).max(0.5)
}

pub fn happiness_factor(happiness: f32) -> f32 {
    (happiness / 100.0).max(0.7)
}

/// `1 + min(0.5, best_xp / 1000 * 0.5)` over the job's relevant skills
pub fn skill_factor(worker: &impl Laborer, job: JobType) -> f32 {
    let best_xp = job
        .relevant_skills()
        .iter()
        .map(|skill| worker.skill_xp(*skill))
        .max()
        .unwrap_or(0);
    1.0 + (best_xp as f32 / SKILL_MASTERY_XP * MAX_SKILL_BONUS).min(MAX_SKILL_BONUS)
}

/// How well a worker performs a job
pub fn worker_fitness(worker: &impl Laborer, job: JobType) -> f32 {
    let product = age_factor(worker.age())
        * health_factor(worker.health())
        * happiness_factor(worker.happiness())
        * skill_factor(worker, job);
    product.max(MIN_FITNESS)
}
