//! Job scoring and greedy allocation
//!
//! Each cycle:
//! 1. estimate resource needs
//! 2. release workers whose job no longer makes sense ([`Allocator::optimize`])
//! 3. score every open slot and sort, best first, job priority breaking ties
//! 4. fill each slot with the fittest worker still available ([`Allocator::auto_assign`])
//!
//! The fill is greedy per slot, not an optimal matching.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::city::construction::{builder_ceiling, construction_active, ConstructionSite};
use crate::city::resource::ResourceType;
use crate::city::stockpile::ResourcePool;
use crate::core::config::LaborConfig;
use crate::core::types::SiteId;
use crate::jobs::catalog::JobCatalog;
use crate::jobs::fitness::worker_fitness;
use crate::jobs::job_type::{JobCategory, JobType};
use crate::jobs::ledger::AssignmentLedger;
use crate::jobs::needs::{estimate_needs, ResourceNeeds};
use crate::jobs::slots::SlotInventory;
use crate::population::pool::{available_workers, WorkerView};
use crate::population::roster::Population;

/// Score given to processing jobs whose input is below its minimum
pub const STARVED_INPUT_SCORE: f32 = -15.0;
/// Score given to jobs with no present-day resource payoff
pub const NO_PAYOFF_SCORE: f32 = -20.0;
/// Builders while the staffing floor is unmet
const BUILDER_FLOOR_SCORE: f32 = 12.0;
/// Builders between the floor and the ceiling
const BUILDER_SCORE: f32 = 7.0;
/// Construction jobs with nothing to build
const IDLE_CONSTRUCTION_SCORE: f32 = -10.0;

/// How much one job type is worth filling this cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JobScore {
    pub value: f32,
    /// Hard precondition failed; the job is not filled at all
    pub gated: bool,
    /// Most workers this cycle may add across all sites
    pub max_fill: Option<usize>,
}

impl JobScore {
    fn open(value: f32) -> Self {
        Self {
            value,
            gated: false,
            max_fill: None,
        }
    }

    fn gated(value: f32) -> Self {
        Self {
            value,
            gated: true,
            max_fill: Some(0),
        }
    }
}

/// An open slot with its score, ready for sorting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredSlot {
    pub site: SiteId,
    pub job: JobType,
    pub available: u32,
    pub score: JobScore,
}

/// Construction staffing numbers for the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staffing {
    pub construction_active: bool,
    pub builder_ceiling: u32,
    pub builders: usize,
}

/// Scores and fills job slots
///
/// Holds only read-only configuration. Every collaborator is passed to
/// each call so one allocator can serve any number of villages.
#[derive(Debug, Clone, Copy)]
pub struct Allocator<'a> {
    catalog: &'a JobCatalog,
    config: &'a LaborConfig,
}

impl<'a> Allocator<'a> {
    pub fn new(catalog: &'a JobCatalog, config: &'a LaborConfig) -> Self {
        Self { catalog, config }
    }

    pub fn staffing(&self, construction: &[ConstructionSite], ledger: &AssignmentLedger) -> Staffing {
        Staffing {
            construction_active: construction_active(construction),
            builder_ceiling: builder_ceiling(
                construction,
                self.config.builder_work_per_day,
                self.config.construction_horizon_days,
                self.config.builder_floor,
            ),
            builders: ledger.count_of_type(JobType::Builder),
        }
    }

    /// Score a job type against current needs and staffing
    ///
    /// Never fails: a job the catalog does not know scores as no-payoff.
    pub fn score(
        &self,
        job: JobType,
        needs: &ResourceNeeds,
        stock: &ResourcePool,
        staffing: &Staffing,
    ) -> JobScore {
        if self.catalog.get(job).is_none() {
            return JobScore::open(NO_PAYOFF_SCORE);
        }

        let config = self.config;
        match job {
            JobType::Builder => {
                if !staffing.construction_active {
                    return JobScore::gated(IDLE_CONSTRUCTION_SCORE);
                }
                let ceiling = staffing.builder_ceiling as usize;
                if staffing.builders >= ceiling {
                    return JobScore::gated(IDLE_CONSTRUCTION_SCORE);
                }
                let value = if staffing.builders < config.builder_floor as usize {
                    BUILDER_FLOOR_SCORE
                } else {
                    BUILDER_SCORE
                };
                JobScore {
                    value,
                    gated: false,
                    max_fill: Some(ceiling - staffing.builders),
                }
            }
            JobType::Foreman => {
                if staffing.construction_active {
                    JobScore::open(6.0)
                } else {
                    JobScore::gated(IDLE_CONSTRUCTION_SCORE)
                }
            }
            JobType::Farmer => JobScore::open(10.0 * needs.food() + 1.0),
            JobType::Hunter => JobScore::open(9.0 * needs.food() + 0.8),
            JobType::Gatherer => {
                JobScore::open(2.0 * needs.mean_of(&config.gatherer_candidates) + 1.0)
            }
            JobType::Woodcutter => JobScore::open(6.0 * needs.get(ResourceType::Wood) + 1.0),
            JobType::Quarrier => JobScore::open(5.0 * needs.get(ResourceType::Stone) + 0.5),
            JobType::Miner => JobScore::open(4.0 * needs.get(ResourceType::Metal) + 0.5),
            JobType::Sawyer => self.processing_score(
                stock.get(ResourceType::Wood),
                config.min_wood_for_sawyers,
                config.comfortable_wood,
                needs.get(ResourceType::Planks),
            ),
            JobType::Blacksmith => self.processing_score(
                stock.get(ResourceType::Metal),
                config.min_metal_for_smiths,
                config.comfortable_metal,
                needs.get(ResourceType::Tools),
            ),
            JobType::Weaponsmith => self.processing_score(
                stock.get(ResourceType::Metal),
                config.min_metal_for_smiths,
                config.comfortable_metal,
                needs.get(ResourceType::Weapons),
            ),
            JobType::Merchant => JobScore::open(3.0 * needs.get(ResourceType::Gold)),
            JobType::Scholar | JobType::MilitaryTheorist | JobType::Wizard => {
                // optimize() empties these during a food crisis; keep them empty
                if needs.food() > config.food_crisis_urgency {
                    JobScore::gated(NO_PAYOFF_SCORE)
                } else {
                    JobScore::open(NO_PAYOFF_SCORE)
                }
            }
        }
    }

    /// Conversion jobs only run on a healthy input buffer
    fn processing_score(&self, input: f32, minimum: f32, comfortable: f32, need: f32) -> JobScore {
        if input < minimum {
            JobScore::gated(STARVED_INPUT_SCORE)
        } else if input < comfortable {
            JobScore::open(0.5 * need)
        } else {
            JobScore::open(4.0 * need + 1.0)
        }
    }

    /// Every open slot with its job's score, best first
    ///
    /// Ties go to the job with the higher fixed priority, then site order.
    pub fn scored_slots(
        &self,
        slots: &SlotInventory,
        ledger: &AssignmentLedger,
        needs: &ResourceNeeds,
        stock: &ResourcePool,
        staffing: &Staffing,
    ) -> Vec<ScoredSlot> {
        let mut cache: AHashMap<JobType, JobScore> = AHashMap::new();
        let mut scored: Vec<ScoredSlot> = slots
            .open_slots(ledger)
            .into_iter()
            .map(|open| {
                let score = *cache
                    .entry(open.job)
                    .or_insert_with(|| self.score(open.job, needs, stock, staffing));
                ScoredSlot {
                    site: open.site,
                    job: open.job,
                    available: open.available,
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            OrderedFloat(b.score.value)
                .cmp(&OrderedFloat(a.score.value))
                .then_with(|| a.job.priority_rank().cmp(&b.job.priority_rank()))
                .then_with(|| a.site.cmp(&b.site))
        });
        scored
    }

    /// Release workers whose job no longer has a reason to exist
    ///
    /// - nothing under construction: builders and foremen
    /// - input below its minimum: the processing jobs it feeds
    /// - food crisis: jobs with no present payoff
    /// - builders above the ceiling: the excess, newest first
    pub fn optimize(
        &self,
        population: &mut Population,
        ledger: &mut AssignmentLedger,
        stock: &ResourcePool,
        construction: &[ConstructionSite],
    ) -> usize {
        let config = self.config;
        let needs = estimate_needs(stock, population.living_count(), config);
        let staffing = self.staffing(construction, ledger);
        let mut released = 0;

        if !staffing.construction_active {
            released += ledger.release_all_of_type(population, JobType::Builder, None);
            released += ledger.release_all_of_type(population, JobType::Foreman, None);
        } else if staffing.builders > staffing.builder_ceiling as usize {
            let excess = staffing.builders - staffing.builder_ceiling as usize;
            released += ledger.release_all_of_type(population, JobType::Builder, Some(excess));
        }

        if stock.get(ResourceType::Wood) < config.min_wood_for_sawyers {
            released += ledger.release_all_of_type(population, JobType::Sawyer, None);
        }
        if stock.get(ResourceType::Metal) < config.min_metal_for_smiths {
            released += ledger.release_all_of_type(population, JobType::Blacksmith, None);
            released += ledger.release_all_of_type(population, JobType::Weaponsmith, None);
        }

        if needs.food() > config.food_crisis_urgency {
            for job in JobType::ALL {
                if job.category() == JobCategory::NoPayoff {
                    released += ledger.release_all_of_type(population, job, None);
                }
            }
        }

        if released > 0 {
            tracing::debug!("Optimization released {} workers", released);
        }
        released
    }

    /// Fill open slots from the available pool, best slot first
    ///
    /// Stops early when the pool runs dry. Returns the number assigned.
    pub fn auto_assign(
        &self,
        population: &mut Population,
        slots: &SlotInventory,
        ledger: &mut AssignmentLedger,
        stock: &ResourcePool,
        construction: &[ConstructionSite],
    ) -> usize {
        let mut pool = available_workers(population, self.config);
        if pool.is_empty() {
            return 0;
        }

        let needs = estimate_needs(stock, population.living_count(), self.config);
        let staffing = self.staffing(construction, ledger);
        let scored = self.scored_slots(slots, ledger, &needs, stock, &staffing);

        let mut budgets: AHashMap<JobType, usize> = AHashMap::new();
        let mut assigned = 0;

        for slot in scored {
            if slot.score.gated {
                continue;
            }
            let budget = budgets
                .entry(slot.job)
                .or_insert(slot.score.max_fill.unwrap_or(usize::MAX));

            for _ in 0..slot.available {
                if *budget == 0 || pool.is_empty() {
                    break;
                }
                let Some(index) = fittest(&pool, slot.job) else {
                    break;
                };
                let worker = pool.remove(index);
                match ledger.assign(population, slots, worker.id, slot.site, slot.job) {
                    Ok(()) => {
                        assigned += 1;
                        *budget -= 1;
                    }
                    Err(err) => tracing::debug!("Skipped {}: {}", worker.id, err),
                }
            }

            if pool.is_empty() {
                break;
            }
        }

        assigned
    }
}

/// Index of the fittest worker for a job; earlier workers win ties
fn fittest(pool: &[WorkerView], job: JobType) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, worker) in pool.iter().enumerate() {
        let fitness = worker_fitness(worker, job);
        match best {
            Some((_, top)) if fitness <= top => {}
            _ => best = Some((index, fitness)),
        }
    }
    best.map(|(index, _)| index)
}
