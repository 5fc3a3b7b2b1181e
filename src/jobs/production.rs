//! Daily production from the assignment ledger
//!
//! Every (site, job, worker) triple yields the job's base amounts scaled by
//! worker fitness, the season's multiplier for that resource, and the
//! site's efficiency multiplier. Results stay fractional; rounding is the
//! caller's business.

use std::collections::BTreeMap;

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::city::resource::ResourceType;
use crate::city::stockpile::ResourceDelta;
use crate::core::calendar::Season;
use crate::core::config::LaborConfig;
use crate::core::types::{SiteId, WorkerId};
use crate::jobs::catalog::JobCatalog;
use crate::jobs::fitness::worker_fitness;
use crate::jobs::job_type::JobType;
use crate::jobs::ledger::AssignmentLedger;
use crate::population::roster::Population;

/// Units a gatherer brings back before multipliers
pub const GATHERER_YIELD: f32 = 1.0;

/// One worker's output of one resource for the day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub site: SiteId,
    pub job: JobType,
    pub worker: WorkerId,
    pub resource: ResourceType,
    pub amount: f32,
}

/// Aggregated line in a breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionLine {
    pub label: String,
    /// `None` for population upkeep
    pub job: Option<JobType>,
    pub workers: usize,
    pub amount: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceLines {
    pub income: Vec<ProductionLine>,
    pub expense: Vec<ProductionLine>,
}

impl ResourceLines {
    /// Income plus expense, upkeep included
    pub fn net(&self) -> f32 {
        self.income.iter().chain(&self.expense).map(|l| l.amount).sum()
    }
}

/// "Where did my resources come from" view of one day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductionBreakdown {
    /// Production only; upkeep is not subtracted
    pub totals: BTreeMap<ResourceType, f32>,
    pub resources: BTreeMap<ResourceType, ResourceLines>,
}

impl ProductionBreakdown {
    pub fn lines(&self, resource: ResourceType) -> Option<&ResourceLines> {
        self.resources.get(&resource)
    }

    pub fn net(&self, resource: ResourceType) -> f32 {
        self.lines(resource).map(ResourceLines::net).unwrap_or(0.0)
    }
}

/// Computes one day of output for the current season
#[derive(Debug, Clone, Copy)]
pub struct ProductionCalculator<'a> {
    catalog: &'a JobCatalog,
    config: &'a LaborConfig,
    season: Season,
    site_multipliers: &'a AHashMap<SiteId, f32>,
}

impl<'a> ProductionCalculator<'a> {
    pub fn new(
        catalog: &'a JobCatalog,
        config: &'a LaborConfig,
        season: Season,
        site_multipliers: &'a AHashMap<SiteId, f32>,
    ) -> Self {
        Self {
            catalog,
            config,
            season,
            site_multipliers,
        }
    }

    fn site_multiplier(&self, site: SiteId) -> f32 {
        self.site_multipliers.get(&site).copied().unwrap_or(1.0)
    }

    /// Per-worker, per-resource output in ledger order
    ///
    /// Ledger entries whose worker is gone or dead are skipped; the next
    /// reconciliation prunes them.
    pub fn contributions<R: Rng + ?Sized>(
        &self,
        ledger: &AssignmentLedger,
        population: &Population,
        rng: &mut R,
    ) -> Vec<Contribution> {
        let mut out = Vec::new();
        let seasons = self.catalog.seasons();

        for (site, job, worker_id) in ledger.iter() {
            let Some(worker) = population.get(worker_id).filter(|w| w.is_alive()) else {
                continue;
            };
            let scale = worker_fitness(worker, job) * self.site_multiplier(site);

            if job == JobType::Gatherer {
                if let Some(resource) = self.config.gatherer_candidates.choose(rng) {
                    out.push(Contribution {
                        site,
                        job,
                        worker: worker_id,
                        resource: *resource,
                        amount: GATHERER_YIELD * scale * seasons.get(self.season, *resource),
                    });
                }
                continue;
            }

            for (resource, base) in self.catalog.yield_for(job) {
                out.push(Contribution {
                    site,
                    job,
                    worker: worker_id,
                    resource: *resource,
                    amount: base * scale * seasons.get(self.season, *resource),
                });
            }
        }
        out
    }

    /// Summed deltas for the day
    pub fn daily_production<R: Rng + ?Sized>(
        &self,
        ledger: &AssignmentLedger,
        population: &Population,
        rng: &mut R,
    ) -> ResourceDelta {
        let mut totals = ResourceDelta::new();
        for c in self.contributions(ledger, population, rng) {
            *totals.entry(c.resource).or_insert(0.0) += c.amount;
        }
        totals
    }

    /// Income and expense lines per resource, grouped by job type
    pub fn breakdown<R: Rng + ?Sized>(
        &self,
        ledger: &AssignmentLedger,
        population: &Population,
        rng: &mut R,
    ) -> ProductionBreakdown {
        // (resource, job) -> (amount, workers)
        let mut grouped: BTreeMap<(ResourceType, JobType), (f32, usize)> = BTreeMap::new();
        let mut totals: BTreeMap<ResourceType, f32> = BTreeMap::new();

        for c in self.contributions(ledger, population, rng) {
            let entry = grouped.entry((c.resource, c.job)).or_insert((0.0, 0));
            entry.0 += c.amount;
            entry.1 += 1;
            *totals.entry(c.resource).or_insert(0.0) += c.amount;
        }

        let mut resources: BTreeMap<ResourceType, ResourceLines> = BTreeMap::new();
        for ((resource, job), (amount, workers)) in grouped {
            let line = ProductionLine {
                label: format!("{} x{}", job, workers),
                job: Some(job),
                workers,
                amount,
            };
            let lines = resources.entry(resource).or_default();
            if amount >= 0.0 {
                lines.income.push(line);
            } else {
                lines.expense.push(line);
            }
        }

        let mouths = population.living_count();
        if mouths > 0 {
            resources
                .entry(ResourceType::Food)
                .or_default()
                .expense
                .push(ProductionLine {
                    label: format!("population upkeep x{}", mouths),
                    job: None,
                    workers: mouths,
                    amount: -(mouths as f32) * self.config.food_upkeep_per_person,
                });
        }

        ProductionBreakdown { totals, resources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::{BuildingRecord, BuildingType};
    use crate::core::types::BuildingId;
    use crate::jobs::slots::SlotInventory;
    use crate::population::worker::{Skill, Worker, WorkerStatus};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    struct Fixture {
        catalog: JobCatalog,
        config: LaborConfig,
        population: Population,
        slots: SlotInventory,
        ledger: AssignmentLedger,
    }

    fn fixture(buildings: &[BuildingRecord]) -> Fixture {
        let catalog = JobCatalog::with_defaults();
        let config = LaborConfig::default();
        let slots = SlotInventory::from_buildings(buildings, &catalog, &config);
        Fixture {
            catalog,
            config,
            population: Population::new(),
            slots,
            ledger: AssignmentLedger::new(),
        }
    }

    impl Fixture {
        fn hire(&mut self, worker: Worker, site: SiteId, job: JobType) -> WorkerId {
            let id = self.population.insert(worker);
            self.ledger
                .assign(&mut self.population, &self.slots, id, site, job)
                .expect("slot available");
            id
        }
    }

    #[test]
    fn test_farmer_output_follows_season() {
        let farm = SiteId::Building(BuildingId(1));
        let mut f = fixture(&[BuildingRecord::built(BuildingId(1), BuildingType::Farm)]);
        f.hire(Worker::new(WorkerId(1), "Ada", 30), farm, JobType::Farmer);
        let multipliers = AHashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let summer = ProductionCalculator::new(&f.catalog, &f.config, Season::Summer, &multipliers)
            .daily_production(&f.ledger, &f.population, &mut rng);
        assert!(approx(summer[&ResourceType::Food], 5.625));

        let winter = ProductionCalculator::new(&f.catalog, &f.config, Season::Winter, &multipliers)
            .daily_production(&f.ledger, &f.population, &mut rng);
        assert!(approx(winter[&ResourceType::Food], 2.625));
    }

    #[test]
    fn test_site_multiplier_and_skill_scale_output() {
        let mine = SiteId::Building(BuildingId(4));
        let mut f = fixture(&[BuildingRecord::built(BuildingId(4), BuildingType::Mine)]);
        f.hire(
            Worker::new(WorkerId(1), "Cy", 30).with_skill(Skill::Mining, 1000),
            mine,
            JobType::Miner,
        );
        let mut multipliers = AHashMap::new();
        multipliers.insert(mine, 2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let out = ProductionCalculator::new(&f.catalog, &f.config, Season::Spring, &multipliers)
            .daily_production(&f.ledger, &f.population, &mut rng);
        // 1.0 base * 1.5 skill * 2.0 site
        assert!(approx(out[&ResourceType::Metal], 3.0));
    }

    #[test]
    fn test_processing_consumes_input() {
        let mill = SiteId::Building(BuildingId(2));
        let mut f = fixture(&[BuildingRecord::built(BuildingId(2), BuildingType::LumberMill)]);
        f.hire(Worker::new(WorkerId(1), "Di", 30), mill, JobType::Sawyer);
        let multipliers = AHashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let out = ProductionCalculator::new(&f.catalog, &f.config, Season::Summer, &multipliers)
            .daily_production(&f.ledger, &f.population, &mut rng);
        assert!(approx(out[&ResourceType::Wood], -2.0));
        assert!(approx(out[&ResourceType::Planks], 1.5));
    }

    #[test]
    fn test_gatherer_yields_one_candidate_unit() {
        let mut f = fixture(&[]);
        f.hire(Worker::new(WorkerId(1), "Ed", 30), SiteId::Global, JobType::Gatherer);
        let multipliers = AHashMap::new();
        let calc = ProductionCalculator::new(&f.catalog, &f.config, Season::Autumn, &multipliers);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let out = calc.contributions(&f.ledger, &f.population, &mut rng);
            assert_eq!(out.len(), 1);
            let c = out[0];
            assert!(f.config.gatherer_candidates.contains(&c.resource));
            let expected = f.catalog.seasons().get(Season::Autumn, c.resource);
            assert!(approx(c.amount, expected));
        }
    }

    #[test]
    fn test_breakdown_groups_jobs_and_adds_upkeep() {
        let farm = SiteId::Building(BuildingId(1));
        let farm2 = SiteId::Building(BuildingId(2));
        let mill = SiteId::Building(BuildingId(3));
        let mut f = fixture(&[
            BuildingRecord::built(BuildingId(1), BuildingType::Farm),
            BuildingRecord::built(BuildingId(2), BuildingType::Farm),
            BuildingRecord::built(BuildingId(3), BuildingType::LumberMill),
        ]);
        f.hire(Worker::new(WorkerId(1), "A", 30), farm, JobType::Farmer);
        f.hire(Worker::new(WorkerId(2), "B", 30), farm2, JobType::Farmer);
        f.hire(Worker::new(WorkerId(3), "C", 30), mill, JobType::Sawyer);
        f.population.insert(Worker::new(WorkerId(4), "Kid", 5));
        let multipliers = AHashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let breakdown = ProductionCalculator::new(&f.catalog, &f.config, Season::Spring, &multipliers)
            .breakdown(&f.ledger, &f.population, &mut rng);

        let food = breakdown.lines(ResourceType::Food).expect("food lines");
        assert_eq!(food.income.len(), 1);
        assert_eq!(food.income[0].job, Some(JobType::Farmer));
        assert_eq!(food.income[0].workers, 2);
        assert!(approx(food.income[0].amount, 2.0 * 3.75 * 1.2));
        assert_eq!(food.expense.len(), 1);
        assert_eq!(food.expense[0].job, None);
        assert!(approx(food.expense[0].amount, -4.0));
        assert!(approx(breakdown.net(ResourceType::Food), 9.0 - 4.0));
        assert!(approx(breakdown.totals[&ResourceType::Food], 9.0));

        let wood = breakdown.lines(ResourceType::Wood).expect("wood lines");
        assert!(wood.income.is_empty());
        assert_eq!(wood.expense[0].job, Some(JobType::Sawyer));
        assert!(approx(breakdown.net(ResourceType::Wood), -2.0));
    }

    #[test]
    fn test_dead_worker_produces_nothing() {
        let farm = SiteId::Building(BuildingId(1));
        let mut f = fixture(&[BuildingRecord::built(BuildingId(1), BuildingType::Farm)]);
        let id = f.hire(Worker::new(WorkerId(1), "Ada", 30), farm, JobType::Farmer);
        if let Some(w) = f.population.get_mut(id) {
            w.status = WorkerStatus::Dead;
        }
        let multipliers = AHashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let calc = ProductionCalculator::new(&f.catalog, &f.config, Season::Summer, &multipliers);

        let out = calc.daily_production(&f.ledger, &f.population, &mut rng);
        assert_eq!(out.get(&ResourceType::Food), None);

        let breakdown = calc.breakdown(&f.ledger, &f.population, &mut rng);
        assert!(breakdown.totals.get(&ResourceType::Food).is_none());
        assert!(approx(breakdown.net(ResourceType::Food), 0.0));
    }

    #[test]
    fn test_missing_worker_is_skipped() {
        let mut f = fixture(&[]);
        let id = f.hire(Worker::new(WorkerId(1), "Gone", 30), SiteId::Global, JobType::Gatherer);
        f.population.remove(id);
        let multipliers = AHashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let out = ProductionCalculator::new(&f.catalog, &f.config, Season::Spring, &multipliers)
            .daily_production(&f.ledger, &f.population, &mut rng);
        assert!(out.is_empty());
    }
}
