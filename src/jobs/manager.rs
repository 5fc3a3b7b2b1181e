//! Job manager - one village's job engine
//!
//! Owns the static catalog and config plus the mutable slot table, ledger,
//! site multipliers and RNG. Population, buildings, stockpile and
//! construction queue belong to other systems and are passed in per call.
//! Each village gets its own manager; one daily tick runs at a time.

use std::path::Path;

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::city::building::BuildingRecord;
use crate::city::construction::ConstructionSite;
use crate::city::stockpile::{ResourceDelta, ResourcePool};
use crate::core::calendar::Season;
use crate::core::config::LaborConfig;
use crate::core::error::Result;
use crate::core::types::{SiteId, WorkerId};
use crate::jobs::allocator::Allocator;
use crate::jobs::catalog::JobCatalog;
use crate::jobs::job_type::JobType;
use crate::jobs::ledger::{AssignmentLedger, AssignmentRejected, LedgerSnapshot, ReleaseRejected};
use crate::jobs::needs::{estimate_needs, ResourceNeeds};
use crate::jobs::production::{ProductionBreakdown, ProductionCalculator};
use crate::jobs::slots::{OpenSlot, SlotInventory};
use crate::population::pool::{available_workers, WorkerView};
use crate::population::roster::Population;
use crate::population::worker::JobAssignment;

/// Outcome of one allocation cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub released: usize,
    pub assigned: usize,
    /// Open slots left after filling
    pub unfilled_slots: u32,
    /// Eligible workers left without a job
    pub idle_workers: usize,
}

#[derive(Debug, Clone)]
pub struct JobManager {
    catalog: JobCatalog,
    config: LaborConfig,
    slots: SlotInventory,
    ledger: AssignmentLedger,
    site_multipliers: AHashMap<SiteId, f32>,
    rng: ChaCha8Rng,
}

impl JobManager {
    /// Build a manager; the RNG is seeded from `config.rng_seed` when set
    pub fn new(catalog: JobCatalog, config: LaborConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut slots = SlotInventory::new();
        slots.refresh(&[], &catalog, &config);
        Ok(Self {
            catalog,
            config,
            slots,
            ledger: AssignmentLedger::new(),
            site_multipliers: AHashMap::new(),
            rng,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(JobCatalog::with_defaults(), LaborConfig::default())
    }

    /// Load the catalog and labor config from TOML files
    pub fn load(catalog_path: &Path, config_path: &Path) -> Result<Self> {
        let catalog = JobCatalog::load_from_toml(catalog_path)?;
        let config = LaborConfig::load_from_toml(config_path)?;
        Self::new(catalog, config)
    }

    /// Replace the RNG, e.g. with a seeded one for tests
    pub fn with_rng(mut self, rng: ChaCha8Rng) -> Self {
        self.rng = rng;
        self
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &LaborConfig {
        &self.config
    }

    pub fn slots(&self) -> &SlotInventory {
        &self.slots
    }

    pub fn ledger(&self) -> &AssignmentLedger {
        &self.ledger
    }

    // --- slots ---

    /// Rebuild the slot table and reconcile the ledger against it
    ///
    /// Reconciliation is eager: workers at vanished sites, entries for
    /// missing or dead workers, and workers above a shrunken capacity are
    /// released before this returns. Returns the number released.
    pub fn refresh_slots(&mut self, buildings: &[BuildingRecord], population: &mut Population) -> usize {
        self.slots.refresh(buildings, &self.catalog, &self.config);
        let ids: Vec<_> = buildings.iter().map(|b| b.id).collect();
        let orphans = self.ledger.reconcile_orphans(population, &ids);
        let trimmed = self.ledger.trim_to_capacity(population, &self.slots);
        orphans + trimmed
    }

    pub fn open_slots(&self) -> Vec<OpenSlot> {
        self.slots.open_slots(&self.ledger)
    }

    pub fn total_capacity(&self) -> u32 {
        self.slots.total_capacity()
    }

    pub fn available_workers(&self, population: &Population) -> Vec<WorkerView> {
        available_workers(population, &self.config)
    }

    // --- ledger ---

    pub fn assign(
        &mut self,
        population: &mut Population,
        worker: WorkerId,
        site: SiteId,
        job: JobType,
    ) -> std::result::Result<(), AssignmentRejected> {
        self.ledger.assign(population, &self.slots, worker, site, job)
    }

    pub fn release(
        &mut self,
        population: &mut Population,
        worker: WorkerId,
    ) -> std::result::Result<JobAssignment, ReleaseRejected> {
        self.ledger.release(population, worker)
    }

    pub fn release_all_of_type(
        &mut self,
        population: &mut Population,
        job: JobType,
        max_count: Option<usize>,
    ) -> usize {
        self.ledger.release_all_of_type(population, job, max_count)
    }

    pub fn count_of_type(&self, job: JobType) -> usize {
        self.ledger.count_of_type(job)
    }

    pub fn total_assigned(&self) -> usize {
        self.ledger.total_assigned()
    }

    pub fn assignment_of(&self, worker: WorkerId) -> Option<JobAssignment> {
        self.ledger.assignment_of(worker)
    }

    // --- allocation ---

    pub fn estimate_needs(&self, stock: &ResourcePool, population: &Population) -> ResourceNeeds {
        estimate_needs(stock, population.living_count(), &self.config)
    }

    /// Release workers whose jobs no longer make sense
    pub fn optimize(
        &mut self,
        population: &mut Population,
        stock: &ResourcePool,
        construction: &[ConstructionSite],
    ) -> usize {
        let allocator = Allocator::new(&self.catalog, &self.config);
        allocator.optimize(population, &mut self.ledger, stock, construction)
    }

    /// Fill open slots with the best available workers
    pub fn auto_assign(
        &mut self,
        population: &mut Population,
        stock: &ResourcePool,
        construction: &[ConstructionSite],
    ) -> usize {
        let allocator = Allocator::new(&self.catalog, &self.config);
        allocator.auto_assign(population, &self.slots, &mut self.ledger, stock, construction)
    }

    /// Optimize then fill
    pub fn run_allocation_cycle(
        &mut self,
        population: &mut Population,
        stock: &ResourcePool,
        construction: &[ConstructionSite],
    ) -> AllocationReport {
        let released = self.optimize(population, stock, construction);
        let assigned = self.auto_assign(population, stock, construction);
        let report = AllocationReport {
            released,
            assigned,
            unfilled_slots: self.open_slots().iter().map(|s| s.available).sum(),
            idle_workers: self.available_workers(population).len(),
        };
        tracing::info!(
            "Allocation cycle: released {}, assigned {}, {} slots open, {} workers idle",
            report.released,
            report.assigned,
            report.unfilled_slots,
            report.idle_workers
        );
        report
    }

    // --- production ---

    pub fn set_site_multiplier(&mut self, site: SiteId, multiplier: f32) {
        self.site_multipliers.insert(site, multiplier.max(0.0));
    }

    pub fn clear_site_multiplier(&mut self, site: SiteId) {
        self.site_multipliers.remove(&site);
    }

    pub fn site_multiplier(&self, site: SiteId) -> f32 {
        self.site_multipliers.get(&site).copied().unwrap_or(1.0)
    }

    fn calculator(&self, season: Season) -> ProductionCalculator<'_> {
        ProductionCalculator::new(&self.catalog, &self.config, season, &self.site_multipliers)
    }

    /// Today's production using the manager's own RNG
    pub fn daily_production(&mut self, population: &Population, season: Season) -> ResourceDelta {
        ProductionCalculator::new(&self.catalog, &self.config, season, &self.site_multipliers)
            .daily_production(&self.ledger, population, &mut self.rng)
    }

    /// Today's production drawing gatherer output from `rng`
    pub fn daily_production_with<R: Rng + ?Sized>(
        &self,
        population: &Population,
        season: Season,
        rng: &mut R,
    ) -> ResourceDelta {
        self.calculator(season).daily_production(&self.ledger, population, rng)
    }

    pub fn production_breakdown(&mut self, population: &Population, season: Season) -> ProductionBreakdown {
        ProductionCalculator::new(&self.catalog, &self.config, season, &self.site_multipliers)
            .breakdown(&self.ledger, population, &mut self.rng)
    }

    // --- persistence ---

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    /// Replace the ledger from a snapshot and resync worker records
    ///
    /// Call [`JobManager::refresh_slots`] first so the restored entries are
    /// checked against the current buildings.
    pub fn restore(&mut self, snapshot: &LedgerSnapshot, population: &mut Population) -> Result<()> {
        self.ledger = AssignmentLedger::restore(snapshot, population, &self.slots)?;
        Ok(())
    }
}
