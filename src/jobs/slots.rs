//! Slot inventory - how many of each job every site offers
//!
//! Rebuilt from the building list on every refresh. The global site is
//! always present so there is builder and gatherer work before anything
//! has been constructed.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::city::building::BuildingRecord;
use crate::core::config::LaborConfig;
use crate::core::types::{BuildingId, SiteId};
use crate::jobs::catalog::JobCatalog;
use crate::jobs::job_type::JobType;
use crate::jobs::ledger::AssignmentLedger;

/// Capacity vs. fill for one (site, job) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenSlot {
    pub site: SiteId,
    pub job: JobType,
    pub capacity: u32,
    pub filled: u32,
    pub available: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SlotInventory {
    capacity: BTreeMap<(SiteId, JobType), u32>,
}

impl SlotInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory straight from a building list
    pub fn from_buildings(
        buildings: &[BuildingRecord],
        catalog: &JobCatalog,
        config: &LaborConfig,
    ) -> Self {
        let mut inventory = Self::new();
        inventory.refresh(buildings, catalog, config);
        inventory
    }

    /// Rebuild the whole table from the current buildings
    pub fn refresh(&mut self, buildings: &[BuildingRecord], catalog: &JobCatalog, config: &LaborConfig) {
        self.capacity.clear();

        self.insert(SiteId::Global, JobType::Builder, config.global_builder_slots);
        self.insert(SiteId::Global, JobType::Gatherer, config.global_gatherer_slots);

        for building in buildings.iter().filter(|b| b.offers_jobs()) {
            for spec in catalog.jobs_for_building(building.building_type) {
                let slots = config.slot_scaling.slots(spec.base_slots, building.level);
                self.insert(SiteId::Building(building.id), spec.job, slots);
            }
        }
    }

    fn insert(&mut self, site: SiteId, job: JobType, slots: u32) {
        if slots > 0 {
            self.capacity.insert((site, job), slots);
        }
    }

    /// Slots for a pair; zero when the pair is not defined
    pub fn capacity(&self, site: SiteId, job: JobType) -> u32 {
        self.capacity.get(&(site, job)).copied().unwrap_or(0)
    }

    pub fn contains(&self, site: SiteId, job: JobType) -> bool {
        self.capacity.contains_key(&(site, job))
    }

    pub fn has_site(&self, site: SiteId) -> bool {
        self.capacity.keys().any(|(s, _)| *s == site)
    }

    /// Building ids that currently offer at least one slot
    pub fn buildings(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.capacity.keys().filter_map(|(s, _)| s.building()).collect();
        ids.dedup();
        ids
    }

    pub fn total_capacity(&self) -> u32 {
        self.capacity.values().sum()
    }

    pub fn capacity_of_type(&self, job: JobType) -> u32 {
        self.capacity
            .iter()
            .filter(|((_, j), _)| *j == job)
            .map(|(_, slots)| *slots)
            .sum()
    }

    /// Every (site, job, slots) entry in site order
    pub fn iter(&self) -> impl Iterator<Item = (SiteId, JobType, u32)> + '_ {
        self.capacity.iter().map(|((site, job), slots)| (*site, *job, *slots))
    }

    /// Every pair with its current fill from the ledger
    pub fn slot_status(&self, ledger: &AssignmentLedger) -> Vec<OpenSlot> {
        self.iter()
            .map(|(site, job, capacity)| {
                let filled = ledger.fill(site, job) as u32;
                OpenSlot {
                    site,
                    job,
                    capacity,
                    filled,
                    available: capacity.saturating_sub(filled),
                }
            })
            .collect()
    }

    /// Pairs with at least one free slot
    pub fn open_slots(&self, ledger: &AssignmentLedger) -> Vec<OpenSlot> {
        self.slot_status(ledger)
            .into_iter()
            .filter(|slot| slot.available > 0)
            .collect()
    }
}
