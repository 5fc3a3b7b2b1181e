//! Resource-need estimation
//!
//! Turns the current stockpile into per-resource urgency scores. Food is
//! measured in days of buffer, everything else against its storage cap.
//! Recomputed every allocation cycle; nothing here has side effects.

use ahash::AHashMap;

use crate::city::resource::ResourceType;
use crate::city::stockpile::ResourcePool;
use crate::core::config::LaborConfig;

/// Weight of a refined good's own cap urgency in its composite score
const OWN_NEED_WEIGHT: f32 = 0.6;
/// Weight of upstream availability in a refined good's composite score
const UPSTREAM_WEIGHT: f32 = 0.4;

/// Urgency per resource for one allocation cycle
///
/// Food ranges over `0..=food_buffer_days`; the rest over `0..=1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceNeeds {
    urgencies: AHashMap<ResourceType, f32>,
    food_days: f32,
}

impl ResourceNeeds {
    /// Urgency for a resource; unknown resources are not needed
    pub fn get(&self, resource: ResourceType) -> f32 {
        self.urgencies.get(&resource).copied().unwrap_or(0.0)
    }

    pub fn food(&self) -> f32 {
        self.get(ResourceType::Food)
    }

    /// Days the current food stock lasts; infinite with nobody to feed
    pub fn food_days(&self) -> f32 {
        self.food_days
    }

    /// Mean urgency across a set of resources
    pub fn mean_of(&self, resources: &[ResourceType]) -> f32 {
        if resources.is_empty() {
            return 0.0;
        }
        resources.iter().map(|r| self.get(*r)).sum::<f32>() / resources.len() as f32
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, f32)> + '_ {
        self.urgencies.iter().map(|(r, u)| (*r, *u))
    }
}

/// `max(0, 1 - stock / cap)`; a resource with no storage is not needed
pub fn cap_urgency(stock: f32, cap: f32) -> f32 {
    if cap <= 0.0 {
        return 0.0;
    }
    (1.0 - stock / cap).max(0.0)
}

/// Score every resource against the current stockpile
///
/// Refined goods blend their own need with how well stocked their input
/// is, so processing ramps up only once the raw buffer is healthy.
pub fn estimate_needs(pool: &ResourcePool, population: usize, config: &LaborConfig) -> ResourceNeeds {
    let mut urgencies = AHashMap::new();

    let daily_upkeep = population as f32 * config.food_upkeep_per_person;
    let food_days = if daily_upkeep > 0.0 {
        pool.get(ResourceType::Food) / daily_upkeep
    } else {
        f32::INFINITY
    };
    urgencies.insert(
        ResourceType::Food,
        (config.food_buffer_days - food_days).max(0.0),
    );

    for resource in ResourceType::ALL {
        if resource == ResourceType::Food {
            continue;
        }
        urgencies.insert(resource, cap_urgency(pool.get(resource), pool.capacity(resource)));
    }

    // Refined goods weigh upstream fullness (1 - urgency), not upstream
    // urgency: planks ramp up only once the wood buffer is healthy.
    let wood = urgencies.get(&ResourceType::Wood).copied().unwrap_or(0.0);
    let metal = urgencies.get(&ResourceType::Metal).copied().unwrap_or(0.0);
    for (refined, upstream) in [
        (ResourceType::Planks, wood),
        (ResourceType::Weapons, metal),
        (ResourceType::Tools, metal),
    ] {
        let own = urgencies.get(&refined).copied().unwrap_or(0.0);
        urgencies.insert(
            refined,
            OWN_NEED_WEIGHT * own + UPSTREAM_WEIGHT * (1.0 - upstream),
        );
    }

    ResourceNeeds {
        urgencies,
        food_days,
    }
}
