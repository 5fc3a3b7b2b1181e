//! Stockpile - village-level resource storage

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::city::resource::ResourceType;

/// Signed per-resource amounts, e.g. one day's production
pub type ResourceDelta = AHashMap<ResourceType, f32>;

/// The village resource pool: current stock and storage cap per resource
///
/// Amounts are fractional; daily production rarely lands on whole units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    /// Resources stored: type -> (current, capacity)
    resources: AHashMap<ResourceType, (f32, f32)>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting caps for a fresh village
    pub fn with_default_caps() -> Self {
        let mut pool = Self::new();
        pool.set_capacity(ResourceType::Food, 200.0);
        pool.set_capacity(ResourceType::Wood, 150.0);
        pool.set_capacity(ResourceType::Stone, 150.0);
        pool.set_capacity(ResourceType::Metal, 100.0);
        pool.set_capacity(ResourceType::Planks, 100.0);
        pool.set_capacity(ResourceType::Weapons, 50.0);
        pool.set_capacity(ResourceType::Tools, 50.0);
        pool.set_capacity(ResourceType::Gold, 500.0);
        pool
    }

    /// Set capacity for a resource type
    pub fn set_capacity(&mut self, resource: ResourceType, capacity: f32) {
        let entry = self.resources.entry(resource).or_insert((0.0, 0.0));
        entry.1 = capacity.max(0.0);
        entry.0 = entry.0.min(entry.1);
    }

    /// Get current amount of a resource
    pub fn get(&self, resource: ResourceType) -> f32 {
        self.resources.get(&resource).map(|(c, _)| *c).unwrap_or(0.0)
    }

    /// Get capacity for a resource
    pub fn capacity(&self, resource: ResourceType) -> f32 {
        self.resources.get(&resource).map(|(_, cap)| *cap).unwrap_or(0.0)
    }

    /// Overwrite the stock of a resource, clamped to its cap
    pub fn set(&mut self, resource: ResourceType, amount: f32) {
        let entry = self.resources.entry(resource).or_insert((0.0, 100.0)); // Default capacity 100
        entry.0 = amount.clamp(0.0, entry.1);
    }

    /// Try to add resources, returns amount actually added
    pub fn add(&mut self, resource: ResourceType, amount: f32) -> f32 {
        let entry = self.resources.entry(resource).or_insert((0.0, 100.0)); // Default capacity 100
        let space = (entry.1 - entry.0).max(0.0);
        let added = amount.max(0.0).min(space);
        entry.0 += added;
        added
    }

    /// Try to remove resources, returns amount actually removed
    pub fn remove(&mut self, resource: ResourceType, amount: f32) -> f32 {
        if let Some(entry) = self.resources.get_mut(&resource) {
            let removed = amount.max(0.0).min(entry.0);
            entry.0 -= removed;
            removed
        } else {
            0.0
        }
    }

    /// Apply a signed delta, clamping every resource to `[0, cap]`
    pub fn apply_delta(&mut self, delta: &ResourceDelta) {
        for (resource, amount) in delta {
            if *amount >= 0.0 {
                self.add(*resource, *amount);
            } else {
                self.remove(*resource, -*amount);
            }
        }
    }
}
