//! City layer - buildings, construction sites, and the resource stockpile

pub mod building;
pub mod construction;
pub mod resource;
pub mod stockpile;

pub use building::{BuildingRecord, BuildingType};
pub use construction::{builder_ceiling, construction_active, ConstructionSite};
pub use resource::ResourceType;
pub use stockpile::{ResourceDelta, ResourcePool};
