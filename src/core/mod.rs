pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, Season, SeasonalModifiers};
pub use config::{LaborConfig, SlotScaling};
pub use types::{BuildingId, SiteId, WorkerId};
