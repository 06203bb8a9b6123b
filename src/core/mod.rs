// Core algorithm exports
pub mod capability;
pub mod distance;
pub mod pipeline;
pub mod ranking;

pub use capability::{eligible_restaurants, CapabilityIndex};
pub use distance::{distance_between, haversine_distance};
pub use pipeline::OrderAssignmentPipeline;
pub use ranking::{compare_distance, rank};
