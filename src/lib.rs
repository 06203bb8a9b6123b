//! Foodcart Dispatch - ranks capable restaurants for unassigned food orders
//!
//! For every order waiting for a restaurant, this library works out which
//! restaurants can cook all of its products and orders them by distance from
//! the delivery address. Addresses are geocoded through a persistent cache in
//! front of an external geocoder.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CapabilityIndex, OrderAssignmentPipeline, distance::haversine_distance, rank};
pub use models::{AssignmentView, Coordinates, Distance, Order, RankedRestaurant, Restaurant};
pub use services::{GeocodeCache, GeocodeProvider, GeocodeStore};
