use geo::{HaversineDistance, Point};
use crate::models::{Coordinates, Distance};

/// Great-circle distance between two points in kilometers
///
/// Uses the haversine formula over geo's mean Earth radius.
#[inline]
pub fn haversine_distance(from: Coordinates, to: Coordinates) -> f64 {
    let from: Point<f64> = from.into();
    let to: Point<f64> = to.into();
    from.haversine_distance(&to) / 1000.0
}

/// Distance between two optionally resolved points
///
/// If either side failed to geocode the distance is undetermined.
#[inline]
pub fn distance_between(from: Option<Coordinates>, to: Option<Coordinates>) -> Distance {
    match (from, to) {
        (Some(from), Some(to)) => Distance::Km(haversine_distance(from, to)),
        _ => Distance::Undetermined,
    }
}
