use std::cmp::Ordering;
use crate::core::distance::distance_between;
use crate::models::{Coordinates, Distance, RankedRestaurant, Restaurant};

/// Order candidates by distance from `origin`, closest first
///
/// Restaurants whose distance is undetermined (either side failed to
/// geocode) go after every known distance. The sort is stable, so equal
/// distances and the undetermined tail keep their input order.
pub fn rank(
    origin: Option<Coordinates>,
    candidates: Vec<(&Restaurant, Option<Coordinates>)>,
) -> Vec<RankedRestaurant> {
    let mut ranked: Vec<RankedRestaurant> = candidates
        .into_iter()
        .map(|(restaurant, coordinates)| RankedRestaurant {
            restaurant_id: restaurant.id,
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            distance: distance_between(origin, coordinates),
        })
        .collect();

    ranked.sort_by(|a, b| compare_distance(&a.distance, &b.distance));
    ranked
}

/// Known distances ascending, undetermined last
#[inline]
pub fn compare_distance(a: &Distance, b: &Distance) -> Ordering {
    match (a, b) {
        (Distance::Km(a), Distance::Km(b)) => a.total_cmp(b),
        (Distance::Km(_), Distance::Undetermined) => Ordering::Less,
        (Distance::Undetermined, Distance::Km(_)) => Ordering::Greater,
        (Distance::Undetermined, Distance::Undetermined) => Ordering::Equal,
    }
}
