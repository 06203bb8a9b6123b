// Unit tests for Foodcart Dispatch

use foodcart_dispatch::core::{
    capability::{eligible_restaurants, CapabilityIndex},
    distance::haversine_distance,
    ranking::rank,
};
use foodcart_dispatch::models::{
    Coordinates, Distance, Order, OrderItem, OrderStatus, PaymentMethod, ProductId, Restaurant,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

fn create_order(id: i64, products: &[ProductId]) -> Order {
    Order {
        id,
        firstname: "Test".to_string(),
        lastname: "Customer".to_string(),
        phone_number: "+79000000000".to_string(),
        address: format!("Order street {}", id),
        status: OrderStatus::New,
        payment_method: PaymentMethod::Specify,
        comment: String::new(),
        registered_at: chrono::Utc::now(),
        restaurant_to_cook: None,
        items: products
            .iter()
            .map(|&product_id| OrderItem {
                product_id,
                quantity: 1,
                price_fixed: Decimal::new(10000, 2),
            })
            .collect(),
    }
}

fn create_restaurant(id: i64, menu: &[(ProductId, bool)]) -> Restaurant {
    Restaurant {
        id,
        name: format!("Restaurant {}", id),
        address: format!("Restaurant street {}", id),
        contact_phone: String::new(),
        menu: menu.iter().copied().collect(),
    }
}

/// Menus for up to `products` products: missing, unavailable or available
fn menu_strategy(products: usize, restaurants: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Vec<Option<bool>>>> {
    prop::collection::vec(prop::collection::vec(prop::option::of(any::<bool>()), products), restaurants)
}

fn restaurants_from(menus: &[Vec<Option<bool>>]) -> Vec<Restaurant> {
    menus
        .iter()
        .enumerate()
        .map(|(i, menu)| {
            let entries: Vec<(ProductId, bool)> = menu
                .iter()
                .enumerate()
                .filter_map(|(product, availability)| availability.map(|a| (product as ProductId, a)))
                .collect();
            create_restaurant(i as i64 + 1, &entries)
        })
        .collect()
}

#[test]
fn test_haversine_distance_zero() {
    let point = Coordinates::new(55.7558, 37.6173);
    assert!(haversine_distance(point, point) < 0.01);
}

#[test]
fn test_haversine_distance_moscow_to_saint_petersburg() {
    // Roughly 634 km in a straight line
    let moscow = Coordinates::new(55.7558, 37.6173);
    let saint_petersburg = Coordinates::new(59.9343, 30.3351);

    let distance = haversine_distance(moscow, saint_petersburg);
    assert!(distance > 620.0 && distance < 650.0, "got {}", distance);
}

#[test]
fn test_eligibility_excludes_closer_incapable_restaurant() {
    let restaurants = vec![
        create_restaurant(1, &[(1, true), (2, true)]),
        create_restaurant(2, &[(1, true), (2, false)]),
    ];
    let order = create_order(1, &[1, 2]);

    let eligible: Vec<i64> = eligible_restaurants(&order, &restaurants)
        .iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(eligible, vec![1]);
}

proptest! {
    /// Counter-based eligibility agrees with a plain subset check, in input order
    #[test]
    fn test_eligibility_matches_brute_force(
        menus in menu_strategy(8, 1..12),
        products in prop::collection::vec(0i64..10, 1..5),
    ) {
        let restaurants = restaurants_from(&menus);
        let index = CapabilityIndex::build(&restaurants);
        let order = create_order(1, &products);

        let required: BTreeSet<ProductId> = products.iter().copied().collect();
        let expected: Vec<i64> = restaurants
            .iter()
            .filter(|r| {
                let available: BTreeSet<ProductId> = r.available_products().collect();
                required.is_subset(&available)
            })
            .map(|r| r.id)
            .collect();

        let actual: Vec<i64> = index.eligible_restaurants(&order).iter().map(|r| r.id).collect();
        let unindexed: Vec<i64> = eligible_restaurants(&order, &restaurants).iter().map(|r| r.id).collect();

        prop_assert_eq!(&actual, &expected);
        prop_assert_eq!(&unindexed, &expected);
    }

    /// Known distances ascend, undetermined ones trail, ties keep input order
    #[test]
    fn test_ranking_properties_hold(
        // Coarse grid so that ties actually happen
        cells in prop::collection::vec(prop::option::of((0u8..5, 0u8..5)), 1..15),
    ) {
        let origin = Coordinates::new(55.75, 37.61);
        let restaurants: Vec<Restaurant> = (1..=cells.len() as i64)
            .map(|id| create_restaurant(id, &[]))
            .collect();

        let candidates: Vec<(&Restaurant, Option<Coordinates>)> = restaurants
            .iter()
            .zip(&cells)
            .map(|(r, cell)| {
                let coordinates = cell.map(|(lat, lon)| {
                    Coordinates::new(55.70 + lat as f64 * 0.02, 37.55 + lon as f64 * 0.02)
                });
                (r, coordinates)
            })
            .collect();

        // Ids are assigned in input order
        let ranked = rank(Some(origin), candidates);
        prop_assert_eq!(ranked.len(), restaurants.len());

        let first_undetermined = ranked
            .iter()
            .position(|r| !r.distance.is_known())
            .unwrap_or(ranked.len());
        prop_assert!(ranked[first_undetermined..].iter().all(|r| r.distance == Distance::Undetermined));

        for pair in ranked.windows(2) {
            match (pair[0].distance, pair[1].distance) {
                (Distance::Km(a), Distance::Km(b)) => {
                    prop_assert!(a <= b);
                    if a == b {
                        prop_assert!(pair[0].restaurant_id < pair[1].restaurant_id);
                    }
                }
                (Distance::Undetermined, Distance::Undetermined) => {
                    prop_assert!(pair[0].restaurant_id < pair[1].restaurant_id);
                }
                (Distance::Km(_), Distance::Undetermined) => {}
                (Distance::Undetermined, Distance::Km(_)) => {
                    prop_assert!(false, "undetermined ranked before a known distance");
                }
            }
        }
    }
}
