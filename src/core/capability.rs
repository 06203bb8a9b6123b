use std::collections::HashMap;
use crate::models::{Order, ProductId, Restaurant};

/// Which restaurants can cook which products
///
/// Built once from every restaurant's menu, then queried per order. A
/// restaurant is eligible for an order when it has every distinct product of
/// the order marked available.
///
/// Lookup counts, per restaurant, how many required products it covers and
/// keeps the ones whose count reaches the size of the required set. That is
/// linear in the (restaurant, product) pairs touched.
#[derive(Debug, Clone)]
pub struct CapabilityIndex<'a> {
    restaurants: &'a [Restaurant],
    /// product id -> positions in `restaurants` that have it available
    providers: HashMap<ProductId, Vec<usize>>,
}

impl<'a> CapabilityIndex<'a> {
    pub fn build(restaurants: &'a [Restaurant]) -> Self {
        let mut providers: HashMap<ProductId, Vec<usize>> = HashMap::new();

        for (position, restaurant) in restaurants.iter().enumerate() {
            for product_id in restaurant.available_products() {
                providers.entry(product_id).or_default().push(position);
            }
        }

        tracing::trace!(
            "Built capability index: {} restaurants, {} products",
            restaurants.len(),
            providers.len()
        );

        Self { restaurants, providers }
    }

    /// Restaurants able to cook every product of `order`, in input order
    ///
    /// An order without items requires nothing, so every restaurant
    /// qualifies. Callers are expected to reject such orders beforehand.
    pub fn eligible_restaurants(&self, order: &Order) -> Vec<&'a Restaurant> {
        let required = order.required_products();
        if required.is_empty() {
            return self.restaurants.iter().collect();
        }

        let mut covered = vec![0usize; self.restaurants.len()];
        for product_id in &required {
            // Nobody offers this product: nobody is eligible
            let Some(positions) = self.providers.get(product_id) else {
                return Vec::new();
            };
            for &position in positions {
                covered[position] += 1;
            }
        }

        self.restaurants
            .iter()
            .zip(covered)
            .filter(|(_, count)| *count == required.len())
            .map(|(restaurant, _)| restaurant)
            .collect()
    }
}

/// One-shot helper for a single order
pub fn eligible_restaurants<'a>(order: &Order, restaurants: &'a [Restaurant]) -> Vec<&'a Restaurant> {
    CapabilityIndex::build(restaurants).eligible_restaurants(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus, PaymentMethod};
    use rust_decimal::Decimal;

    fn create_restaurant(id: i64, menu: &[(ProductId, bool)]) -> Restaurant {
        Restaurant {
            id,
            name: format!("Restaurant {}", id),
            address: format!("Street {}", id),
            contact_phone: String::new(),
            menu: menu.iter().copied().collect(),
        }
    }

    fn create_order(products: &[ProductId]) -> Order {
        Order {
            id: 1,
            firstname: "Anna".to_string(),
            lastname: "Ivanova".to_string(),
            phone_number: "+79990000000".to_string(),
            address: "Moscow".to_string(),
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
                    price_fixed: Decimal::ONE,
                })
                .collect(),
        }
    }

    fn ids(restaurants: &[&Restaurant]) -> Vec<i64> {
        restaurants.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_unavailable_product_excludes_restaurant() {
        let restaurants = vec![
            create_restaurant(1, &[(1, true), (2, true)]),
            create_restaurant(2, &[(1, true), (2, false)]),
        ];
        let order = create_order(&[1, 2]);

        assert_eq!(ids(&eligible_restaurants(&order, &restaurants)), vec![1]);
    }

    #[test]
    fn test_duplicate_items_count_once() {
        let restaurants = vec![create_restaurant(1, &[(1, true)])];
        let order = create_order(&[1, 1, 1]);

        assert_eq!(ids(&eligible_restaurants(&order, &restaurants)), vec![1]);
    }

    #[test]
    fn test_unknown_product_yields_nothing() {
        let restaurants = vec![
            create_restaurant(1, &[(1, true)]),
            create_restaurant(2, &[(1, true), (2, true)]),
        ];
        let order = create_order(&[1, 3]);

        assert!(eligible_restaurants(&order, &restaurants).is_empty());
    }

    #[test]
    fn test_empty_menu_is_never_eligible() {
        let restaurants = vec![create_restaurant(1, &[]), create_restaurant(2, &[(5, true)])];
        let order = create_order(&[5]);

        assert_eq!(ids(&eligible_restaurants(&order, &restaurants)), vec![2]);
    }

    #[test]
    fn test_empty_order_matches_everyone() {
        let restaurants = vec![create_restaurant(1, &[]), create_restaurant(2, &[(5, true)])];
        let order = create_order(&[]);

        assert_eq!(ids(&eligible_restaurants(&order, &restaurants)), vec![1, 2]);
    }

    #[test]
    fn test_index_is_reusable_across_orders() {
        let restaurants = vec![
            create_restaurant(1, &[(1, true), (2, true), (3, true)]),
            create_restaurant(2, &[(2, true), (3, true)]),
            create_restaurant(3, &[(3, true)]),
        ];
        let index = CapabilityIndex::build(&restaurants);

        assert_eq!(ids(&index.eligible_restaurants(&create_order(&[3]))), vec![1, 2, 3]);
        assert_eq!(ids(&index.eligible_restaurants(&create_order(&[2, 3]))), vec![1, 2]);
        assert_eq!(ids(&index.eligible_restaurants(&create_order(&[1, 3]))), vec![1]);
    }
}
