use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub type OrderId = i64;
pub type RestaurantId = i64;
pub type ProductId = i64;

/// A resolved point on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Finite latitude within ±90 and longitude within ±180
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<Coordinates> for geo::Point<f64> {
    fn from(value: Coordinates) -> Self {
        // geo points are (x = lon, y = lat)
        geo::Point::new(value.longitude, value.latitude)
    }
}

/// Lifecycle of an order
///
/// `NEW -> COOKING -> IN_DELIVERY -> FINISHED`, with `CANCELED` reachable
/// from `NEW` or `COOKING`. Transitions are performed by the assign/dispatch
/// actions outside this crate; the dispatch core only reads the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Cooking,
    InDelivery,
    Finished,
    Canceled,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (New, Cooking)
                | (Cooking, InDelivery)
                | (InDelivery, Finished)
                | (New, Canceled)
                | (Cooking, Canceled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Specify,
    Cash,
    CardOnline,
    CardDelivery,
    Crypto,
}

/// One line of an order; the price is fixed at ordering time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(rename = "priceFixed")]
    pub price_fixed: Decimal,
}

/// Customer order as stored by the intake side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub firstname: String,
    pub lastname: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub address: String,
    pub status: OrderStatus,
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "registeredAt")]
    pub registered_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "restaurantToCook")]
    pub restaurant_to_cook: Option<RestaurantId>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Distinct product ids the order requires
    pub fn required_products(&self) -> BTreeSet<ProductId> {
        self.items.iter().map(|item| item.product_id).collect()
    }

    /// Whether a manager still has to pick a restaurant for this order
    pub fn awaits_assignment(&self) -> bool {
        self.status == OrderStatus::New && self.restaurant_to_cook.is_none()
    }

    pub fn cost(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price_fixed * Decimal::from(item.quantity))
            .sum()
    }
}

/// Restaurant with its per-product availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
    /// product id -> currently on sale
    #[serde(default)]
    pub menu: HashMap<ProductId, bool>,
}

impl Restaurant {
    /// Product ids this restaurant can cook right now
    pub fn available_products(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.menu
            .iter()
            .filter(|(_, available)| **available)
            .map(|(product_id, _)| *product_id)
    }
}

/// Persisted geocode cache entry, keyed by the raw address string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub coordinates: Coordinates,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Distance from an order to a restaurant
///
/// `Undetermined` means either side could not be geocoded. It serializes as
/// `null` and sorts after every known distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Km(f64),
    Undetermined,
}

impl Distance {
    pub fn km(&self) -> Option<f64> {
        match self {
            Distance::Km(km) => Some(*km),
            Distance::Undetermined => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Distance::Km(_))
    }
}
