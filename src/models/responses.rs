use serde::{Deserialize, Serialize};
use crate::models::domain::{Coordinates, Distance, Order, RestaurantId};

/// A capable restaurant together with its distance to the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRestaurant {
    #[serde(rename = "restaurantId")]
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub address: String,
    #[serde(rename = "distanceKm")]
    pub distance: Distance,
}

/// Why an assignment view entry may need a manager's attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentNote {
    /// Order has no line items; nothing was matched
    EmptyOrder,
    /// Delivery address could not be geocoded
    OriginUndetermined,
    /// No restaurant can cook every product in the order
    NoEligibleRestaurant,
}

/// Read-only view of one order and the restaurants that can fulfil it,
/// closest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    pub order: Order,
    #[serde(rename = "orderCost")]
    pub order_cost: rust_decimal::Decimal,
    pub origin: Option<Coordinates>,
    pub candidates: Vec<RankedRestaurant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<AssignmentNote>,
}

/// Response for the assignment view endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentsResponse {
    pub orders: Vec<AssignmentView>,
    #[serde(rename = "totalOrders")]
    pub total_orders: usize,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
