// Model exports
pub mod domain;
pub mod responses;

pub use domain::{
    Coordinates, Distance, Location, Order, OrderId, OrderItem, OrderStatus, PaymentMethod,
    ProductId, Restaurant, RestaurantId,
};
pub use responses::{
    AssignmentNote, AssignmentView, AssignmentsResponse, ErrorResponse, HealthResponse,
    RankedRestaurant,
};
