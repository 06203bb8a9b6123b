use actix_web::{web, HttpResponse, Responder};
use crate::core::OrderAssignmentPipeline;
use crate::models::{AssignmentsResponse, ErrorResponse, HealthResponse};
use crate::services::PostgresClient;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub pipeline: OrderAssignmentPipeline,
}

/// Configure all order-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/orders/assignments", web::get().to(order_assignments));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Assignment view endpoint
///
/// GET /api/v1/orders/assignments
///
/// Lists every order waiting for a restaurant, each with the restaurants
/// able to cook it, closest first. `distanceKm` is `null` when either
/// address could not be geocoded.
async fn order_assignments(state: web::Data<AppState>) -> impl Responder {
    let orders = match state.postgres.fetch_unassigned_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            tracing::error!("Failed to fetch unassigned orders: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch orders".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let restaurants = match state.postgres.fetch_restaurants().await {
        Ok(restaurants) => restaurants,
        Err(e) => {
            tracing::error!("Failed to fetch restaurants: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch restaurants".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let views = state.pipeline.assignment_view(&orders, &restaurants).await;

    HttpResponse::Ok().json(AssignmentsResponse {
        total_orders: views.len(),
        orders: views,
        generated_at: chrono::Utc::now(),
    })
}
