use std::sync::Arc;
use tracing::Instrument;
use crate::core::{capability::CapabilityIndex, ranking::rank};
use crate::models::{AssignmentNote, AssignmentView, Order, Restaurant};
use crate::services::geocode_cache::{GeocodeCache, GeocodeSession};

/// Builds the manager's assignment view - implements the per-order pipeline
///
/// # Pipeline Stages
/// 1. Geocode the order's delivery address
/// 2. Capability filtering (restaurants able to cook every product)
/// 3. Geocode each eligible restaurant
/// 4. Rank by distance, undetermined last
///
/// Geocoding goes through a session, so each distinct address is resolved
/// at most once per run. A failed geocode only makes the affected distances
/// undetermined; it never drops an order or a restaurant.
#[derive(Clone)]
pub struct OrderAssignmentPipeline {
    geocoder: Arc<GeocodeCache>,
}

impl OrderAssignmentPipeline {
    pub fn new(geocoder: Arc<GeocodeCache>) -> Self {
        Self { geocoder }
    }

    /// Rank capable restaurants for every order awaiting assignment
    ///
    /// Orders that are not `NEW` or already have a restaurant are skipped.
    /// The result keeps the order of `orders`; orders nobody can cook for
    /// still get an entry with an empty candidate list.
    pub async fn assignment_view(
        &self,
        orders: &[Order],
        restaurants: &[Restaurant],
    ) -> Vec<AssignmentView> {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("assignment_run", %run_id);

        async move {
            let index = CapabilityIndex::build(restaurants);
            let session = self.geocoder.session(orders.len() + restaurants.len());

            let mut views = Vec::with_capacity(orders.len());
            for order in orders {
                if !order.awaits_assignment() {
                    tracing::debug!("Skipping order {} in status {:?}", order.id, order.status);
                    continue;
                }
                views.push(assign_order(order, &index, &session).await);
            }

            let unmatched = views.iter().filter(|view| view.candidates.is_empty()).count();
            tracing::info!(
                "Built assignment view for {} orders ({} without candidates) from {} restaurants",
                views.len(),
                unmatched,
                restaurants.len()
            );

            views
        }
        .instrument(span)
        .await
    }
}

async fn assign_order(
    order: &Order,
    index: &CapabilityIndex<'_>,
    session: &GeocodeSession<'_>,
) -> AssignmentView {
    let mut notes = Vec::new();

    // An order without items would match every restaurant
    if order.items.is_empty() {
        tracing::warn!("Order {} has no items, not matching restaurants", order.id);
        return AssignmentView {
            order: order.clone(),
            order_cost: order.cost(),
            origin: None,
            candidates: Vec::new(),
            notes: vec![AssignmentNote::EmptyOrder],
        };
    }

    // Stage 1: Origin
    let origin = session.resolve(&order.address).await;
    if origin.is_none() {
        notes.push(AssignmentNote::OriginUndetermined);
    }

    // Stage 2: Capability filtering
    let eligible = index.eligible_restaurants(order);
    if eligible.is_empty() {
        tracing::debug!("No restaurant can cook order {}", order.id);
        notes.push(AssignmentNote::NoEligibleRestaurant);
    }

    // Stage 3: Restaurant locations
    // Resolved even without an origin so the cache is warm for later runs
    let mut located = Vec::with_capacity(eligible.len());
    for restaurant in eligible {
        let coordinates = session.resolve(&restaurant.address).await;
        located.push((restaurant, coordinates));
    }

    // Stage 4: Ranking
    let candidates = rank(origin, located);

    tracing::debug!("Order {}: {} candidate restaurants", order.id, candidates.len());

    AssignmentView {
        order: order.clone(),
        order_cost: order.cost(),
        origin,
        candidates,
        notes,
    }
}
