use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    accept_booking::accept_booking, announcement_availability::announcement_availability,
    booking_ledger::booking_ledger, cancel_booking::cancel_booking,
    confirm_delivery::confirm_delivery, create_booking::create_booking,
    escrow_webhook::escrow_webhook, get_booking::get_booking, health::health_check,
    initiate_payment::initiate_payment, list_bookings::list_bookings,
    mark_delivered::mark_delivered, mark_in_transit::mark_in_transit,
    refuse_booking::refuse_booking, release_sweep::release_sweep,
};
use axum::{middleware, routing::get, routing::post, Router};
use packmule_core::{AppState, SecurityConfig};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn create_router(state: Arc<AppState>) -> Router {
    let public_router = create_public_routers();

    // protected routes (require JWT authentication)
    let protected_router = create_secured_routers(&state);

    Router::new()
        .merge(public_router)
        .merge(protected_router)
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)) // 1MB limit
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

fn create_secured_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", post(create_booking).get(list_bookings))
        .route("/api/bookings/{booking_id}", get(get_booking))
        .route("/api/bookings/{booking_id}/ledger", get(booking_ledger))
        .route("/api/bookings/{booking_id}/accept", post(accept_booking))
        .route("/api/bookings/{booking_id}/refuse", post(refuse_booking))
        .route("/api/bookings/{booking_id}/cancel", post(cancel_booking))
        .route("/api/bookings/{booking_id}/pay", post(initiate_payment))
        .route("/api/bookings/{booking_id}/transit", post(mark_in_transit))
        .route("/api/bookings/{booking_id}/delivered", post(mark_delivered))
        .route("/api/bookings/{booking_id}/confirm", post(confirm_delivery))
        .route(
            "/api/announcements/{announcement_id}/availability",
            get(announcement_availability),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_public_routers() -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/webhooks/escrow", post(escrow_webhook))
        .route("/api/internal/release_sweep", post(release_sweep))
        .route("/api/health", get(health_check))
}
