use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{bookings, events, health_check, pages};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    // `:event` is a slug for GET and an id for the write routes.
    let api = Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:event",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:event/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(pages::events_index))
        .route("/events/:slug", get(pages::event_detail))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
}
