use axum::routing::{get, post, put};
use axum::Router;
use silo_protocol::endpoints;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::node::Node;

/// Build the axum router with all node endpoints.
pub fn build_router(node: Node) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::EPOCH, get(handler::epoch_handler))
        .route(endpoints::EPOCH_TICK, post(handler::epoch_tick_handler))
        .route(endpoints::OBJECT_PUT, post(handler::put_handler))
        .route(endpoints::OBJECT_GET, post(handler::get_handler))
        .route(endpoints::OBJECT_RANGE, post(handler::range_handler))
        .route(endpoints::OBJECT_HEAD, post(handler::head_handler))
        .route(endpoints::OBJECT_SEARCH, post(handler::search_handler))
        .route(endpoints::OBJECT_RANGE_HASH, post(handler::range_hash_handler))
        .route(endpoints::SESSION_CREATE, post(handler::create_session_handler))
        .route(endpoints::CONTAINER, put(handler::put_container_handler))
        .route(
            endpoints::CONTAINER_BY_ID,
            get(handler::get_container_handler).delete(handler::delete_container_handler),
        )
        .route(
            endpoints::CONTAINERS_BY_OWNER,
            get(handler::list_containers_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(node)
}
