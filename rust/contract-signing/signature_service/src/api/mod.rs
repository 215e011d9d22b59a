use crate::api::context::AppState;
use axum::{
    Router,
    middleware::from_fn,
    routing::{IntoMakeService, get},
};
use signing::inbound::axum::{documents_router, signing_links_router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod context;
mod health;
mod middleware;
mod swagger;

type Service = IntoMakeService<Router>;

pub fn service(app_state: AppState) -> Service {
    let cors = CorsLayer::permissive();

    let app = Router::new()
        .nest(
            "/documents",
            documents_router(app_state.signing.clone()).layer(from_fn(middleware::require_user)),
        )
        .nest("/signing", signing_links_router(app_state.signing.clone()))
        .merge(health::router().layer(cors.clone()))
        .route("/api-doc/openapi.json", get(swagger::openapi_handler))
        .layer(cors.clone())
        .layer(TraceLayer::new_for_http());

    app.into_make_service()
}
