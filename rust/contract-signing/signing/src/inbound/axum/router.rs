use crate::domain::{models::SigningErr, ports::SigningService};
use crate::inbound::axum::{documents, signing_links};
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use model_error_response::ErrorResponse;
use std::sync::Arc;
use thiserror::Error;

/// Shared state for the signing routers: one service behind an [Arc] so the
/// router stays cheap to clone.
pub struct SigningRouterState<T> {
    pub(crate) service: Arc<T>,
}

impl<T> Clone for SigningRouterState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T> SigningRouterState<T>
where
    T: SigningService,
{
    pub fn new(service: T) -> Self {
        SigningRouterState {
            service: Arc::new(service),
        }
    }
}

#[derive(Debug, Error)]
pub enum SigningHandlerErr {
    #[error(transparent)]
    Domain(#[from] SigningErr),
}

impl IntoResponse for SigningHandlerErr {
    fn into_response(self) -> axum::response::Response {
        let SigningHandlerErr::Domain(err) = self;
        let status = match &err {
            SigningErr::NotFound => StatusCode::NOT_FOUND,
            SigningErr::Forbidden => StatusCode::FORBIDDEN,
            SigningErr::Validation(_) => StatusCode::BAD_REQUEST,
            SigningErr::Conflict(_) => StatusCode::CONFLICT,
            SigningErr::TokenExpired => StatusCode::GONE,
            SigningErr::Db(e) => {
                tracing::error!(error=?e, "signing operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorResponse {
                message: &err.to_string(),
            }),
        )
            .into_response()
    }
}

/// Owner-scoped document routes. The caller mounts this behind the auth
/// middleware that attaches the [model_user::UserContext] extension.
pub fn documents_router<T, S>(state: SigningRouterState<T>) -> Router<S>
where
    T: SigningService,
    S: Send + Sync + Clone + 'static,
{
    Router::new()
        .route(
            "/",
            get(documents::list_documents_handler)
                .post(documents::create_document_handler)
                .delete(documents::bulk_trash_handler),
        )
        .route("/trash", get(documents::list_trash_handler))
        .route(
            "/:document_id",
            get(documents::get_document_handler)
                .patch(documents::save_document_handler)
                .delete(documents::trash_document_handler),
        )
        .route("/:document_id/close", post(documents::close_version_handler))
        .route("/:document_id/send", post(documents::send_for_signing_handler))
        .route("/:document_id/void", post(documents::void_document_handler))
        .route("/:document_id/reset", post(documents::reset_document_handler))
        .route(
            "/:document_id/restore",
            post(documents::restore_document_handler),
        )
        .route(
            "/:document_id/versions/:number",
            get(documents::get_version_content_handler),
        )
        .route("/:document_id/audit", get(documents::get_audit_trail_handler))
        .with_state(state)
}

/// Token-gated signer routes. Mounted without any auth layer; the opaque
/// token is the whole credential.
pub fn signing_links_router<T, S>(state: SigningRouterState<T>) -> Router<S>
where
    T: SigningService,
    S: Send + Sync + Clone + 'static,
{
    Router::new()
        .route("/:token", get(signing_links::get_signing_package_handler))
        .route("/:token/sign", post(signing_links::sign_handler))
        .route("/:token/reject", post(signing_links::reject_handler))
        .with_state(state)
}
