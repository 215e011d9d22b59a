use crate::domain::models::{RejectRequest, SignRequest, SigningPackage};
use crate::domain::ports::SigningService;
use crate::inbound::axum::router::{SigningHandlerErr, SigningRouterState};
use axum::{
    Json,
    extract::{Path, State},
};
use model::response::ErrorResponse;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub token: String,
}

/// Resolves a signing link to the document package the signer sees.
/// Opening the link moves a freshly sent document to viewed.
#[utoipa::path(
        tag = "signing",
        get,
        path = "/signing/{token}",
        params(("token" = String, Path, description = "Opaque signing token")),
        responses(
            (status = 200, body=SigningPackage),
            (status = 404, body=ErrorResponse),
            (status = 410, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, token))]
pub async fn get_signing_package_handler<T>(
    State(state): State<SigningRouterState<T>>,
    Path(Params { token }): Path<Params>,
) -> Result<Json<SigningPackage>, SigningHandlerErr>
where
    T: SigningService,
{
    let package = state.service.signing_package(&token).await?;
    Ok(Json(package))
}

/// Records a signature for the recipient identified by the request email.
#[utoipa::path(
        tag = "signing",
        post,
        path = "/signing/{token}/sign",
        params(("token" = String, Path, description = "Opaque signing token")),
        request_body = SignRequest,
        responses(
            (status = 200, body=SigningPackage),
            (status = 400, body=ErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 409, body=ErrorResponse),
            (status = 410, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, token, req))]
pub async fn sign_handler<T>(
    State(state): State<SigningRouterState<T>>,
    Path(Params { token }): Path<Params>,
    Json(req): Json<SignRequest>,
) -> Result<Json<SigningPackage>, SigningHandlerErr>
where
    T: SigningService,
{
    tracing::info!("sign via token");
    let package = state.service.sign(&token, req).await?;
    Ok(Json(package))
}

/// Records a rejection for the recipient identified by the request email.
#[utoipa::path(
        tag = "signing",
        post,
        path = "/signing/{token}/reject",
        params(("token" = String, Path, description = "Opaque signing token")),
        request_body = RejectRequest,
        responses(
            (status = 200, body=SigningPackage),
            (status = 400, body=ErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 409, body=ErrorResponse),
            (status = 410, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, token, req))]
pub async fn reject_handler<T>(
    State(state): State<SigningRouterState<T>>,
    Path(Params { token }): Path<Params>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<SigningPackage>, SigningHandlerErr>
where
    T: SigningService,
{
    tracing::info!("reject via token");
    let package = state.service.reject(&token, req).await?;
    Ok(Json(package))
}
