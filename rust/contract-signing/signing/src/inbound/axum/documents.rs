use crate::domain::models::{
    BulkTrashRequest, CreateDocumentRequest, SaveDocumentRequest, SendForSigningRequest,
    TrashedDocument,
};
use crate::domain::ports::SigningService;
use crate::inbound::axum::router::{SigningHandlerErr, SigningRouterState};
use axum::{
    Json,
    extract::{Path, State},
};
use model::audit::AuditLogEntry;
use model::document::Document;
use model::response::{AffectedCountResponse, ErrorResponse, GenericSuccessResponse};
use model_user::axum_extractor::UserContextExtractor;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct Params {
    pub document_id: Uuid,
}

#[derive(Deserialize)]
pub struct VersionParams {
    pub document_id: Uuid,
    pub number: i64,
}

#[derive(serde::Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionContentResponse {
    /// Opaque reference to the rendered content of the requested version
    pub content_ref: String,
}

/// Lists the caller's documents, excluding anything in the trash.
#[utoipa::path(
        tag = "document",
        get,
        path = "/documents",
        responses(
            (status = 200, body=Vec<Document>),
            (status = 401, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn list_documents_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
) -> Result<Json<Vec<Document>>, SigningHandlerErr>
where
    T: SigningService,
{
    let documents = state
        .service
        .list_documents(&user.user_context.user_id)
        .await?;
    Ok(Json(documents))
}

/// Creates a new draft document with version 1.
#[utoipa::path(
        tag = "document",
        post,
        path = "/documents",
        request_body = CreateDocumentRequest,
        responses(
            (status = 200, body=Document),
            (status = 400, body=ErrorResponse),
            (status = 401, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user, req), fields(user_id=%user.user_context.user_id))]
pub async fn create_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    tracing::info!("create document");
    let document = state
        .service
        .create_document(&user.user_context.user_id, req)
        .await?;
    Ok(Json(document))
}

#[utoipa::path(
        tag = "document",
        get,
        path = "/documents/{document_id}",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=Document),
            (status = 403, body=ErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn get_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    let document = state
        .service
        .get_document(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(document))
}

/// Saves a rename and/or new content. Content lands in the current draft
/// version, or in a freshly allocated version once the draft was closed.
#[utoipa::path(
        tag = "document",
        patch,
        path = "/documents/{document_id}",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        request_body = SaveDocumentRequest,
        responses(
            (status = 200, body=Document),
            (status = 400, body=ErrorResponse),
            (status = 409, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user, req), fields(user_id=%user.user_context.user_id))]
pub async fn save_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
    Json(req): Json<SaveDocumentRequest>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    let document = state
        .service
        .save_document(&user.user_context.user_id, document_id, req)
        .await?;
    Ok(Json(document))
}

/// Finalizes the current draft version; the next save allocates a new one.
#[utoipa::path(
        tag = "document",
        post,
        path = "/documents/{document_id}/close",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=Document),
            (status = 409, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn close_version_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    let document = state
        .service
        .close_version(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(document))
}

/// Soft deletes a document. It appears in the trash until restored.
#[utoipa::path(
        tag = "document",
        delete,
        path = "/documents/{document_id}",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=GenericSuccessResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn trash_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<GenericSuccessResponse>, SigningHandlerErr>
where
    T: SigningService,
{
    tracing::info!("trash document");
    state
        .service
        .trash_document(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(GenericSuccessResponse::default()))
}

/// Soft deletes a batch of documents, skipping ids the caller does not own.
#[utoipa::path(
        tag = "document",
        delete,
        operation_id = "bulk_trash_documents",
        path = "/documents",
        request_body = BulkTrashRequest,
        responses(
            (status = 200, body=AffectedCountResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user, req), fields(user_id=%user.user_context.user_id))]
pub async fn bulk_trash_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Json(req): Json<BulkTrashRequest>,
) -> Result<Json<AffectedCountResponse>, SigningHandlerErr>
where
    T: SigningService,
{
    let affected = state
        .service
        .trash_documents_bulk(&user.user_context.user_id, req)
        .await?;
    Ok(Json(AffectedCountResponse { affected }))
}

/// Sends the document for signing. The status change commits before any
/// email goes out; delivery problems never surface here.
#[utoipa::path(
        tag = "document",
        post,
        path = "/documents/{document_id}/send",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        request_body = SendForSigningRequest,
        responses(
            (status = 200, body=Document),
            (status = 400, body=ErrorResponse),
            (status = 409, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user, req), fields(user_id=%user.user_context.user_id))]
pub async fn send_for_signing_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
    Json(req): Json<SendForSigningRequest>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    tracing::info!("send for signing");
    let document = state
        .service
        .send_for_signing(&user.user_context.user_id, document_id, req)
        .await?;
    Ok(Json(document))
}

/// Voids a document. Terminal, idempotent, and refused on completed
/// documents.
#[utoipa::path(
        tag = "document",
        post,
        path = "/documents/{document_id}/void",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=Document),
            (status = 409, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn void_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    let document = state
        .service
        .void_document(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(document))
}

/// Clears rejections back to sent and recomputes the document status.
#[utoipa::path(
        tag = "document",
        post,
        path = "/documents/{document_id}/reset",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=Document),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn reset_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    let document = state
        .service
        .reset_document(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(document))
}

/// Restores a trashed document, preferring its stashed prior status.
#[utoipa::path(
        tag = "document",
        post,
        path = "/documents/{document_id}/restore",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=Document),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn restore_document_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<Document>, SigningHandlerErr>
where
    T: SigningService,
{
    let document = state
        .service
        .restore_document(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(document))
}

/// Lists the caller's trashed documents with their display status.
#[utoipa::path(
        tag = "document",
        get,
        path = "/documents/trash",
        responses(
            (status = 200, body=Vec<TrashedDocument>),
            (status = 401, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn list_trash_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
) -> Result<Json<Vec<TrashedDocument>>, SigningHandlerErr>
where
    T: SigningService,
{
    let trash = state.service.list_trash(&user.user_context.user_id).await?;
    Ok(Json(trash))
}

/// Returns the content reference of one saved version, owner only.
#[utoipa::path(
        tag = "document",
        get,
        path = "/documents/{document_id}/versions/{number}",
        params(
            ("document_id" = Uuid, Path, description = "Document ID"),
            ("number" = i64, Path, description = "Version number"),
        ),
        responses(
            (status = 200, body=VersionContentResponse),
            (status = 403, body=ErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn get_version_content_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(VersionParams {
        document_id,
        number,
    }): Path<VersionParams>,
) -> Result<Json<VersionContentResponse>, SigningHandlerErr>
where
    T: SigningService,
{
    let content_ref = state
        .service
        .version_content(&user.user_context.user_id, document_id, number)
        .await?;
    Ok(Json(VersionContentResponse { content_ref }))
}

/// Lists the audit trail of a document, owner only.
#[utoipa::path(
        tag = "document",
        get,
        path = "/documents/{document_id}/audit",
        params(("document_id" = Uuid, Path, description = "Document ID")),
        responses(
            (status = 200, body=Vec<AuditLogEntry>),
            (status = 403, body=ErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
        )
    )]
#[tracing::instrument(skip(state, user), fields(user_id=%user.user_context.user_id))]
pub async fn get_audit_trail_handler<T>(
    State(state): State<SigningRouterState<T>>,
    user: UserContextExtractor,
    Path(Params { document_id }): Path<Params>,
) -> Result<Json<Vec<AuditLogEntry>>, SigningHandlerErr>
where
    T: SigningService,
{
    let entries = state
        .service
        .audit_trail(&user.user_context.user_id, document_id)
        .await?;
    Ok(Json(entries))
}
