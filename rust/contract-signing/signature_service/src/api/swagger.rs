use axum::Json;
use model::audit::{AuditAction, AuditLogEntry};
use model::document::{
    Document, DocumentStatus, DocumentVersion, Recipient, RecipientRole, RecipientStatus,
    VersionLabel,
};
use model::response::{AffectedCountResponse, ErrorResponse, GenericSuccessResponse};
use signing::domain::models::{
    BulkTrashRequest, CreateDocumentRequest, RecipientDraft, RejectRequest, SaveDocumentRequest,
    SendForSigningRequest, SignRequest, SigningPackage, TrashedDocument,
};
use signing::inbound::axum::documents::VersionContentResponse;
use signing::inbound::axum::{documents, signing_links};
use utoipa::OpenApi;

use super::health;

#[derive(OpenApi)]
#[openapi(
        paths(
            health::health_handler,
            documents::list_documents_handler,
            documents::create_document_handler,
            documents::get_document_handler,
            documents::save_document_handler,
            documents::close_version_handler,
            documents::trash_document_handler,
            documents::bulk_trash_handler,
            documents::list_trash_handler,
            documents::send_for_signing_handler,
            documents::void_document_handler,
            documents::reset_document_handler,
            documents::restore_document_handler,
            documents::get_version_content_handler,
            documents::get_audit_trail_handler,
            signing_links::get_signing_package_handler,
            signing_links::sign_handler,
            signing_links::reject_handler,
        ),
        components(
            schemas(
                Document,
                DocumentStatus,
                DocumentVersion,
                VersionLabel,
                Recipient,
                RecipientRole,
                RecipientStatus,
                AuditLogEntry,
                AuditAction,
                CreateDocumentRequest,
                SaveDocumentRequest,
                RecipientDraft,
                SendForSigningRequest,
                BulkTrashRequest,
                SignRequest,
                RejectRequest,
                TrashedDocument,
                SigningPackage,
                VersionContentResponse,
                ErrorResponse,
                GenericSuccessResponse,
                AffectedCountResponse,
            )
        )
    )]
pub struct ApiDoc;

pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
