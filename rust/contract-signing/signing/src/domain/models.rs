use model::document::{Document, DocumentStatus, DocumentVersion, Recipient, RecipientRole};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SigningErr {
    #[error("document not found")]
    NotFound,
    #[error("document does not belong to the caller")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("signing link has expired")]
    TokenExpired,
    #[error("An internal server error has occurred")]
    Db(#[from] anyhow::Error),
}

impl SigningErr {
    pub fn validation(message: impl Into<String>) -> Self {
        SigningErr::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        SigningErr::Conflict(message.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    /// Display name for the new document
    pub name: String,
    /// Reference to the rendered content of version 1
    pub content_ref: String,
}

/// Body of a save. Omitted fields are left untouched; a new `content_ref`
/// overwrites the current draft or allocates a new version when the current
/// version is already final.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocumentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDraft {
    pub email: String,
    pub role: RecipientRole,
    /// Position in the sequential signing order, lowest goes first
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendForSigningRequest {
    /// Replaces the document's recipient list wholesale
    pub recipients: Vec<RecipientDraft>,
    /// Optional note included in the signature-request email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkTrashRequest {
    pub document_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// The signing recipient, matched against the recipient list by email
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A trashed document together with the status the resolver would display
/// for it. The stored status stays `trashed` until a restore saves a new
/// one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrashedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub display_status: DocumentStatus,
}

/// Everything an unauthenticated signer sees after their token resolves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigningPackage {
    pub document_id: Uuid,
    pub document_name: String,
    /// The single version this token is bound to
    pub version_number: i64,
    pub content_ref: String,
    pub status: DocumentStatus,
    pub recipients: Vec<Recipient>,
}

impl SigningPackage {
    pub fn from_document(document: &Document, version: &DocumentVersion) -> Self {
        SigningPackage {
            document_id: document.id,
            document_name: document.name.clone(),
            version_number: version.number,
            content_ref: version.content_ref.clone(),
            status: document.status,
            recipients: document.recipients.clone(),
        }
    }
}
