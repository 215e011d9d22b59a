use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

mod status;
pub use status::*;

#[cfg(test)]
mod tests;

/// The overall lifecycle status of a document.
///
/// `draft` through `in_progress` follow the happy path; `rejected`, `voided`
/// and `trashed` are the off-ramps. `voided` is terminal, `trashed` is
/// recoverable through restore.
#[derive(
    EnumString, Display, Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Viewed,
    InProgress,
    Completed,
    Rejected,
    Voided,
    Trashed,
}

/// Per-version lifecycle label. The transition is one way: a finalized
/// version never becomes a draft again.
#[derive(
    EnumString, Display, Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VersionLabel {
    Draft,
    Final,
}

impl VersionLabel {
    pub fn is_draft(self) -> bool {
        matches!(self, VersionLabel::Draft)
    }
}

#[derive(
    EnumString, Display, Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    Signer,
    Viewer,
}

/// Per-recipient progress. `pending` means the recipient is queued behind
/// earlier signers in a sequential flow and has not been invited yet.
#[derive(
    EnumString, Display, Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecipientStatus {
    Sent,
    Pending,
    Signed,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// The recipient id
    pub id: Uuid,
    /// The recipient's email address
    pub email: String,
    pub role: RecipientRole,
    pub status: RecipientStatus,
    /// Position in the sequential signing order, lowest goes first
    pub order: i32,
    /// The time the recipient signed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    /// The time the recipient rejected the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl Recipient {
    pub fn is_signer(&self) -> bool {
        self.role == RecipientRole::Signer
    }

    pub fn has_signed(&self) -> bool {
        self.status == RecipientStatus::Signed
    }
}

/// One immutable snapshot of a document's rendered content.
///
/// Only the content of the single `draft` version may be overwritten; once
/// the label flips to `final` the snapshot is frozen and the next save
/// allocates a new version.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    /// Version number, monotonically increasing per document starting at 1
    pub number: i64,
    /// Opaque reference to the rendered content of this version
    pub content_ref: String,
    pub label: VersionLabel,
    /// Opaque credential authorizing unauthenticated signer access to this
    /// version. Unique within the document, allocated on first send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_token: Option<String>,
    /// The time this version was sent for signing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    /// The time the signing token stops resolving
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DocumentVersion {
    pub fn new(number: i64, content_ref: &str, now: DateTime<Utc>) -> Self {
        DocumentVersion {
            number,
            content_ref: content_ref.to_string(),
            label: VersionLabel::Draft,
            signing_token: None,
            sent_at: None,
            expires_at: None,
            created_at: now,
        }
    }

    /// Flips the label from draft to final. Finalizing an already final
    /// version is a no-op, the label never moves the other way.
    pub fn finalize(&mut self) {
        self.label = VersionLabel::Final;
    }

    pub fn token_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The document id
    pub id: Uuid,
    /// The user id of the owner
    pub owner: String,
    /// The display name of the document
    pub name: String,
    /// The stored status. Display status may differ, see [Document::resolve_status]
    pub status: DocumentStatus,
    /// All saved versions, ordered by version number ascending
    pub versions: Vec<DocumentVersion>,
    pub recipients: Vec<Recipient>,
    /// Completion evidence: stamped when the last required signer signs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft delete timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// The status the document held before it was trashed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_before_delete: Option<DocumentStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Creates a fresh draft document with version 1.
    pub fn new(id: Uuid, owner: &str, name: &str, content_ref: &str, now: DateTime<Utc>) -> Self {
        Document {
            id,
            owner: owner.to_string(),
            name: name.to_string(),
            status: DocumentStatus::Draft,
            versions: vec![DocumentVersion::new(1, content_ref, now)],
            recipients: Vec::new(),
            completed_at: None,
            deleted_at: None,
            status_before_delete: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The latest version. Every document carries at least one version, but
    /// the accessor stays total for partially loaded rows.
    pub fn current_version(&self) -> Option<&DocumentVersion> {
        self.versions.last()
    }

    pub fn current_version_mut(&mut self) -> Option<&mut DocumentVersion> {
        self.versions.last_mut()
    }

    pub fn version(&self, number: i64) -> Option<&DocumentVersion> {
        self.versions.iter().find(|v| v.number == number)
    }

    /// The number the next allocated version must carry.
    pub fn next_version_number(&self) -> i64 {
        self.versions.iter().map(|v| v.number).max().unwrap_or(0) + 1
    }

    pub fn is_completed(&self) -> bool {
        self.status == DocumentStatus::Completed
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// True when a signing token equal to `token` already exists on any
    /// version of this document.
    pub fn holds_token(&self, token: &str) -> bool {
        self.versions
            .iter()
            .any(|v| v.signing_token.as_deref() == Some(token))
    }
}
