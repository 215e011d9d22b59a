use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// The action tag recorded with every audit entry.
#[derive(
    EnumString, Display, Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Saved,
    VersionClosed,
    Sent,
    Viewed,
    Signed,
    Rejected,
    Reset,
    Voided,
    Trashed,
    Restored,
}

/// One append-only audit record. Entries are never mutated after the write.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub document_id: Uuid,
    /// The owner's user id, a recipient email, or `signing_link` for
    /// anonymous token-gated reads
    pub actor: String,
    pub action: AuditAction,
    /// Free-form metadata attached by the operation
    pub metadata: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(document_id: Uuid, actor: &str, action: AuditAction) -> Self {
        AuditLogEntry {
            id: Uuid::new_v4(),
            document_id,
            actor: actor.to_string(),
            action,
            metadata: serde_json::Value::Null,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
