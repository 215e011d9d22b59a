//! Postgres implementation of [AuditLog]. The table is append only; nothing
//! in the service ever updates or deletes a row.
use crate::domain::ports::AuditLog;
use chrono::{DateTime, Utc};
use model::audit::{AuditAction, AuditLogEntry};
use sqlx::{PgPool, prelude::FromRow};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgAuditLog {
    pool: PgPool,
}

#[derive(Debug, Error)]
pub enum AuditLogErr {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    UnknownAction(#[from] strum::ParseError),
}

#[derive(FromRow)]
struct AuditRow {
    id: Uuid,
    document_id: Uuid,
    actor: String,
    action: String,
    metadata: serde_json::Value,
    recorded_at: DateTime<Utc>,
}

impl PgAuditLog {
    pub fn new(pool: PgPool) -> Self {
        PgAuditLog { pool }
    }
}

impl AuditLog for PgAuditLog {
    type Err = AuditLogErr;

    async fn append(&self, entry: AuditLogEntry) -> Result<(), Self::Err> {
        sqlx::query(
            r#"
                INSERT INTO audit_log (id, document_id, actor, action, metadata, recorded_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
        )
        .bind(entry.id)
        .bind(entry.document_id)
        .bind(&entry.actor)
        .bind(entry.action.to_string())
        .bind(&entry.metadata)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn entries_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, Self::Err> {
        sqlx::query_as::<_, AuditRow>(
            r#"
                SELECT id, document_id, actor, action, metadata, recorded_at
                FROM audit_log
                WHERE document_id = $1
                ORDER BY recorded_at DESC, id DESC
                "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| {
            Ok(AuditLogEntry {
                id: row.id,
                document_id: row.document_id,
                actor: row.actor,
                action: row.action.parse::<AuditAction>()?,
                metadata: row.metadata,
                recorded_at: row.recorded_at,
            })
        })
        .collect()
    }
}
