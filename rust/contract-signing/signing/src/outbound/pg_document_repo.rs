//! Postgres implementation of [DocumentRepo]. Documents load as whole
//! aggregates and save as whole aggregates inside one transaction.
use crate::domain::ports::DocumentRepo;
use chrono::{DateTime, Utc};
use model::document::{
    Document, DocumentStatus, DocumentVersion, Recipient, RecipientRole, RecipientStatus,
    VersionLabel,
};
use sqlx::{PgPool, Postgres, Transaction, prelude::FromRow};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgDocumentRepo {
    pool: PgPool,
}

/// the types of errors that can occur on [PgDocumentRepo]
#[derive(Debug, Error)]
pub enum DocumentRepoErr {
    /// there was a sqlx error
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    /// the database contained an unknown status or role value
    #[error(transparent)]
    UnknownVariant(#[from] strum::ParseError),
}

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    owner: String,
    name: String,
    status: String,
    completed_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    status_before_delete: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct VersionRow {
    document_id: Uuid,
    number: i64,
    content_ref: String,
    label: String,
    signing_token: Option<String>,
    sent_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct RecipientRow {
    document_id: Uuid,
    id: Uuid,
    email: String,
    role: String,
    status: String,
    sign_order: i32,
    signed_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
}

impl DocumentRow {
    fn into_document(
        self,
        versions: Vec<DocumentVersion>,
        recipients: Vec<Recipient>,
    ) -> Result<Document, DocumentRepoErr> {
        Ok(Document {
            id: self.id,
            owner: self.owner,
            name: self.name,
            status: self.status.parse::<DocumentStatus>()?,
            versions,
            recipients,
            completed_at: self.completed_at,
            deleted_at: self.deleted_at,
            status_before_delete: self
                .status_before_delete
                .map(|s| s.parse::<DocumentStatus>())
                .transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl VersionRow {
    fn into_version(self) -> Result<DocumentVersion, DocumentRepoErr> {
        Ok(DocumentVersion {
            number: self.number,
            content_ref: self.content_ref,
            label: self.label.parse::<VersionLabel>()?,
            signing_token: self.signing_token,
            sent_at: self.sent_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

impl RecipientRow {
    fn into_recipient(self) -> Result<Recipient, DocumentRepoErr> {
        Ok(Recipient {
            id: self.id,
            email: self.email,
            role: self.role.parse::<RecipientRole>()?,
            status: self.status.parse::<RecipientStatus>()?,
            order: self.sign_order,
            signed_at: self.signed_at,
            rejected_at: self.rejected_at,
        })
    }
}

impl PgDocumentRepo {
    pub fn new(pool: PgPool) -> Self {
        PgDocumentRepo { pool }
    }

    async fn fetch_document_row(
        &self,
        id: Uuid,
    ) -> Result<Option<DocumentRow>, DocumentRepoErr> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
                SELECT id, owner, name, status, completed_at, deleted_at,
                       status_before_delete, created_at, updated_at
                FROM document
                WHERE id = $1
                "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn assemble(&self, row: DocumentRow) -> Result<Document, DocumentRepoErr> {
        let versions = sqlx::query_as::<_, VersionRow>(
            r#"
                SELECT document_id, number, content_ref, label, signing_token,
                       sent_at, expires_at, created_at
                FROM document_version
                WHERE document_id = $1
                ORDER BY number
                "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(VersionRow::into_version)
        .collect::<Result<Vec<_>, _>>()?;

        let recipients = sqlx::query_as::<_, RecipientRow>(
            r#"
                SELECT document_id, id, email, role, status, sign_order,
                       signed_at, rejected_at
                FROM recipient
                WHERE document_id = $1
                ORDER BY sign_order, email
                "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(RecipientRow::into_recipient)
        .collect::<Result<Vec<_>, _>>()?;

        row.into_document(versions, recipients)
    }

    /// Loads every non-deleted (or every deleted, per `trashed`) document of
    /// one owner in three queries and regroups the child rows in memory.
    async fn list_for_owner_inner(
        &self,
        owner: &str,
        trashed: bool,
    ) -> Result<Vec<Document>, DocumentRepoErr> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
                SELECT id, owner, name, status, completed_at, deleted_at,
                       status_before_delete, created_at, updated_at
                FROM document
                WHERE owner = $1 AND (deleted_at IS NOT NULL) = $2
                ORDER BY updated_at DESC
                "#,
        )
        .bind(owner)
        .bind(trashed)
        .fetch_all(&self.pool)
        .await?;

        let mut versions: HashMap<Uuid, Vec<DocumentVersion>> = HashMap::new();
        for row in sqlx::query_as::<_, VersionRow>(
            r#"
                SELECT v.document_id, v.number, v.content_ref, v.label,
                       v.signing_token, v.sent_at, v.expires_at, v.created_at
                FROM document_version v
                JOIN document d ON d.id = v.document_id
                WHERE d.owner = $1 AND (d.deleted_at IS NOT NULL) = $2
                ORDER BY v.number
                "#,
        )
        .bind(owner)
        .bind(trashed)
        .fetch_all(&self.pool)
        .await?
        {
            let document_id = row.document_id;
            versions
                .entry(document_id)
                .or_default()
                .push(row.into_version()?);
        }

        let mut recipients: HashMap<Uuid, Vec<Recipient>> = HashMap::new();
        for row in sqlx::query_as::<_, RecipientRow>(
            r#"
                SELECT r.document_id, r.id, r.email, r.role, r.status,
                       r.sign_order, r.signed_at, r.rejected_at
                FROM recipient r
                JOIN document d ON d.id = r.document_id
                WHERE d.owner = $1 AND (d.deleted_at IS NOT NULL) = $2
                ORDER BY r.sign_order, r.email
                "#,
        )
        .bind(owner)
        .bind(trashed)
        .fetch_all(&self.pool)
        .await?
        {
            let document_id = row.document_id;
            recipients
                .entry(document_id)
                .or_default()
                .push(row.into_recipient()?);
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_document(
                    versions.remove(&id).unwrap_or_default(),
                    recipients.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }

    async fn write_children(
        tx: &mut Transaction<'_, Postgres>,
        document: &Document,
    ) -> Result<(), DocumentRepoErr> {
        for version in &document.versions {
            sqlx::query(
                r#"
                    INSERT INTO document_version
                        (document_id, number, content_ref, label, signing_token,
                         sent_at, expires_at, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ON CONFLICT (document_id, number) DO UPDATE SET
                        content_ref = EXCLUDED.content_ref,
                        label = EXCLUDED.label,
                        signing_token = EXCLUDED.signing_token,
                        sent_at = EXCLUDED.sent_at,
                        expires_at = EXCLUDED.expires_at
                    "#,
            )
            .bind(document.id)
            .bind(version.number)
            .bind(&version.content_ref)
            .bind(version.label.to_string())
            .bind(&version.signing_token)
            .bind(version.sent_at)
            .bind(version.expires_at)
            .bind(version.created_at)
            .execute(&mut **tx)
            .await?;
        }

        // Recipient lists are replaced wholesale on send and reset, so the
        // simplest correct write is delete-and-reinsert.
        sqlx::query("DELETE FROM recipient WHERE document_id = $1")
            .bind(document.id)
            .execute(&mut **tx)
            .await?;
        for recipient in &document.recipients {
            sqlx::query(
                r#"
                    INSERT INTO recipient
                        (id, document_id, email, role, status, sign_order,
                         signed_at, rejected_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
            )
            .bind(recipient.id)
            .bind(document.id)
            .bind(&recipient.email)
            .bind(recipient.role.to_string())
            .bind(recipient.status.to_string())
            .bind(recipient.order)
            .bind(recipient.signed_at)
            .bind(recipient.rejected_at)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

impl DocumentRepo for PgDocumentRepo {
    type Err = DocumentRepoErr;

    async fn fetch(&self, id: Uuid) -> Result<Option<Document>, Self::Err> {
        match self.fetch_document_row(id).await? {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn fetch_by_token(&self, token: &str) -> Result<Option<(Document, i64)>, Self::Err> {
        let hit = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
                SELECT document_id, number
                FROM document_version
                WHERE signing_token = $1
                "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some((document_id, number)) = hit else {
            return Ok(None);
        };
        let document = self.fetch(document_id).await?;
        Ok(document.map(|d| (d, number)))
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<Document>, Self::Err> {
        self.list_for_owner_inner(owner, false).await
    }

    async fn list_trashed_for_owner(&self, owner: &str) -> Result<Vec<Document>, Self::Err> {
        self.list_for_owner_inner(owner, true).await
    }

    async fn insert(&self, document: &Document) -> Result<(), Self::Err> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
                INSERT INTO document
                    (id, owner, name, status, completed_at, deleted_at,
                     status_before_delete, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
        )
        .bind(document.id)
        .bind(&document.owner)
        .bind(&document.name)
        .bind(document.status.to_string())
        .bind(document.completed_at)
        .bind(document.deleted_at)
        .bind(document.status_before_delete.map(|s| s.to_string()))
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::write_children(&mut tx, document).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn save(&self, document: &Document) -> Result<(), Self::Err> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
                UPDATE document SET
                    name = $2,
                    status = $3,
                    completed_at = $4,
                    deleted_at = $5,
                    status_before_delete = $6,
                    updated_at = $7
                WHERE id = $1
                "#,
        )
        .bind(document.id)
        .bind(&document.name)
        .bind(document.status.to_string())
        .bind(document.completed_at)
        .bind(document.deleted_at)
        .bind(document.status_before_delete.map(|s| s.to_string()))
        .bind(document.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::write_children(&mut tx, document).await?;
        tx.commit().await?;
        Ok(())
    }
}
