use crate::domain::{
    models::{
        BulkTrashRequest, CreateDocumentRequest, RejectRequest, SaveDocumentRequest,
        SendForSigningRequest, SignRequest, SigningErr, SigningPackage, TrashedDocument,
    },
    ports::{AuditLog, DocumentRepo, SignatureNotifier, SigningService},
};
use chrono::{DateTime, Duration, Utc};
use email_service_client::SignatureRequestEmail;
use model::audit::{AuditAction, AuditLogEntry};
use model::document::{
    Document, DocumentStatus, DocumentVersion, Recipient, RecipientRole, RecipientStatus,
};
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;


pub struct SigningServiceImpl<R, A, N> {
    repo: R,
    audit: A,
    notifier: N,
    /// How long a signing link stays valid after a send
    token_ttl: Duration,
}

impl<R, A, N> SigningServiceImpl<R, A, N>
where
    R: DocumentRepo,
    A: AuditLog + Clone,
    N: SignatureNotifier + Clone,
    anyhow::Error: From<R::Err> + From<A::Err>,
{
    pub fn new(repo: R, audit: A, notifier: N, token_ttl: Duration) -> Self {
        SigningServiceImpl {
            repo,
            audit,
            notifier,
            token_ttl,
        }
    }

    /// Fetches a document and enforces ownership.
    async fn owned_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        let document = self
            .repo
            .fetch(id)
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(SigningErr::NotFound)?;
        if document.owner != owner {
            return Err(SigningErr::Forbidden);
        }
        Ok(document)
    }

    /// Resolves a signing token to the document and the one version it is
    /// bound to, enforcing expiry.
    async fn document_by_token(&self, token: &str) -> Result<(Document, i64), SigningErr> {
        let (document, version_number) = self
            .repo
            .fetch_by_token(token)
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(SigningErr::NotFound)?;

        let version = document
            .version(version_number)
            .ok_or_else(|| anyhow::anyhow!("token resolved to a missing version"))?;

        if version.token_expired(Utc::now()) {
            return Err(SigningErr::TokenExpired);
        }

        Ok((document, version_number))
    }

    /// Fire-and-forget audit append. A failed write is logged and swallowed;
    /// it never fails or delays the primary operation.
    fn record(&self, entry: AuditLogEntry) {
        let audit = self.audit.clone();
        tokio::spawn(
            async move {
                let document_id = entry.document_id;
                if let Err(e) = audit.append(entry).await {
                    let e = anyhow::Error::from(e);
                    tracing::error!(error=?e, %document_id, "AUDIT unable to append entry");
                }
            }
            .in_current_span(),
        );
    }

    /// Fire-and-forget email dispatch. The lifecycle save has already
    /// committed; delivery failures are logged and swallowed.
    fn dispatch(&self, emails: Vec<SignatureRequestEmail>) {
        let notifier = self.notifier.clone();
        tokio::spawn(
            async move {
                for email in emails {
                    let to = email.to.clone();
                    if let Err(e) = notifier.send_signature_request(email).await {
                        tracing::error!(error=?e, %to, "EMAIL unable to dispatch signature request");
                    }
                }
            }
            .in_current_span(),
        );
    }

    /// Allocates a signing token that no other version of this document
    /// carries.
    fn allocate_token(document: &Document) -> String {
        loop {
            let token = Uuid::new_v4().simple().to_string();
            if !document.holds_token(&token) {
                return token;
            }
        }
    }

    fn signature_request_emails(
        &self,
        document: &Document,
        token: &str,
        message: Option<&str>,
    ) -> Vec<SignatureRequestEmail> {
        document
            .recipients
            .iter()
            .filter(|r| r.status == RecipientStatus::Sent)
            .map(|r| SignatureRequestEmail {
                to: r.email.clone(),
                document_name: document.name.clone(),
                signing_url: self.notifier.signing_url(token),
                message: message.map(|m| m.to_string()),
            })
            .collect()
    }

    /// Invites the signers whose turn has come: every pending signer sharing
    /// the lowest unfinished order moves to `sent`. Returns the promoted
    /// recipients.
    fn promote_next_signers(document: &mut Document) -> Vec<Recipient> {
        let next_order = document
            .recipients
            .iter()
            .filter(|r| r.is_signer() && !r.has_signed())
            .map(|r| r.order)
            .min();

        let Some(next_order) = next_order else {
            return Vec::new();
        };

        let mut promoted = Vec::new();
        for recipient in document
            .recipients
            .iter_mut()
            .filter(|r| r.status == RecipientStatus::Pending && r.order == next_order)
        {
            recipient.status = RecipientStatus::Sent;
            promoted.push(recipient.clone());
        }
        promoted
    }

    /// Voided and trashed documents refuse every lifecycle write, including
    /// writes arriving through a still-unexpired signing link.
    fn reject_if_void_or_trashed(document: &Document) -> Result<(), SigningErr> {
        if document.status == DocumentStatus::Voided {
            return Err(SigningErr::conflict("document has been voided"));
        }
        if document.is_trashed() {
            return Err(SigningErr::conflict("document is in the trash"));
        }
        Ok(())
    }

    fn reject_if_frozen(document: &Document) -> Result<(), SigningErr> {
        if document.is_completed() {
            return Err(SigningErr::conflict("completed documents are immutable"));
        }
        Self::reject_if_void_or_trashed(document)
    }

    async fn persist(&self, document: &mut Document, now: DateTime<Utc>) -> Result<(), SigningErr> {
        document.updated_at = now;
        self.repo.save(document).await.map_err(anyhow::Error::from)?;
        Ok(())
    }
}

impl<R, A, N> SigningService for SigningServiceImpl<R, A, N>
where
    R: DocumentRepo,
    A: AuditLog + Clone,
    N: SignatureNotifier + Clone,
    anyhow::Error: From<R::Err> + From<A::Err>,
{
    async fn list_documents(&self, owner: &str) -> Result<Vec<Document>, SigningErr> {
        let documents = self
            .repo
            .list_for_owner(owner)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(documents)
    }

    async fn create_document(
        &self,
        owner: &str,
        req: CreateDocumentRequest,
    ) -> Result<Document, SigningErr> {
        if req.name.trim().is_empty() {
            return Err(SigningErr::validation("document name must not be empty"));
        }

        let document = Document::new(Uuid::new_v4(), owner, &req.name, &req.content_ref, Utc::now());
        self.repo
            .insert(&document)
            .await
            .map_err(anyhow::Error::from)?;

        self.record(AuditLogEntry::new(document.id, owner, AuditAction::Created));
        Ok(document)
    }

    async fn get_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        self.owned_document(owner, id).await
    }

    async fn save_document(
        &self,
        owner: &str,
        id: Uuid,
        req: SaveDocumentRequest,
    ) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        Self::reject_if_frozen(&document)?;

        if req.name.is_none() && req.content_ref.is_none() {
            return Err(SigningErr::validation("nothing to save"));
        }

        let now = Utc::now();
        let mut allocated_version = None;

        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(SigningErr::validation("document name must not be empty"));
            }
            document.name = name;
        }

        if let Some(content_ref) = req.content_ref {
            match document.current_version_mut() {
                Some(version) if version.label.is_draft() => {
                    version.content_ref = content_ref;
                }
                _ => {
                    let number = document.next_version_number();
                    document
                        .versions
                        .push(DocumentVersion::new(number, &content_ref, now));
                    allocated_version = Some(number);
                }
            }
        }

        self.persist(&mut document, now).await?;

        self.record(
            AuditLogEntry::new(document.id, owner, AuditAction::Saved)
                .with_metadata(json!({ "newVersion": allocated_version })),
        );
        Ok(document)
    }

    async fn close_version(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        if document.is_completed() {
            return Err(SigningErr::conflict("completed documents are immutable"));
        }

        let Some(version) = document.current_version_mut() else {
            return Err(SigningErr::validation("document has no versions"));
        };
        if !version.label.is_draft() {
            // already final, closing again is a no-op
            return Ok(document);
        }

        let number = version.number;
        version.finalize();
        self.persist(&mut document, Utc::now()).await?;

        self.record(
            AuditLogEntry::new(document.id, owner, AuditAction::VersionClosed)
                .with_metadata(json!({ "version": number })),
        );
        Ok(document)
    }

    async fn trash_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        if document.is_trashed() {
            return Ok(document);
        }

        document.status_before_delete = Some(document.status);
        document.status = DocumentStatus::Trashed;
        document.deleted_at = Some(Utc::now());
        self.persist(&mut document, Utc::now()).await?;

        self.record(AuditLogEntry::new(document.id, owner, AuditAction::Trashed));
        Ok(document)
    }

    async fn trash_documents_bulk(
        &self,
        owner: &str,
        req: BulkTrashRequest,
    ) -> Result<usize, SigningErr> {
        let mut trashed = 0;
        for id in req.document_ids {
            match self.trash_document(owner, id).await {
                Ok(_) => trashed += 1,
                Err(SigningErr::NotFound | SigningErr::Forbidden) => {
                    tracing::warn!(document_id=%id, "skipping document in bulk trash");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(trashed)
    }

    async fn send_for_signing(
        &self,
        owner: &str,
        id: Uuid,
        req: SendForSigningRequest,
    ) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        Self::reject_if_frozen(&document)?;

        if req.recipients.is_empty() {
            return Err(SigningErr::validation("at least one recipient is required"));
        }
        if !req.recipients.iter().any(|r| r.role == RecipientRole::Signer) {
            return Err(SigningErr::validation("at least one signer is required"));
        }
        for (i, a) in req.recipients.iter().enumerate() {
            if req.recipients[..i]
                .iter()
                .any(|b| b.email.eq_ignore_ascii_case(&a.email))
            {
                return Err(SigningErr::validation(format!(
                    "duplicate recipient {}",
                    a.email
                )));
            }
        }
        if document.versions.is_empty() {
            return Err(SigningErr::validation("document has no versions"));
        }

        let now = Utc::now();
        let first_order = req
            .recipients
            .iter()
            .filter(|r| r.role == RecipientRole::Signer)
            .map(|r| r.order)
            .min()
            .unwrap_or(0);

        // Recipients are replaced wholesale. Viewers and the first signers
        // are invited right away, later signers wait their turn.
        document.recipients = req
            .recipients
            .iter()
            .map(|draft| Recipient {
                id: Uuid::new_v4(),
                email: draft.email.clone(),
                role: draft.role,
                status: match draft.role {
                    RecipientRole::Viewer => RecipientStatus::Sent,
                    RecipientRole::Signer if draft.order == first_order => RecipientStatus::Sent,
                    RecipientRole::Signer => RecipientStatus::Pending,
                },
                order: draft.order,
                signed_at: None,
                rejected_at: None,
            })
            .collect();

        let needs_token = document
            .current_version()
            .map(|v| v.signing_token.is_none())
            .unwrap_or(true);
        let fresh_token = needs_token.then(|| Self::allocate_token(&document));

        let token_ttl = self.token_ttl;
        let version = document
            .current_version_mut()
            .ok_or_else(|| anyhow::anyhow!("document has no current version"))?;
        if let Some(token) = fresh_token {
            version.signing_token = Some(token);
        }
        version.sent_at = Some(now);
        version.expires_at = Some(now + token_ttl);
        // the sent snapshot is frozen; the next save allocates a new version
        version.finalize();

        document.status = DocumentStatus::Sent;

        // The save commits before any email is attempted: status records the
        // send intent, not delivery.
        self.persist(&mut document, now).await?;

        let token = document
            .current_version()
            .and_then(|v| v.signing_token.clone())
            .unwrap_or_default();
        let emails = self.signature_request_emails(&document, &token, req.message.as_deref());

        self.record(
            AuditLogEntry::new(document.id, owner, AuditAction::Sent)
                .with_metadata(json!({ "recipients": document.recipients.len() })),
        );
        self.dispatch(emails);

        Ok(document)
    }

    async fn void_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        if document.is_completed() {
            return Err(SigningErr::conflict("completed documents cannot be voided"));
        }
        if document.status == DocumentStatus::Voided {
            // voiding twice is a no-op
            return Ok(document);
        }

        document.status = DocumentStatus::Voided;
        self.persist(&mut document, Utc::now()).await?;

        self.record(AuditLogEntry::new(document.id, owner, AuditAction::Voided));
        Ok(document)
    }

    async fn reset_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        Self::reject_if_frozen(&document)?;

        let mut cleared = 0;
        for recipient in document
            .recipients
            .iter_mut()
            .filter(|r| r.status == RecipientStatus::Rejected)
        {
            recipient.status = RecipientStatus::Sent;
            recipient.rejected_at = None;
            cleared += 1;
        }
        if cleared == 0 {
            return Ok(document);
        }

        // the rejections are gone, recompute from a sent baseline
        document.status = DocumentStatus::Sent;
        document.status = document.resolve_status();
        self.persist(&mut document, Utc::now()).await?;

        self.record(
            AuditLogEntry::new(document.id, owner, AuditAction::Reset)
                .with_metadata(json!({ "cleared": cleared })),
        );
        Ok(document)
    }

    async fn restore_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        let mut document = self.owned_document(owner, id).await?;
        if !document.is_trashed() {
            return Ok(document);
        }

        document.deleted_at = None;
        document.status = match document.status_before_delete.take() {
            Some(status) => status,
            None if document.has_completion_evidence() => DocumentStatus::Completed,
            None => {
                document.status = DocumentStatus::Draft;
                document.resolve_status()
            }
        };
        self.persist(&mut document, Utc::now()).await?;

        self.record(AuditLogEntry::new(document.id, owner, AuditAction::Restored));
        Ok(document)
    }

    async fn list_trash(&self, owner: &str) -> Result<Vec<TrashedDocument>, SigningErr> {
        let documents = self
            .repo
            .list_trashed_for_owner(owner)
            .await
            .map_err(anyhow::Error::from)?;

        Ok(documents
            .into_iter()
            .map(|document| TrashedDocument {
                display_status: document.resolve_status(),
                document,
            })
            .collect())
    }

    async fn version_content(
        &self,
        owner: &str,
        id: Uuid,
        number: i64,
    ) -> Result<String, SigningErr> {
        let document = self.owned_document(owner, id).await?;
        let version = document.version(number).ok_or(SigningErr::NotFound)?;
        Ok(version.content_ref.clone())
    }

    async fn audit_trail(&self, owner: &str, id: Uuid) -> Result<Vec<AuditLogEntry>, SigningErr> {
        let document = self.owned_document(owner, id).await?;
        let entries = self
            .audit
            .entries_for_document(document.id)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(entries)
    }

    async fn signing_package(&self, token: &str) -> Result<SigningPackage, SigningErr> {
        let (mut document, version_number) = self.document_by_token(token).await?;

        // a first open moves a freshly sent document to viewed
        if document.status == DocumentStatus::Sent {
            document.status = DocumentStatus::Viewed;
            self.persist(&mut document, Utc::now()).await?;
        }

        self.record(AuditLogEntry::new(
            document.id,
            "signing_link",
            AuditAction::Viewed,
        ));

        let version = document
            .version(version_number)
            .ok_or_else(|| anyhow::anyhow!("token resolved to a missing version"))?;
        Ok(SigningPackage::from_document(&document, version))
    }

    async fn sign(&self, token: &str, req: SignRequest) -> Result<SigningPackage, SigningErr> {
        let (mut document, version_number) = self.document_by_token(token).await?;
        // the token survives a void or trash, the write must not
        Self::reject_if_void_or_trashed(&document)?;

        let recipient = document
            .recipients
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(&req.email))
            .ok_or_else(|| SigningErr::validation("recipient is not on the document"))?;

        if recipient.has_signed() {
            // signing twice is a no-op
            let version = document
                .version(version_number)
                .ok_or_else(|| anyhow::anyhow!("token resolved to a missing version"))?;
            return Ok(SigningPackage::from_document(&document, version));
        }
        if document.is_completed() {
            return Err(SigningErr::conflict("document is already completed"));
        }
        if !recipient.is_signer() {
            return Err(SigningErr::validation("viewers cannot sign"));
        }
        match recipient.status {
            RecipientStatus::Rejected => {
                return Err(SigningErr::conflict("recipient has rejected this document"));
            }
            RecipientStatus::Pending => {
                return Err(SigningErr::validation(
                    "earlier signers have not signed yet",
                ));
            }
            RecipientStatus::Sent | RecipientStatus::Signed => {}
        }

        let now = Utc::now();
        let email = recipient.email.clone();
        if let Some(recipient) = document
            .recipients
            .iter_mut()
            .find(|r| r.email.eq_ignore_ascii_case(&req.email))
        {
            recipient.status = RecipientStatus::Signed;
            recipient.signed_at = Some(now);
        }

        let promoted = Self::promote_next_signers(&mut document);

        let completed = document.has_completion_evidence();
        if completed {
            document.completed_at = Some(now);
            document.status = DocumentStatus::Completed;
        } else {
            document.status = DocumentStatus::InProgress;
        }

        self.persist(&mut document, now).await?;

        self.record(
            AuditLogEntry::new(document.id, &email, AuditAction::Signed)
                .with_metadata(json!({ "completed": completed })),
        );

        if !promoted.is_empty() {
            let emails = promoted
                .iter()
                .map(|r| SignatureRequestEmail {
                    to: r.email.clone(),
                    document_name: document.name.clone(),
                    signing_url: self.notifier.signing_url(token),
                    message: None,
                })
                .collect();
            self.dispatch(emails);
        }

        let version = document
            .version(version_number)
            .ok_or_else(|| anyhow::anyhow!("token resolved to a missing version"))?;
        Ok(SigningPackage::from_document(&document, version))
    }

    async fn reject(&self, token: &str, req: RejectRequest) -> Result<SigningPackage, SigningErr> {
        let (mut document, version_number) = self.document_by_token(token).await?;
        Self::reject_if_void_or_trashed(&document)?;

        let recipient = document
            .recipients
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(&req.email))
            .ok_or_else(|| SigningErr::validation("recipient is not on the document"))?;

        if recipient.status == RecipientStatus::Rejected {
            // rejecting twice is a no-op
            let version = document
                .version(version_number)
                .ok_or_else(|| anyhow::anyhow!("token resolved to a missing version"))?;
            return Ok(SigningPackage::from_document(&document, version));
        }
        if document.is_completed() {
            return Err(SigningErr::conflict("document is already completed"));
        }
        if !recipient.is_signer() {
            return Err(SigningErr::validation("viewers cannot reject"));
        }

        let now = Utc::now();
        let email = recipient.email.clone();
        if let Some(recipient) = document
            .recipients
            .iter_mut()
            .find(|r| r.email.eq_ignore_ascii_case(&req.email))
        {
            recipient.status = RecipientStatus::Rejected;
            recipient.rejected_at = Some(now);
        }
        document.status = DocumentStatus::Rejected;

        self.persist(&mut document, now).await?;

        self.record(
            AuditLogEntry::new(document.id, &email, AuditAction::Rejected)
                .with_metadata(json!({ "reason": req.reason })),
        );

        let version = document
            .version(version_number)
            .ok_or_else(|| anyhow::anyhow!("token resolved to a missing version"))?;
        Ok(SigningPackage::from_document(&document, version))
    }
}
