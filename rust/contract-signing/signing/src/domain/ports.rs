use crate::domain::models::{
    BulkTrashRequest, CreateDocumentRequest, RejectRequest, SaveDocumentRequest,
    SendForSigningRequest, SignRequest, SigningErr, SigningPackage, TrashedDocument,
};
use email_service_client::SignatureRequestEmail;
use model::audit::AuditLogEntry;
use model::document::Document;
use uuid::Uuid;

/// Storage port for documents, their versions and recipients.
///
/// Writes are read-modify-write over the whole aggregate: [DocumentRepo::save]
/// persists the whole aggregate with last-write-wins semantics, there is no
/// optimistic locking.
pub trait DocumentRepo: Send + Sync + 'static {
    type Err: Send;

    fn fetch(&self, id: Uuid) -> impl Future<Output = Result<Option<Document>, Self::Err>> + Send;

    /// Resolves an opaque signing token to its document and the number of
    /// the single version the token is bound to.
    fn fetch_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<(Document, i64)>, Self::Err>> + Send;

    /// All of the owner's documents that are not soft deleted.
    fn list_for_owner(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<Document>, Self::Err>> + Send;

    /// All of the owner's soft-deleted documents.
    fn list_trashed_for_owner(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<Document>, Self::Err>> + Send;

    fn insert(&self, document: &Document) -> impl Future<Output = Result<(), Self::Err>> + Send;

    fn save(&self, document: &Document) -> impl Future<Output = Result<(), Self::Err>> + Send;
}

/// Append-only audit sink. Appends run fire-and-forget and must never fail
/// the primary operation.
pub trait AuditLog: Send + Sync + 'static {
    type Err: Send;

    fn append(&self, entry: AuditLogEntry) -> impl Future<Output = Result<(), Self::Err>> + Send;

    /// Entries for one document, newest first.
    fn entries_for_document(
        &self,
        document_id: Uuid,
    ) -> impl Future<Output = Result<Vec<AuditLogEntry>, Self::Err>> + Send;
}

/// Outbound email port. Failures are logged by the caller and swallowed;
/// the lifecycle save has already committed by the time this runs.
pub trait SignatureNotifier: Send + Sync + 'static {
    fn send_signature_request(
        &self,
        email: SignatureRequestEmail,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Builds the public signing link for a token.
    fn signing_url(&self, token: &str) -> String;
}

/// The service port the HTTP layer talks to.
pub trait SigningService: Send + Sync + 'static {
    fn list_documents(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<Document>, SigningErr>> + Send;

    fn create_document(
        &self,
        owner: &str,
        req: CreateDocumentRequest,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn get_document(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn save_document(
        &self,
        owner: &str,
        id: Uuid,
        req: SaveDocumentRequest,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    /// Finalizes the current draft version so the next save allocates a new
    /// version number.
    fn close_version(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn trash_document(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    /// Best-effort bulk soft delete; returns the number of documents
    /// actually trashed.
    fn trash_documents_bulk(
        &self,
        owner: &str,
        req: BulkTrashRequest,
    ) -> impl Future<Output = Result<usize, SigningErr>> + Send;

    fn send_for_signing(
        &self,
        owner: &str,
        id: Uuid,
        req: SendForSigningRequest,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn void_document(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn reset_document(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn restore_document(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Document, SigningErr>> + Send;

    fn list_trash(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<TrashedDocument>, SigningErr>> + Send;

    fn version_content(
        &self,
        owner: &str,
        id: Uuid,
        number: i64,
    ) -> impl Future<Output = Result<String, SigningErr>> + Send;

    fn audit_trail(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Vec<AuditLogEntry>, SigningErr>> + Send;

    fn signing_package(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<SigningPackage, SigningErr>> + Send;

    fn sign(
        &self,
        token: &str,
        req: SignRequest,
    ) -> impl Future<Output = Result<SigningPackage, SigningErr>> + Send;

    fn reject(
        &self,
        token: &str,
        req: RejectRequest,
    ) -> impl Future<Output = Result<SigningPackage, SigningErr>> + Send;
}
