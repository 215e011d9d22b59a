use signing::domain::service::SigningServiceImpl;
use signing::inbound::axum::SigningRouterState;
use signing::outbound::{
    email_notifier::EmailNotifier, pg_audit_log::PgAuditLog, pg_document_repo::PgDocumentRepo,
};

/// The fully wired signing service this binary runs.
pub type Signing = SigningServiceImpl<PgDocumentRepo, PgAuditLog, EmailNotifier>;

#[derive(Clone)]
pub struct AppState {
    pub signing: SigningRouterState<Signing>,
}
