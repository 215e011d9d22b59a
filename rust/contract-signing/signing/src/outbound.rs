pub mod email_notifier;
pub mod pg_audit_log;
pub mod pg_document_repo;
