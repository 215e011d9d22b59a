use super::*;
use chrono::{Duration, Utc};
use uuid::Uuid;

fn recipient(email: &str, role: RecipientRole, status: RecipientStatus, order: i32) -> Recipient {
    Recipient {
        id: Uuid::new_v4(),
        email: email.to_string(),
        role,
        status,
        order,
        signed_at: None,
        rejected_at: None,
    }
}

fn base_document() -> Document {
    Document::new(Uuid::new_v4(), "user-one", "nda.pdf", "render/nda-v1", Utc::now())
}

#[test]
fn new_document_starts_as_single_draft_version() {
    let doc = base_document();
    assert_eq!(doc.status, DocumentStatus::Draft);
    assert_eq!(doc.versions.len(), 1);
    let v1 = doc.current_version().unwrap();
    assert_eq!(v1.number, 1);
    assert_eq!(v1.label, VersionLabel::Draft);
    assert!(v1.signing_token.is_none());
    assert_eq!(doc.next_version_number(), 2);
}

#[test]
fn completion_timestamp_resolves_completed_regardless_of_recipients() {
    let mut doc = base_document();
    doc.status = DocumentStatus::Sent;
    doc.completed_at = Some(Utc::now());
    doc.recipients = vec![recipient(
        "a@example.com",
        RecipientRole::Signer,
        RecipientStatus::Rejected,
        0,
    )];
    assert_eq!(doc.resolve_status(), DocumentStatus::Completed);
}

#[test]
fn all_signers_signed_counts_as_completion_evidence() {
    let mut doc = base_document();
    doc.status = DocumentStatus::InProgress;
    doc.recipients = vec![
        recipient("a@example.com", RecipientRole::Signer, RecipientStatus::Signed, 0),
        recipient("b@example.com", RecipientRole::Signer, RecipientStatus::Signed, 1),
        // the viewer never signs and must not block completion
        recipient("c@example.com", RecipientRole::Viewer, RecipientStatus::Sent, 2),
    ];
    assert!(doc.has_completion_evidence());
    assert_eq!(doc.resolve_status(), DocumentStatus::Completed);
}

#[test]
fn viewers_alone_are_not_completion_evidence() {
    let mut doc = base_document();
    doc.status = DocumentStatus::Sent;
    doc.recipients = vec![recipient(
        "c@example.com",
        RecipientRole::Viewer,
        RecipientStatus::Sent,
        0,
    )];
    assert!(!doc.has_completion_evidence());
    assert_eq!(doc.resolve_status(), DocumentStatus::Sent);
}

#[test]
fn rejection_wins_when_no_completion_evidence() {
    let mut doc = base_document();
    doc.status = DocumentStatus::Sent;
    doc.recipients = vec![
        recipient("a@example.com", RecipientRole::Signer, RecipientStatus::Signed, 0),
        recipient("b@example.com", RecipientRole::Signer, RecipientStatus::Rejected, 1),
    ];
    assert_eq!(doc.resolve_status(), DocumentStatus::Rejected);
}

#[test]
fn resolver_defaults_to_stored_status() {
    let mut doc = base_document();
    doc.status = DocumentStatus::Viewed;
    doc.recipients = vec![recipient(
        "a@example.com",
        RecipientRole::Signer,
        RecipientStatus::Sent,
        0,
    )];
    assert_eq!(doc.resolve_status(), DocumentStatus::Viewed);
}

#[test]
fn finalize_is_one_way() {
    let now = Utc::now();
    let mut version = DocumentVersion::new(3, "render/v3", now);
    assert!(version.label.is_draft());
    version.finalize();
    assert_eq!(version.label, VersionLabel::Final);
    // finalizing again must not revert anything
    version.finalize();
    assert_eq!(version.label, VersionLabel::Final);
}

#[test]
fn token_expiry_is_inclusive_of_the_deadline() {
    let now = Utc::now();
    let mut version = DocumentVersion::new(1, "render/v1", now);
    assert!(!version.token_expired(now));

    version.expires_at = Some(now + Duration::hours(1));
    assert!(!version.token_expired(now));
    assert!(version.token_expired(now + Duration::hours(1)));
    assert!(version.token_expired(now + Duration::hours(2)));
}

#[test]
fn next_version_number_follows_the_max() {
    let now = Utc::now();
    let mut doc = base_document();
    doc.versions.push(DocumentVersion::new(2, "render/v2", now));
    doc.versions.push(DocumentVersion::new(7, "render/v7", now));
    assert_eq!(doc.next_version_number(), 8);
}

#[test]
fn holds_token_scans_every_version() {
    let now = Utc::now();
    let mut doc = base_document();
    let mut v2 = DocumentVersion::new(2, "render/v2", now);
    v2.signing_token = Some("tok-abc".to_string());
    doc.versions.push(v2);

    assert!(doc.holds_token("tok-abc"));
    assert!(!doc.holds_token("tok-xyz"));
}
