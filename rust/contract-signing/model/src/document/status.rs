use super::{Document, DocumentStatus, RecipientStatus};

impl Document {
    /// True when the document has reached finality: either a completion
    /// timestamp was recorded, or every signer recipient has signed (and
    /// there is at least one signer).
    pub fn has_completion_evidence(&self) -> bool {
        if self.completed_at.is_some() {
            return true;
        }
        let mut signers = self.recipients.iter().filter(|r| r.is_signer());
        let mut any = false;
        for signer in signers.by_ref() {
            if !signer.has_signed() {
                return false;
            }
            any = true;
        }
        any
    }

    /// Computes the status a reader should see without mutating stored
    /// state. Completion evidence wins over everything, a rejection wins
    /// over the stored status, otherwise the stored status stands.
    pub fn resolve_status(&self) -> DocumentStatus {
        if self.has_completion_evidence() {
            return DocumentStatus::Completed;
        }
        if self
            .recipients
            .iter()
            .any(|r| r.status == RecipientStatus::Rejected)
        {
            return DocumentStatus::Rejected;
        }
        self.status
    }
}
