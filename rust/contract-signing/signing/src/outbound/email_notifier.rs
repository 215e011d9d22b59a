//! [SignatureNotifier] backed by the internal email service.
use crate::domain::ports::SignatureNotifier;
use email_service_client::{EmailServiceClient, SignatureRequestEmail};

#[derive(Clone)]
pub struct EmailNotifier {
    client: EmailServiceClient,
    /// Public base URL of the signing frontend, without a trailing slash.
    signing_base_url: String,
}

impl EmailNotifier {
    pub fn new(client: EmailServiceClient, signing_base_url: String) -> Self {
        EmailNotifier {
            client,
            signing_base_url: signing_base_url
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

impl SignatureNotifier for EmailNotifier {
    async fn send_signature_request(&self, email: SignatureRequestEmail) -> anyhow::Result<()> {
        self.client.send_signature_request(&email).await
    }

    fn signing_url(&self, token: &str) -> String {
        format!("{}/signing/{token}", self.signing_base_url)
    }
}
