use crate::EmailServiceClient;
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequestEmail {
    /// Recipient email address
    pub to: String,
    /// Display name of the document awaiting signature
    pub document_name: String,
    /// Fully qualified signing link carrying the opaque token
    pub signing_url: String,
    /// Optional note from the sender, rendered into the email body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmailServiceClient {
    /// Asks the email service to deliver a signature-request email.
    /// Callers treat failures as non-fatal; the send already committed.
    #[tracing::instrument(skip(self), fields(to = %email.to))]
    pub async fn send_signature_request(
        &self,
        email: &SignatureRequestEmail,
    ) -> anyhow::Result<()> {
        let response = self
            .client
            .post(format!("{}/internal/emails/signature_request", self.url))
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "email service returned {} for signature request",
                response.status()
            );
        }

        Ok(())
    }
}
