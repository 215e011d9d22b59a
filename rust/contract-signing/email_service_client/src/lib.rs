use constants::INTERNAL_AUTH_HEADER_KEY;

pub(crate) mod constants;

pub mod send_signature_request;

pub use send_signature_request::SignatureRequestEmail;

/// Thin client for the internal email service. Delivery itself (templates,
/// suppression, provider failover) lives behind that service; this crate
/// only enqueues sends.
#[derive(Clone)]
pub struct EmailServiceClient {
    url: String,
    client: reqwest::Client,
}

impl EmailServiceClient {
    pub fn new(internal_auth_key: String, url: String) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(INTERNAL_AUTH_HEADER_KEY, internal_auth_key.parse()?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
