/// Header carrying the shared secret for service-to-service calls.
pub(crate) const INTERNAL_AUTH_HEADER_KEY: &str = "x-internal-auth-key";
