use anyhow::Context;

/// The environment the service runs in. Anything unrecognized is treated as
/// production so a misconfigured box never comes up with local defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Develop,
    Local,
}

impl Environment {
    pub fn new_or_prod() -> Self {
        match std::env::var("ENVIRONMENT").as_deref() {
            Ok("local") => Environment::Local,
            Ok("develop") => Environment::Develop,
            _ => Environment::Production,
        }
    }
}

/// The configuration parameters for the application.
///
/// These are pulled from environment variables, which is the recommended way
/// to populate the Docker container.
pub struct Config {
    /// The connection URL for the Postgres database this application should use.
    pub database_url: String,
    /// The port to listen for HTTP requests on.
    pub port: usize,
    /// The environment we are in
    pub environment: Environment,
    /// Shared secret for calls to the internal email service
    pub internal_auth_key: String,
    /// The url of the email service
    pub email_service_url: String,
    /// Public base url the signing frontend is served from; signing links
    /// embed it
    pub signing_base_url: String,
    /// How long a signing link stays valid, in seconds
    pub signing_token_ttl_seconds: i64,
}

/// Two weeks.
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 1_209_600;

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be provided")?;
        let port: usize = std::env::var("PORT")
            .unwrap_or("8080".to_string())
            .parse::<usize>()
            .context("PORT must be a number")?;
        let environment = Environment::new_or_prod();

        let internal_auth_key =
            std::env::var("INTERNAL_AUTH_KEY").context("INTERNAL_AUTH_KEY must be provided")?;

        let email_service_url =
            std::env::var("EMAIL_SERVICE_URL").context("EMAIL_SERVICE_URL must be provided")?;

        let signing_base_url =
            std::env::var("SIGNING_BASE_URL").context("SIGNING_BASE_URL must be provided")?;

        let signing_token_ttl_seconds = match std::env::var("SIGNING_TOKEN_TTL_SECONDS") {
            Ok(raw) => raw
                .parse::<i64>()
                .context("SIGNING_TOKEN_TTL_SECONDS must be a number of seconds")?,
            Err(_) => DEFAULT_TOKEN_TTL_SECONDS,
        };

        Ok(Config {
            database_url,
            port,
            environment,
            internal_auth_key,
            email_service_url,
            signing_base_url,
            signing_token_ttl_seconds,
        })
    }
}
