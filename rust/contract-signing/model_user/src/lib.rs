use serde::{Deserialize, Serialize};

#[cfg(feature = "axum")]
pub mod axum_extractor;

/// Used to store information about the authenticated caller.
/// The auth middleware attaches this as a request extension; handlers never
/// read auth headers themselves.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct UserContext {
    /// The user id
    pub user_id: String,
    /// The user's primary email address
    pub email: String,
    /// The organization id of the user, when they belong to one
    pub organization_id: Option<i32>,
}

impl UserContext {
    pub fn new(user_id: &str, email: &str) -> Self {
        UserContext {
            user_id: user_id.to_string(),
            email: email.to_string(),
            organization_id: None,
        }
    }
}
