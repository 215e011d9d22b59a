use crate::UserContext;
use axum::{
    Extension, RequestPartsExt,
    extract::{FromRequestParts, rejection::ExtensionRejection},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserExtractorErr {
    #[error("Internal server error")]
    AxumExtensionErr(#[from] ExtensionRejection),
    #[error("The user context was empty")]
    UserContextEmpty,
}

impl IntoResponse for UserExtractorErr {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Extracts the [UserContext] attached by the auth middleware, rejecting
/// requests that reached the handler without one.
#[non_exhaustive]
pub struct UserContextExtractor {
    pub user_context: UserContext,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserContextExtractor
where
    S: Send + Sync,
{
    type Rejection = UserExtractorErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ext: Extension<UserContext> = parts.extract_with_state(state).await?;
        if ext.0.user_id.is_empty() {
            return Err(UserExtractorErr::UserContextEmpty);
        }

        Ok(UserContextExtractor {
            user_context: ext.0,
        })
    }
}
