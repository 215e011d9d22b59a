use axum::{
    Json,
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use model_error_response::ErrorResponse;
use model_user::UserContext;

const USER_ID_HEADER: &str = "x-user-id";
const USER_EMAIL_HEADER: &str = "x-user-email";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Turns the identity headers set by the auth gateway into the
/// [UserContext] extension the handlers extract. Requests without a user id
/// never reach a handler.
pub async fn require_user(mut request: Request, next: Next) -> Response {
    let user_context = {
        let headers = request.headers();
        match (
            header_str(headers, USER_ID_HEADER),
            header_str(headers, USER_EMAIL_HEADER),
        ) {
            (Some(user_id), Some(email)) if !user_id.is_empty() => {
                UserContext::new(user_id, email)
            }
            _ => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new("Unauthorized")),
                )
                    .into_response();
            }
        }
    };

    request.extensions_mut().insert(user_context);
    next.run(request).await
}
