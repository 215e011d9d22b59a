use axum::{
    Extension, Router,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use model::audit::AuditLogEntry;
use model::document::Document;
use model_user::UserContext;
use serde_json::json;
use tower::util::ServiceExt;
use uuid::Uuid;

use crate::{
    domain::{
        models::{
            BulkTrashRequest, CreateDocumentRequest, RejectRequest, SaveDocumentRequest,
            SendForSigningRequest, SignRequest, SigningErr, SigningPackage, TrashedDocument,
        },
        ports::SigningService,
    },
    inbound::axum::{SigningRouterState, documents_router, signing_links_router},
};

static KNOWN_ID: &str = "2b7c912e-563c-421e-b103-a4b00cff30ee";
static GOOD_TOKEN: &str = "5f2d3c1b0a9e48d7b6c5a4f3e2d1c0b9";
static EXPIRED_TOKEN: &str = "expiredexpiredexpiredexpiredexpi";

struct MockSigning;

fn known_id() -> Uuid {
    KNOWN_ID.parse().unwrap()
}

fn fixture_document(owner: &str) -> Document {
    Document::new(known_id(), owner, "MSA draft", "content/v1", Utc::now())
}

fn fixture_package() -> SigningPackage {
    let document = fixture_document("user-one");
    let version = document.current_version().unwrap().clone();
    SigningPackage::from_document(&document, &version)
}

impl SigningService for MockSigning {
    async fn list_documents(&self, owner: &str) -> Result<Vec<Document>, SigningErr> {
        Ok(vec![fixture_document(owner)])
    }

    async fn create_document(
        &self,
        owner: &str,
        req: CreateDocumentRequest,
    ) -> Result<Document, SigningErr> {
        Ok(Document::new(
            known_id(),
            owner,
            &req.name,
            &req.content_ref,
            Utc::now(),
        ))
    }

    async fn get_document(&self, owner: &str, id: Uuid) -> Result<Document, SigningErr> {
        if id == known_id() {
            Ok(fixture_document(owner))
        } else {
            Err(SigningErr::NotFound)
        }
    }

    async fn save_document(
        &self,
        owner: &str,
        _id: Uuid,
        _req: SaveDocumentRequest,
    ) -> Result<Document, SigningErr> {
        Ok(fixture_document(owner))
    }

    async fn close_version(&self, owner: &str, _id: Uuid) -> Result<Document, SigningErr> {
        Ok(fixture_document(owner))
    }

    async fn trash_document(&self, owner: &str, _id: Uuid) -> Result<Document, SigningErr> {
        Ok(fixture_document(owner))
    }

    async fn trash_documents_bulk(
        &self,
        _owner: &str,
        req: BulkTrashRequest,
    ) -> Result<usize, SigningErr> {
        Ok(req.document_ids.len())
    }

    async fn send_for_signing(
        &self,
        owner: &str,
        _id: Uuid,
        req: SendForSigningRequest,
    ) -> Result<Document, SigningErr> {
        if req.recipients.is_empty() {
            return Err(SigningErr::validation("at least one signer is required"));
        }
        Ok(fixture_document(owner))
    }

    async fn void_document(&self, _owner: &str, _id: Uuid) -> Result<Document, SigningErr> {
        Err(SigningErr::conflict("completed documents cannot be voided"))
    }

    async fn reset_document(&self, _owner: &str, _id: Uuid) -> Result<Document, SigningErr> {
        Err(SigningErr::Db(anyhow::anyhow!("connection reset by peer")))
    }

    async fn restore_document(&self, owner: &str, _id: Uuid) -> Result<Document, SigningErr> {
        Ok(fixture_document(owner))
    }

    async fn list_trash(&self, _owner: &str) -> Result<Vec<TrashedDocument>, SigningErr> {
        Ok(Vec::new())
    }

    async fn version_content(
        &self,
        _owner: &str,
        _id: Uuid,
        number: i64,
    ) -> Result<String, SigningErr> {
        if number == 1 {
            Ok("content/v1".to_string())
        } else {
            Err(SigningErr::NotFound)
        }
    }

    async fn audit_trail(&self, _owner: &str, _id: Uuid) -> Result<Vec<AuditLogEntry>, SigningErr> {
        Ok(Vec::new())
    }

    async fn signing_package(&self, token: &str) -> Result<SigningPackage, SigningErr> {
        match token {
            t if t == GOOD_TOKEN => Ok(fixture_package()),
            t if t == EXPIRED_TOKEN => Err(SigningErr::TokenExpired),
            _ => Err(SigningErr::NotFound),
        }
    }

    async fn sign(&self, token: &str, _req: SignRequest) -> Result<SigningPackage, SigningErr> {
        self.signing_package(token).await
    }

    async fn reject(&self, token: &str, _req: RejectRequest) -> Result<SigningPackage, SigningErr> {
        self.signing_package(token).await
    }
}

fn mock_documents_router() -> Router {
    documents_router(SigningRouterState::new(MockSigning)).layer(Extension(UserContext::new(
        "user-one",
        "user-one@example.com",
    )))
}

fn mock_signing_router() -> Router {
    signing_links_router(SigningRouterState::new(MockSigning))
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(bytes.as_ref()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn it_should_list_documents_for_the_caller() {
    let router = mock_documents_router();

    let request = Request::builder()
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["owner"], "user-one");
    assert_eq!(json[0]["status"], "draft");
}

#[tokio::test]
async fn it_should_reject_requests_without_a_user_context() {
    let router = documents_router::<MockSigning, ()>(SigningRouterState::new(MockSigning));

    let request = Request::builder()
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_should_create_a_document() {
    let router = mock_documents_router();

    let request = json_request(
        "POST",
        "/",
        json!({ "name": "NDA", "contentRef": "content/nda" }),
    );

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["name"], "NDA");
    assert_eq!(json["versions"][0]["contentRef"], "content/nda");
}

#[tokio::test]
async fn it_should_map_not_found_to_404() {
    let router = mock_documents_router();

    let request = Request::builder()
        .uri("/febe912e-563c-421e-b103-a4b00cff30ee")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(res).await,
        json!({ "message": "document not found" })
    );
}

#[tokio::test]
async fn it_should_map_validation_failures_to_400() {
    let router = mock_documents_router();

    let request = json_request(
        "POST",
        &format!("/{KNOWN_ID}/send"),
        json!({ "recipients": [] }),
    );

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await,
        json!({ "message": "at least one signer is required" })
    );
}

#[tokio::test]
async fn it_should_map_conflicts_to_409() {
    let router = mock_documents_router();

    let request = json_request("POST", &format!("/{KNOWN_ID}/void"), json!({}));

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(res).await,
        json!({ "message": "completed documents cannot be voided" })
    );
}

#[tokio::test]
async fn it_should_hide_database_errors_behind_a_generic_500() {
    let router = mock_documents_router();

    let request = json_request("POST", &format!("/{KNOWN_ID}/reset"), json!({}));

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(res).await,
        json!({ "message": "An internal server error has occurred" })
    );
}

#[tokio::test]
async fn it_should_count_bulk_trashed_documents() {
    let router = mock_documents_router();

    let request = json_request(
        "DELETE",
        "/",
        json!({
            "documentIds": [KNOWN_ID, "febe912e-563c-421e-b103-a4b00cff30ee"]
        }),
    );

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "affected": 2 }));
}

#[tokio::test]
async fn it_should_return_version_content_by_number() {
    let router = mock_documents_router();

    let request = Request::builder()
        .uri(format!("/{KNOWN_ID}/versions/1"))
        .body(axum::body::Body::empty())
        .unwrap();

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "contentRef": "content/v1" }));
}

#[tokio::test]
async fn it_should_resolve_a_signing_token_without_auth() {
    let router = mock_signing_router();

    let request = Request::builder()
        .uri(format!("/{GOOD_TOKEN}"))
        .body(axum::body::Body::empty())
        .unwrap();

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["documentName"], "MSA draft");
    assert_eq!(json["versionNumber"], 1);
}

#[tokio::test]
async fn it_should_map_expired_tokens_to_410() {
    let router = mock_signing_router();

    let request = Request::builder()
        .uri(format!("/{EXPIRED_TOKEN}"))
        .body(axum::body::Body::empty())
        .unwrap();

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::GONE);
    assert_eq!(
        body_json(res).await,
        json!({ "message": "signing link has expired" })
    );
}

#[tokio::test]
async fn it_should_map_unknown_tokens_to_404_on_sign() {
    let router = mock_signing_router();

    let request = json_request(
        "POST",
        "/nosuchtokennosuchtokennosuchtoke/sign",
        json!({ "email": "first@example.com" }),
    );

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_accept_a_rejection_with_a_reason() {
    let router = mock_signing_router();

    let request = json_request(
        "POST",
        &format!("/{GOOD_TOKEN}/reject"),
        json!({ "email": "first@example.com", "reason": "wrong entity name" }),
    );

    let res = router.oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["documentId"], KNOWN_ID);
}
