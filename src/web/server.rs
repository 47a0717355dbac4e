//! HTTP server and route table

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{auth, classes, payments, selections, users};
use crate::gateway::PaymentGateway;
use crate::managers::{
    ClassCatalog, EnrollmentLedger, PaymentWorkflow, SelectionQueue, SharedTokenService,
    UserDirectory,
};
use crate::state::SharedStore;

/// Shared state for web handlers
#[derive(Clone)]
pub struct AppState {
    pub tokens: SharedTokenService,
    pub users: UserDirectory,
    pub catalog: ClassCatalog,
    pub selections: SelectionQueue,
    pub payments: PaymentWorkflow,
    pub enrollments: EnrollmentLedger,
}

impl AppState {
    pub fn new(
        store: SharedStore,
        tokens: SharedTokenService,
        gateway: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self {
            tokens,
            users: UserDirectory::new(store.clone()),
            catalog: ClassCatalog::new(store.clone()),
            selections: SelectionQueue::new(store.clone()),
            payments: PaymentWorkflow::new(store.clone(), gateway),
            enrollments: EnrollmentLedger::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/jwt", post(auth::issue_token))
        // users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id/role", put(users::set_role))
        .route("/users/admin/:email", get(users::is_admin))
        .route("/users/instructor/:email", get(users::is_instructor))
        .route("/users/student/:email", get(users::is_student))
        // catalog
        .route("/classes", get(classes::list_classes).post(classes::create_class))
        .route("/classes/:id", get(classes::get_class).put(classes::update_class))
        .route("/classes/:id/feedback", put(classes::set_feedback))
        .route("/approveclasses", get(classes::list_approved))
        .route("/popular-classes", get(classes::list_popular))
        .route("/manageclasses/:classId", put(classes::set_status))
        .route("/instructor-classes", get(classes::list_instructor_classes))
        // selections
        .route("/select", get(selections::list_selections).post(selections::add_selection))
        .route("/select/:id", delete(selections::remove_selection))
        // payments
        .route("/enrolled-classes", get(payments::list_enrolled))
        .route("/create-payment-intent", post(payments::create_payment_intent))
        .route("/payments", get(payments::list_payments).post(payments::complete_payment))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn start_web_server(port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server is on port {}", listener.local_addr()?.port());

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> &'static str {
    "server is running"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::create_shared_token_service;
    use crate::managers::payment_workflow::tests::MockGateway;
    use crate::state::{create_shared_store, Store};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, SharedStore) {
        let store = create_shared_store(Store::in_memory());
        let tokens = create_shared_token_service("test-secret", 3600);
        let state = AppState::new(store.clone(), tokens, Some(Arc::new(MockGateway)));
        (router(state), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
        (status, body)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn token_for(app: &Router, email: &str) -> String {
        let (status, body) = send(app, request("POST", "/jwt", None, Some(json!({ "email": email })))).await;
        assert_eq!(status, StatusCode::OK);
        // Bare token text, not a JSON document
        body.as_str().unwrap().to_string()
    }

    fn selection_body(class_id: &str, email: &str) -> Value {
        json!({
            "classId": class_id,
            "userEmail": email,
            "className": "Archery",
            "instructorEmail": "i@x.com",
            "price": 40.0
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let (status, body) = send(&app, request("GET", "/", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "server is running");
    }

    #[tokio::test]
    async fn test_jwt_returns_bare_token() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(request("POST", "/jwt", None, Some(json!({ "email": "a@x.com" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"), "{}", content_type);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let token = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let (status, _) = send(&app, request("GET", "/select", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_select_requires_token() {
        let (app, _) = app();

        let (status, body) = send(&app, request("GET", "/select", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": true, "message": "unauthorized access" }));

        let (status, _) = send(&app, request("GET", "/select", Some("not.a.token"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_scopes_selection_list() {
        let (app, _) = app();
        for (class_id, email) in [("c1", "a@x.com"), ("c2", "a@x.com"), ("c1", "b@x.com")] {
            let (status, _) = send(&app, request("POST", "/select", None, Some(selection_body(class_id, email)))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let token = token_for(&app, "a@x.com").await;
        let (status, body) = send(&app, request("GET", "/select", Some(&token), None)).await;

        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|s| s["userEmail"] == "a@x.com"));
    }

    #[tokio::test]
    async fn test_duplicate_selection_is_400() {
        let (app, _) = app();

        let (status, body) = send(&app, request("POST", "/select", None, Some(selection_body("c1", "a@x.com")))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["insertedId"].is_string());

        let (status, body) = send(&app, request("POST", "/select", None, Some(selection_body("c1", "a@x.com")))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": true, "message": " already selected " }));
    }

    #[tokio::test]
    async fn test_update_unknown_class_is_404() {
        let (app, _) = app();

        let update = json!({ "className": "x", "availableSeats": 3, "price": 10.0 });
        let (status, body) = send(&app, request("PUT", "/classes/does-not-exist", None, Some(update))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Class not found");
    }

    #[tokio::test]
    async fn test_class_lifecycle() {
        let (app, _) = app();
        let new_class = json!({
            "className": "Archery",
            "instructorEmail": "i@x.com",
            "price": 40.0,
            "availableSeats": 10,
            "status": "approved"
        });

        let (status, body) = send(&app, request("POST", "/classes", None, Some(new_class))).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["insertedId"].as_str().unwrap().to_string();

        // New classes are pending regardless of what the body says
        let (_, approved) = send(&app, request("GET", "/approveclasses", None, None)).await;
        assert!(approved.as_array().unwrap().is_empty());

        let (status, _) = send(
            &app,
            request("PUT", &format!("/manageclasses/{}", id), None, Some(json!({ "status": "approved" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            request("PUT", &format!("/classes/{}/feedback", id), None, Some(json!({ "feedback": "Great" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, class) = send(&app, request("GET", &format!("/classes/{}", id), None, None)).await;
        assert_eq!(class["status"], "approved");
        assert_eq!(class["feedback"], "Great");

        let token = token_for(&app, "i@x.com").await;
        let (_, mine) = send(&app, request("GET", "/instructor-classes", Some(&token), None)).await;
        assert_eq!(mine.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_body_uses_error_envelope() {
        let (app, _) = app();

        let (status, body) = send(&app, request("POST", "/classes", None, Some(json!({ "className": 5 })))).await;
        assert!(status.is_client_error());
        assert_eq!(body["error"], true);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_role_flags() {
        let (app, _) = app();

        let (_, inserted) = send(&app, request("POST", "/users", None, Some(json!({ "email": "a@x.com" })))).await;
        let user_id = inserted["insertedId"].as_str().unwrap().to_string();
        let (status, _) = send(
            &app,
            request("PUT", &format!("/users/{}/role", user_id), None, Some(json!({ "role": "admin" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let token = token_for(&app, "a@x.com").await;
        let (_, body) = send(&app, request("GET", "/users/admin/a@x.com", Some(&token), None)).await;
        assert_eq!(body, json!({ "admin": true }));

        let (_, body) = send(&app, request("GET", "/users/instructor/a@x.com", Some(&token), None)).await;
        assert_eq!(body, json!({ "admin": false }));

        // Asking about someone else halts with a negative answer
        let other = token_for(&app, "b@x.com").await;
        let (status, body) = send(&app, request("GET", "/users/admin/a@x.com", Some(&other), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "admin": false }));

        let (status, _) = send(
            &app,
            request("PUT", "/users/missing/role", None, Some(json!({ "role": "student" }))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_purchase_flow() {
        let (app, store) = app();
        let new_class = json!({
            "className": "Archery",
            "instructorEmail": "i@x.com",
            "price": 40.0,
            "availableSeats": 1
        });
        let (_, body) = send(&app, request("POST", "/classes", None, Some(new_class))).await;
        let class_id = body["insertedId"].as_str().unwrap().to_string();

        let (_, body) = send(&app, request("POST", "/select", None, Some(selection_body(&class_id, "a@x.com")))).await;
        let selection_id = body["insertedId"].as_str().unwrap().to_string();

        let token = token_for(&app, "a@x.com").await;
        let (status, body) = send(
            &app,
            request("POST", "/create-payment-intent", Some(&token), Some(json!({ "price": 40.0 }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clientSecret"], "pi_4000_secret");

        let payment = json!({
            "userEmail": "a@x.com",
            "price": 40.0,
            "transactionId": "txn_1",
            "classItem": {
                "_id": selection_id,
                "classId": class_id,
                "userEmail": "a@x.com",
                "className": "Archery",
                "price": 40.0
            }
        });
        let (status, body) = send(&app, request("POST", "/payments", Some(&token), Some(payment))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleteResult"]["deletedCount"], 1);
        assert!(body["paymentResult"]["insertedId"].is_string());
        assert!(body["enrollmentResult"]["insertedId"].is_string());

        let (_, enrolled) = send(&app, request("GET", "/enrolled-classes", Some(&token), None)).await;
        assert_eq!(enrolled.as_array().unwrap().len(), 1);
        assert_eq!(enrolled[0]["classId"], class_id.as_str());

        let (_, history) = send(&app, request("GET", "/payments", Some(&token), None)).await;
        assert_eq!(history[0]["transactionId"], "txn_1");

        let (_, selections) = send(&app, request("GET", "/select", Some(&token), None)).await;
        assert!(selections.as_array().unwrap().is_empty());

        let db = store.read().await;
        let class = db.find_class(&class_id).unwrap();
        assert_eq!(class.enroll, 1);
        assert_eq!(class.available_seats, 0);
    }

    #[tokio::test]
    async fn test_payment_for_unknown_class() {
        let (app, store) = app();
        let token = token_for(&app, "a@x.com").await;

        let payment = json!({
            "userEmail": "a@x.com",
            "price": 40.0,
            "transactionId": "txn_2",
            "classItem": { "_id": "no-selection", "classId": "no-class", "className": "Ghost", "price": 40.0 }
        });
        let (status, body) = send(&app, request("POST", "/payments", Some(&token), Some(payment))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleteResult"]["deletedCount"], 0);

        let db = store.read().await;
        assert_eq!(db.payments.len(), 1);
        assert_eq!(db.enrollments.len(), 1);
        assert!(db.classes.is_empty());
    }

    #[tokio::test]
    async fn test_payment_intent_rejects_bad_price() {
        let (app, _) = app();
        let token = token_for(&app, "a@x.com").await;

        for price in [-1.0, 1e12] {
            let (status, body) = send(
                &app,
                request("POST", "/create-payment-intent", Some(&token), Some(json!({ "price": price }))),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "price {}", price);
            assert_eq!(body["error"], true);
        }
    }

    #[tokio::test]
    async fn test_remove_selection() {
        let (app, _) = app();
        let (_, body) = send(&app, request("POST", "/select", None, Some(selection_body("c1", "a@x.com")))).await;
        let id = body["insertedId"].as_str().unwrap().to_string();

        let (status, body) = send(&app, request("DELETE", &format!("/select/{}", id), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], 1);
    }
}
