#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};

use taskgate::auth::{AuthResponse, AuthService, PasswordHasher, RegistrationRolePolicy, TokenService};
use taskgate::routes::{self, health};
use taskgate::store::{MemoryStore, TaskStore, UserStore};

pub const SECRET: &str = "integration-test-secret";

/// Everything a test app is built from, so a live server can reuse it.
#[derive(Clone)]
pub struct TestState {
    pub auth: AuthService,
    pub tokens: Arc<TokenService>,
    pub tasks: Arc<dyn TaskStore>,
}

impl TestState {
    pub fn new(policy: RegistrationRolePolicy) -> Self {
        let tokens = Arc::new(TokenService::new(SECRET, Duration::hours(1)).unwrap());
        let store = Arc::new(MemoryStore::new());
        let users: Arc<dyn UserStore> = store.clone();
        let tasks: Arc<dyn TaskStore> = store;
        // Minimum bcrypt cost keeps the suite fast.
        let auth = AuthService::new(users, PasswordHasher::new(4), tokens.clone(), policy);
        Self { auth, tokens, tasks }
    }
}

pub async fn init_app(
    state: &TestState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state.auth.clone()))
            .app_data(web::Data::from(state.tokens.clone()))
            .app_data(web::Data::from(state.tasks.clone()))
            .wrap(Logger::default())
            .service(health::health)
            .service(health::index)
            .service(web::scope("/api/v1").configure(routes::config)),
    )
    .await
}

/// Sends a request and returns its status and JSON body (`Null` if the body is not JSON).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register_user<S, B>(
    app: &S,
    name: &str,
    email: &str,
    role: Option<&str>,
) -> Result<AuthResponse, String>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut payload = json!({ "name": name, "email": email, "password": "secret1" });
    if let Some(role) = role {
        payload["role"] = json!(role);
    }
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let (status, body) = send(app, req).await;
    if status != StatusCode::CREATED {
        return Err(format!("Failed to register {}. Status: {}. Body: {}", email, status, body));
    }
    serde_json::from_value(body).map_err(|e| format!("Failed to parse registration response: {}", e))
}

pub async fn create_task<S, B>(app: &S, token: &str, title: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(bearer(token))
        .set_json(json!({ "title": title }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
    body["task"].clone()
}
