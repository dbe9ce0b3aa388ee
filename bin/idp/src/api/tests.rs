use actix_web::http::StatusCode;
use actix_web::test::call_service;
use actix_web::test::init_service;
use actix_web::test::read_body_json;
use actix_web::test::TestRequest;
use actix_web::web::Data;
use actix_web::App;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use serde_json::Value as Json;

use idp_accounts::BasicAuthentication;
use idp_accounts::Owner;
use idp_auth::access::Authoriser;
use idp_auth::identity::Authenticator;
use idp_context::Context;
use idp_injector::Injector;
use idp_store::Store;

use super::context::ContextMiddleware;

/// Injector authenticating with Basic credentials and authorising owners only.
fn owner_injector() -> Injector {
    let store = Store::fixture();
    Injector::new(
        Context::fixture(),
        Authenticator::from(BasicAuthentication::new(store.clone())),
        Authoriser::wrap(Owner),
        store,
    )
}

/// Initialise a test service wrapped in the context middleware.
macro_rules! app {
    ($injector:expr, $registry:expr) => {{
        let injector: Injector = $injector;
        let middleware =
            ContextMiddleware::new(injector.context.clone(), injector.authenticator.clone());
        let app = App::new()
            .app_data(Data::new(injector))
            .app_data(Data::new($registry))
            .configure(super::configure)
            .wrap(middleware);
        init_service(app).await
    }};
    ($injector:expr) => {
        app!($injector, prometheus::Registry::new())
    };
}

fn basic(username: &str, password: &str) -> (&'static str, String) {
    let credentials = STANDARD.encode(format!("{}:{}", username, password));
    ("authorization", format!("Basic {}", credentials))
}

#[actix_web::test]
async fn create_account() {
    let app = app!(owner_injector());
    let request = TestRequest::post()
        .uri("/api/v0/accounts")
        .set_json(json!({"id": "mine", "username": "peter", "password": "secret", "data": ""}))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body: Json = read_body_json(response).await;
    let id = body["id"].as_str().unwrap();
    assert_ne!(id, "mine");
    assert_eq!(location, format!("/api/v0/accounts/{}", id));
    assert_eq!(body, json!({"id": id, "username": "peter"}));
}

#[actix_web::test]
async fn owner_lifecycle() {
    let app = app!(owner_injector());
    let request = TestRequest::post()
        .uri("/api/v0/accounts")
        .set_json(json!({"username": "peter", "password": "secret"}))
        .to_request();
    let body: Json = read_body_json(call_service(&app, request).await).await;
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v0/accounts/{}", id);

    // The owner can read and update the account.
    let request = TestRequest::get()
        .uri(&uri)
        .insert_header(basic("peter", "secret"))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = TestRequest::put()
        .uri(&format!("{}/data", uri))
        .insert_header(basic("peter", "secret"))
        .set_json(json!({"data": "{\"theme\":\"dark\"}"}))
        .to_request();
    let body: Json = read_body_json(call_service(&app, request).await).await;
    assert_eq!(body["data"], "{\"theme\":\"dark\"}");
    assert!(body.get("password").is_none());

    let request = TestRequest::put()
        .uri(&format!("{}/password", uri))
        .insert_header(basic("peter", "secret"))
        .set_json(json!({"currentPassword": "secret", "newPassword": "hunter2"}))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old credentials are rejected by authentication.
    let request = TestRequest::get()
        .uri(&uri)
        .insert_header(basic("peter", "secret"))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = TestRequest::put()
        .uri(&format!("{}/username", uri))
        .insert_header(basic("peter", "hunter2"))
        .set_json(json!({"password": "wrong", "username": "pete"}))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Json = read_body_json(response).await;
    assert_eq!(body["kind"], "PasswordMismatch");

    let request = TestRequest::delete()
        .uri(&uri)
        .insert_header(basic("peter", "hunter2"))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn basic_credentials_authenticate_requests() {
    let app = app!(owner_injector());
    let request = TestRequest::post()
        .uri("/api/v0/accounts")
        .set_json(json!({"username": "peter", "password": "secret"}))
        .to_request();
    let body: Json = read_body_json(call_service(&app, request).await).await;
    let uri = format!("/api/v0/accounts/{}", body["id"].as_str().unwrap());

    let request = TestRequest::get()
        .uri(&uri)
        .insert_header(basic("peter", "secret"))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Json = read_body_json(response).await;
    assert_eq!(body["username"], "peter");

    let headers = [
        basic("peter", "wrong"),
        basic("paul", "secret"),
        ("authorization", "Bearer abc".to_string()),
    ];
    for header in headers {
        let request = TestRequest::get()
            .uri(&uri)
            .insert_header(header)
            .to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Json = read_body_json(response).await;
        assert_eq!(body["error"], true);
        assert_eq!(body["kind"], "Unauthenticated");
        assert!(body["error_msg"].as_str().unwrap().contains("invalid credentials"));
    }
}

#[actix_web::test]
async fn anonymous_requests_are_forbidden() {
    let app = app!(owner_injector());
    let request = TestRequest::get()
        .uri("/api/v0/accounts/e4a0f3a6")
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Json = read_body_json(response).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["kind"], "Forbidden");
}

#[actix_web::test]
async fn invalid_payload() {
    let app = app!(Injector::fixture());
    let request = TestRequest::post()
        .uri("/api/v0/accounts")
        .set_json(json!({"username": ""}))
        .to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Json = read_body_json(response).await;
    assert_eq!(body["kind"], "BadInput");
    assert_eq!(body["violations"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn missing_account() {
    let app = app!(Injector::fixture());
    let uri = "/api/v0/accounts/e4a0f3a6";
    let request = TestRequest::get().uri(uri).to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = TestRequest::delete().uri(uri).to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn username_conflict() {
    let app = app!(Injector::fixture());
    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let request = TestRequest::post()
            .uri("/api/v0/accounts")
            .set_json(json!({"username": "peter", "password": "secret"}))
            .to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), expected);
    }
}

#[actix_web::test]
async fn export_metrics() {
    let registry = prometheus::Registry::new();
    idp_accounts::register_metrics(&registry).unwrap();
    let app = app!(Injector::fixture(), registry);

    let request = TestRequest::get()
        .uri("/api/v0/accounts/e4a0f3a6")
        .to_request();
    call_service(&app, request).await;
    let request = TestRequest::get().uri("/metrics").to_request();
    let response = call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_web::test::read_body(response).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("idp_accounts_operations_total"));
}
