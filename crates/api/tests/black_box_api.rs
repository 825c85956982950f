use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brandkit_api::app::services::{AppServices, InMemoryBackend};
use brandkit_api::config::CookieSettings;
use brandkit_auth::{BrandId, PermissionGrants, Principal, PrincipalId, SessionClaims, UserRecord};
use brandkit_infra::{
    DirectoryError, HostedAuthClient, HostedClient, HostedConfig, InMemoryUserDirectory,
    JwtSessionResolver, PermissionService, ServiceError, UserDirectory,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        brandkit_observability::init_for_tests();

        // Same router as prod, bound to an ephemeral port.
        let app = brandkit_api::app::router(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn backend() -> InMemoryBackend {
    InMemoryBackend::new(JWT_SECRET)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Token for a principal the auth provider never saw (provisioned on first use).
fn mint_jwt(sub: &PrincipalId, email: &str) -> String {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: sub.clone(),
        email: email.to_string(),
        aud: "authenticated".into(),
        role: "authenticated".to_string(),
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Log in and return the `Cookie` header value carrying the new session.
async fn login_cookie(srv: &TestServer, email: &str, password: &str) -> String {
    let res = client()
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn(backend().services(CookieSettings::default())).await;

    let res = client().get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_malformed_input() {
    let srv = TestServer::spawn(backend().services(CookieSettings::default())).await;
    let client = client();

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "not-an-email", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation error");
    assert!(
        body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["field"] == "email")
    );

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "jane@example.com", "password": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(
        body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["field"] == "password")
    );
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let backend = backend();
    backend.seed_user("jane@example.com", "right", &[]);
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;

    let res = client()
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "jane@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(SET_COOKIE).is_none());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn login_sets_session_cookies_and_provisions_user() {
    let backend = backend();
    let id = backend.seed_user("jane.doe@example.com", "pw", &[]);
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;

    let res = client()
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "jane.doe@example.com", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookies: Vec<String> = res
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("sb-access-token=")));
    assert!(cookies.iter().any(|c| c.starts_with("sb-refresh-token=")));
    assert!(
        cookies
            .iter()
            .all(|c| c.contains("HttpOnly") && c.contains("SameSite=Lax") && c.contains("Path=/"))
    );

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], id.as_str());
    assert!(body["session"]["access_token"].is_string());

    assert_eq!(backend.directory.user_count(), 1);
}

#[tokio::test]
async fn login_reports_unreachable_provider_as_503() {
    let hosted = HostedClient::new(HostedConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        anon_key: "anon".to_string(),
        service_key: None,
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let services = AppServices::new(
        Arc::new(HostedAuthClient::new(hosted)),
        Arc::new(JwtSessionResolver::new(JWT_SECRET)),
        Arc::new(InMemoryUserDirectory::new()),
        CookieSettings::default(),
    );
    let srv = TestServer::spawn(services).await;

    let res = client()
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "jane@example.com", "password": "pw" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn session_endpoints_require_auth() {
    let srv = TestServer::spawn(backend().services(CookieSettings::default())).await;
    let client = client();

    for path in ["/api/auth/me", "/api/auth/permissions", "/api/auth/brands"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    let res = client
        .get(srv.url("/api/auth/permissions"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn permission_snapshot_has_exactly_five_flags() {
    let backend = backend();
    let id = backend.seed_user("admin@example.com", "pw", &["brand_admin"]);
    backend.directory.associate_brand(&id, "brand-1".parse().unwrap());
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;
    let cookie = login_cookie(&srv, "admin@example.com", "pw").await;

    let res = client()
        .get(srv.url("/api/auth/permissions"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "canCreateIpKits": true,
            "canCreateCampaigns": true,
            "canReviewSubmissions": false,
            "isPlatformAdmin": false,
            "userBrands": ["brand-1"],
        })
    );

    let res = client()
        .get(srv.url("/api/auth/me?view=permissions"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let via_me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(via_me, body);
}

struct NoPermissions;

#[async_trait]
impl PermissionService for NoPermissions {
    async fn fetch_grants(&self, _: &PrincipalId) -> Result<Option<PermissionGrants>, ServiceError> {
        Ok(None)
    }
}

#[tokio::test]
async fn empty_permission_lookup_is_a_500() {
    let backend = backend();
    backend.seed_user("jane@example.com", "pw", &[]);
    let services = backend
        .services(CookieSettings::default())
        .with_permissions(Arc::new(NoPermissions));
    let srv = TestServer::spawn(services).await;
    let cookie = login_cookie(&srv, "jane@example.com", "pw").await;

    let res = client()
        .get(srv.url("/api/auth/permissions"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Unable to load permissions" }));

    let res = client()
        .get(srv.url("/ip-kits/new"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = res.text().await.unwrap();
    assert!(!html.contains("ip-kit-creation-client"));
}

#[tokio::test]
async fn brands_and_identity_for_bearer_token() {
    let backend = backend();
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;

    let id = PrincipalId::generate();
    let token = mint_jwt(&id, "jane.doe@example.com");

    let res = client()
        .get(srv.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["email"], "jane.doe@example.com");
    assert_eq!(body["displayName"], "Jane Doe");

    backend.directory.associate_brand(&id, "brand-1".parse().unwrap());
    backend.directory.associate_brand(&id, "brand-2".parse().unwrap());

    let res = client()
        .get(srv.url("/api/auth/brands"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["brands"], json!(["brand-1", "brand-2"]));
}

#[tokio::test]
async fn logout_clears_cookies_and_revokes_session() {
    let backend = backend();
    backend.seed_user("jane@example.com", "pw", &[]);
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;
    let cookie = login_cookie(&srv, "jane@example.com", "pw").await;
    let client = client();

    let res = client
        .post(srv.url("/api/auth/logout"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cleared: Vec<&str> = res
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .get(srv.url("/api/auth/me"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Without a session there is nothing to revoke.
    let res = client.post(srv.url("/api/auth/logout")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn ip_kit_creation_redirects_anonymous_visitors() {
    let srv = TestServer::spawn(backend().services(CookieSettings::default())).await;

    let res = client().get(srv.url("/ip-kits/new")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], "/login?next=/ip-kits/new");
}

#[tokio::test]
async fn ip_kit_creation_shows_fallback_without_brand_access() {
    let backend = backend();
    backend.seed_user("reviewer@example.com", "pw", &["reviewer", "platform_admin"]);
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;
    let cookie = login_cookie(&srv, "reviewer@example.com", "pw").await;

    let res = client()
        .get(srv.url("/ip-kits/new"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("No Brand Access"));
    assert!(!html.contains("ip-kit-creation-client"));
}

#[tokio::test]
async fn ip_kit_creation_renders_client_for_brand_admin_or_member() {
    let backend = backend();
    backend.seed_user("admin@example.com", "pw", &["brand_admin"]);
    let member = backend.seed_user("member@example.com", "pw", &[]);
    backend.directory.associate_brand(&member, "brand-1".parse().unwrap());
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;

    for email in ["admin@example.com", "member@example.com"] {
        let cookie = login_cookie(&srv, email, "pw").await;
        let res = client()
            .get(srv.url("/ip-kits/new"))
            .header(COOKIE, &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{email}");

        let html = res.text().await.unwrap();
        assert!(html.contains("ip-kit-creation-client"), "{email}");
        assert!(html.contains(r#""canCreateIpKits":true"#), "{email}");
        assert!(!html.contains("No Brand Access"), "{email}");
    }
}

/// Directory whose backing store cannot be reached.
struct UnreachableDirectory;

#[async_trait]
impl UserDirectory for UnreachableDirectory {
    async fn ensure_user_exists(&self, _: &Principal) -> Result<UserRecord, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".into()))
    }

    async fn get_user(&self, _: &PrincipalId) -> Result<Option<UserRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".into()))
    }

    async fn role_names(&self, _: &PrincipalId) -> Result<Vec<String>, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".into()))
    }

    async fn brands_for(&self, _: &PrincipalId) -> Result<Vec<BrandId>, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".into()))
    }
}

async fn spawn_with_unreachable_directory() -> TestServer {
    let backend = backend();
    let services = AppServices::new(
        backend.auth.clone(),
        backend.auth.clone(),
        Arc::new(UnreachableDirectory),
        CookieSettings::default(),
    );
    TestServer::spawn(services).await
}

#[tokio::test]
async fn logout_reports_provisioning_failure_as_action_failure() {
    let srv = spawn_with_unreachable_directory().await;
    let token = mint_jwt(&PrincipalId::generate(), "jane@example.com");

    let res = client()
        .post(srv.url("/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "message": "Logout failed" }));
}

#[tokio::test]
async fn ip_kit_creation_renders_html_error_when_provisioning_fails() {
    let srv = spawn_with_unreachable_directory().await;
    let token = mint_jwt(&PrincipalId::generate(), "jane@example.com");

    let res = client()
        .get(srv.url("/ip-kits/new"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = res.headers()[CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    let html = res.text().await.unwrap();
    assert!(html.contains("Something went wrong"));
    assert!(!html.contains("connection refused"));
}

#[tokio::test]
async fn json_endpoints_report_provisioning_failure_generically() {
    let srv = spawn_with_unreachable_directory().await;
    let token = mint_jwt(&PrincipalId::generate(), "jane@example.com");

    let res = client()
        .get(srv.url("/api/auth/permissions"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn malformed_me_query_goes_through_the_error_boundary() {
    let backend = backend();
    backend.seed_user("jane@example.com", "pw", &[]);
    let srv = TestServer::spawn(backend.services(CookieSettings::default())).await;

    // Session is checked before the query string.
    let res = client()
        .get(srv.url("/api/auth/me?view=a&view=b"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let cookie = login_cookie(&srv, "jane@example.com", "pw").await;
    let res = client()
        .get(srv.url("/api/auth/me?view=a&view=b"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"][0]["field"], "view");
    assert!(!body.to_string().contains("duplicate field"));
}

#[tokio::test]
async fn token_with_audience_list_is_accepted() {
    let srv = TestServer::spawn(backend().services(CookieSettings::default())).await;
    let id = PrincipalId::generate();
    let now = Utc::now();
    let claims = json!({
        "sub": id.as_str(),
        "email": "jane@example.com",
        "aud": ["authenticated", "brandkit"],
        "role": "authenticated",
        "iat": now.timestamp(),
        "exp": (now + ChronoDuration::minutes(10)).timestamp(),
    });
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let res = client()
        .get(srv.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
