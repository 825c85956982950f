use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::app::{cookies, services::AppServices};
use crate::context::{PrincipalContext, RequestSession};

/// Resolve the session (if any) and record the outcome as a
/// `RequestSession` extension.
///
/// Never short-circuits: anonymous, invalid and failed lookups all reach
/// the handler, which decides between 401, a redirect, or its own error
/// shape.
pub async fn session_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session = match session_token(req.headers(), &services.cookies.access_name) {
        Some(token) => resolve_session(&services, token).await,
        None => RequestSession::Anonymous,
    };
    req.extensions_mut().insert(session);

    next.run(req).await
}

async fn resolve_session(services: &AppServices, token: String) -> RequestSession {
    match services.sessions.resolve(&token).await {
        Ok(principal) => match services.directory.ensure_user_exists(&principal).await {
            Ok(_) => RequestSession::Authenticated(PrincipalContext::new(principal, token)),
            Err(e) => RequestSession::Failed(format!("user provisioning failed: {e}")),
        },
        Err(e) if e.is_unauthenticated() => {
            tracing::debug!(error = %e, "request carries an unusable session");
            RequestSession::Anonymous
        }
        Err(e) => RequestSession::Failed(format!("session lookup failed: {e}")),
    }
}

/// Session cookie first, then `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookies::read_cookie(headers, cookie_name)
        .or_else(|| extract_bearer(headers))
        .map(str::to_owned)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
