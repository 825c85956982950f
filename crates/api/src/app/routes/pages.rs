//! Server-rendered pages behind the session gate.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use brandkit_auth::AccessDecision;

use crate::authz::ip_kit_creation_gate;
use crate::app::services::AppServices;
use crate::context::RequestSession;
use crate::views::{self, AuthContext};

const NEW_IP_KIT_LOGIN: &str = "/login?next=/ip-kits/new";

fn page_error(ctx: &AuthContext, detail: impl std::fmt::Display) -> Response {
    tracing::error!(%detail, "page render failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(views::error_page(ctx))).into_response()
}

/// GET /ip-kits/new
///
/// Anonymous visitors are sent to sign in. Signed-in users either get the
/// creation client or the "No Brand Access" fallback, never a blank page.
pub async fn new_ip_kit(
    Extension(services): Extension<Arc<AppServices>>,
    session: RequestSession,
) -> Response {
    let principal = match session {
        RequestSession::Authenticated(principal) => principal,
        RequestSession::Anonymous => return Redirect::to(NEW_IP_KIT_LOGIN).into_response(),
        RequestSession::Failed(detail) => return page_error(&AuthContext::resolved(None), detail),
    };

    let ctx = AuthContext::resolved(Some(principal.principal().clone()));

    let grants = match services.permissions.fetch_grants(principal.principal_id()).await {
        Ok(Some(grants)) => grants,
        Ok(None) => return page_error(&ctx, format!("no permissions for {}", principal.principal_id())),
        Err(e) => return page_error(&ctx, e),
    };

    match ip_kit_creation_gate(&principal, &grants) {
        AccessDecision::Deny => Html(views::no_brand_access(&ctx)).into_response(),
        AccessDecision::Allow => match views::ip_kit_creation(&ctx, &grants.snapshot()) {
            Ok(html) => Html(html).into_response(),
            Err(e) => page_error(&ctx, e),
        },
    }
}
