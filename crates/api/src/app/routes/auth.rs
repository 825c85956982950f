//! `/api/auth/*` handlers: login, logout, identity, permissions, brands.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use brandkit_core::ValidationErrors;

use crate::app::{
    cookies,
    dto::{BrandsResponse, IdentityResponse, LoginRequest, LoginResponse, MeQuery, MessageResponse},
    errors::ApiError,
    services::AppServices,
};
use crate::context::{PrincipalContext, RequestSession};

fn require_session(session: RequestSession) -> Result<PrincipalContext, ApiError> {
    match session {
        RequestSession::Authenticated(ctx) => Ok(ctx),
        RequestSession::Anonymous => Err(ApiError::Unauthenticated),
        RequestSession::Failed(detail) => Err(ApiError::internal(detail)),
    }
}

/// POST /api/auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable login body");
        ApiError::Validation(ValidationErrors::single(
            "body",
            "Expected a JSON object with email and password",
        ))
    })?;

    let credentials = body.validate().map_err(ApiError::Validation)?;

    let signed_in = services
        .auth
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await?;

    services
        .directory
        .ensure_user_exists(&signed_in.principal)
        .await
        .map_err(|e| ApiError::action_failed("Internal server error", e.to_string()))?;

    let set_cookies = cookies::session_cookies(&services.cookies, &signed_in.session)
        .map_err(|e| ApiError::action_failed("Internal server error", e.to_string()))?;
    let mut headers = HeaderMap::new();
    cookies::append_set_cookies(&mut headers, set_cookies);

    tracing::info!(principal_id = %signed_in.principal.id, "login succeeded");

    let body = LoginResponse {
        success: true,
        user: signed_in.principal.into(),
        session: signed_in.session,
        message: "Login successful",
    };
    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

/// POST /api/auth/logout
///
/// Always clears the session cookies on success; without a live session
/// there is nothing to revoke and the call is a no-op.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    session: RequestSession,
) -> Result<Response, ApiError> {
    let ctx = match session {
        RequestSession::Authenticated(ctx) => Some(ctx),
        RequestSession::Anonymous => None,
        RequestSession::Failed(detail) => return Err(ApiError::action_failed("Logout failed", detail)),
    };

    if let Some(ctx) = ctx {
        services
            .auth
            .sign_out(ctx.access_token())
            .await
            .map_err(|e| ApiError::action_failed("Logout failed", e.to_string()))?;
        tracing::info!(principal_id = %ctx.principal_id(), "logout succeeded");
    }

    let mut headers = HeaderMap::new();
    cookies::append_set_cookies(&mut headers, cookies::clearing_cookies(&services.cookies));

    let body = MessageResponse {
        success: true,
        message: "Logged out successfully",
    };
    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

/// GET /api/auth/me
///
/// Identity by default; `?view=permissions` returns the permission snapshot.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    session: RequestSession,
    query: Result<Query<MeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let ctx = require_session(session)?;
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable /me query");
        ApiError::Validation(ValidationErrors::single("view", "Invalid query string"))
    })?;

    if query.wants_permissions() {
        return permission_snapshot(&services, &ctx).await;
    }

    let record = services
        .directory
        .get_user(ctx.principal_id())
        .await?
        .ok_or_else(|| ApiError::internal(format!("no user record for {}", ctx.principal_id())))?;

    Ok(Json(IdentityResponse::from(record)).into_response())
}

/// GET /api/auth/permissions
pub async fn permissions(
    Extension(services): Extension<Arc<AppServices>>,
    session: RequestSession,
) -> Result<Response, ApiError> {
    let ctx = require_session(session)?;
    permission_snapshot(&services, &ctx).await
}

async fn permission_snapshot(services: &AppServices, ctx: &PrincipalContext) -> Result<Response, ApiError> {
    let snapshot = services
        .permissions
        .fetch_permissions(ctx.principal_id())
        .await?
        .ok_or_else(|| {
            ApiError::PermissionsUnavailable(format!("no permissions for {}", ctx.principal_id()))
        })?;

    Ok(Json(snapshot).into_response())
}

/// GET /api/auth/brands
pub async fn brands(
    Extension(services): Extension<Arc<AppServices>>,
    session: RequestSession,
) -> Result<Response, ApiError> {
    let ctx = require_session(session)?;
    let brands = services.directory.brands_for(ctx.principal_id()).await?;
    Ok(Json(BrandsResponse::from(brands)).into_response())
}
