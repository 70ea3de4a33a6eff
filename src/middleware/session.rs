//! Session guard for the admin API

use axum::{
    Json,
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::{decode_jwt, token_from_headers};

/// Paths reachable without a session, together with everything below them
const PUBLIC_PATHS: &[&str] = &[
    "/api/health",
    "/api/auth/login",
    "/api/auth/logout",
    "/api/public",
];

/// Match whole path segments only: `/api/health` covers `/api/health/db`
/// but not `/api/healthcheck`.
fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn requires_session(path: &str) -> bool {
    path.starts_with("/api/") && !PUBLIC_PATHS.iter().any(|public| under(path, public))
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

/// Validates the session cookie (or bearer token) and stores the claims in
/// the request extensions for handlers and the audit layer.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if request.method() == Method::OPTIONS || !requires_session(&path) {
        return next.run(request).await;
    }

    let Some(token) = token_from_headers(request.headers()) else {
        warn!(path = %path, "Missing session");
        return unauthorized("Not authenticated");
    };

    match decode_jwt(&token) {
        Ok(claims) => {
            debug!(path = %path, user = %claims.username, "Session validated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Invalid session");
            unauthorized("Invalid or expired session")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_session_logic() {
        assert!(!requires_session("/api/health"));
        assert!(!requires_session("/api/auth/login"));
        assert!(!requires_session("/api/public/leads"));
        assert!(!requires_session("/api/public/content/3/events"));
        assert!(requires_session("/api/auth/me"));
        assert!(requires_session("/api/leads"));
        assert!(requires_session("/api/notifications/read-all"));
        assert!(!requires_session("/favicon.ico"));
    }

    #[test]
    fn test_lookalike_paths_stay_protected() {
        assert!(requires_session("/api/healthcheck"));
        assert!(requires_session("/api/health-admin"));
        assert!(requires_session("/api/auth/logout-all"));
        assert!(requires_session("/api/auth/login2"));
        assert!(requires_session("/api/publicity"));
        assert!(!requires_session("/api/auth/logout"));
        assert!(!requires_session("/api/public"));
    }
}
