//! Audit trail for sensitive mutations
//!
//! POST/PUT/DELETE requests against the audited prefixes get one audit row
//! after the handler has answered. The row is written on a detached task, so
//! the response is returned unchanged and without waiting on the write.

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::net::SocketAddr;

use crate::auth::Claims;
use crate::infrastructure::AppState;
use crate::models::AuditStatus;
use crate::services::audit_service::{self, AuditEntry};

pub const AUDITED_PREFIXES: &[&str] = &[
    "/api/users",
    "/api/leads",
    "/api/projects",
    "/api/companies",
    "/api/content",
];

/// Same cap as axum's default `Json` body limit
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Longest non-JSON body kept in a snapshot
const MAX_RAW_SNAPSHOT: usize = 4096;

const REDACTED_KEYS: &[&str] = &["password", "password_hash", "token", "secret"];

pub fn is_audited(method: &Method, path: &str) -> bool {
    let mutating = *method == Method::POST || *method == Method::PUT || *method == Method::DELETE;
    mutating
        && AUDITED_PREFIXES.iter().any(|prefix| {
            path == *prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
}

/// Last non-empty path segment: `/api/content/123` -> `123`
pub fn resource_id(path: &str) -> Option<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_string)
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if REDACTED_KEYS.contains(&key.to_ascii_lowercase().as_str()) {
                    *v = Value::String("[REDACTED]".to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Body snapshot: redacted JSON, or truncated text when the body is not JSON
pub fn snapshot_payload(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(mut json) => {
            redact(&mut json);
            Some(json.to_string())
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            Some(text.chars().take(MAX_RAW_SNAPSHOT).collect())
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Proxy headers first, then the socket address when available
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

pub async fn audit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !is_audited(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes: Bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Rejecting unreadable request body: {}", e);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let path = parts.uri.path().to_string();
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let mut entry = AuditEntry {
        user_id: parts.extensions.get::<Claims>().map(|c| c.sub),
        action: parts.method.as_str().to_string(),
        resource_id: resource_id(&path),
        resource: path,
        payload: snapshot_payload(&bytes),
        ip_address: client_ip(&parts.headers, peer),
        user_agent: header_str(&parts.headers, header::USER_AGENT.as_str()),
        status: AuditStatus::Success,
    };

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    entry.status = AuditStatus::from_http_status(response.status().as_u16());
    audit_service::record_detached(state.db().clone(), entry);

    response
}
