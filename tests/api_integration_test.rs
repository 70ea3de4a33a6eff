use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use nekosora_cms::auth;
use nekosora_cms::config::Config;
use nekosora_cms::db;
use nekosora_cms::infrastructure::AppState;
use nekosora_cms::models::{content, content_event};
use nekosora_cms::models::content::ContentType;
use nekosora_cms::server::build_router;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn test_app(db: &DatabaseConnection) -> Router {
    build_router(AppState::new(db.clone(), Config::default()))
}

// Helper to create a test admin user and a session token for it
async fn create_test_admin(db: &DatabaseConnection) -> (i32, String) {
    let now = chrono::Utc::now().to_rfc3339();
    let admin = nekosora_cms::models::user::ActiveModel {
        username: Set("test_admin".to_string()),
        password_hash: Set("hash".to_string()),
        role: Set("admin".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = admin.insert(db).await.expect("Failed to create admin");
    let token = auth::create_jwt(res.id, &res.username, &res.role).expect("Failed to create token");
    (res.id, token)
}

async fn create_test_content(db: &DatabaseConnection, title: &str, character: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let item = content::ActiveModel {
        title: Set(title.to_string()),
        content_type: Set(ContentType::Video),
        character_name: Set(character.to_string()),
        url: Set(None),
        published_at: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    item.insert(db).await.expect("Failed to create content").id
}

async fn create_test_event(
    db: &DatabaseConnection,
    content_id: i32,
    event_type: &str,
    source: &str,
    created_at: &str,
) {
    let event = content_event::ActiveModel {
        content_id: Set(content_id),
        event_type: Set(event_type.to_string()),
        source: Set(source.to_string()),
        created_at: Set(created_at.to_string()),
        ..Default::default()
    };
    event.insert(db).await.expect("Failed to create event");
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_request_workflow_follows_transitions() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    let (status, body) = send(
        &app,
        "POST",
        "/api/public/requests",
        None,
        Some(json!({
            "title": "Sing a city-pop cover",
            "description": "Plastic Love please",
            "request_type": "SONG"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/requests/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_actions"], json!(["REVIEWING", "REJECTED"]));

    // Skipping REVIEWING is refused and leaves the request untouched
    let status_uri = format!("/api/requests/{}/status", id);
    let (status, _) = send(&app, "PUT", &status_uri, Some(&token), Some(json!({ "status": "APPROVED" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    for next in ["REVIEWING", "APPROVED", "IN_PROGRESS", "COMPLETED"] {
        let (status, body) = send(&app, "PUT", &status_uri, Some(&token), Some(json!({ "status": next }))).await;
        assert_eq!(status, StatusCode::OK, "transition to {}", next);
        assert_eq!(body["request"]["status"], next);
    }

    let (_, body) = send(&app, "GET", &format!("/api/requests/{}", id), Some(&token), None).await;
    assert_eq!(body["available_actions"], json!([]));

    // Terminal state
    let (status, _) = send(&app, "PUT", &status_uri, Some(&token), Some(json!({ "status": "PENDING" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_request_votes_increment() {
    let db = setup_test_db().await;
    let app = test_app(&db);

    let (_, body) = send(
        &app,
        "POST",
        "/api/public/requests",
        None,
        Some(json!({
            "title": "Minecraft collab",
            "description": "With the whole gen",
            "request_type": "COLLABORATION"
        })),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let vote_uri = format!("/api/public/requests/{}/vote", id);
    send(&app, "POST", &vote_uri, None, None).await;
    let (status, body) = send(&app, "POST", &vote_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], 2);

    let (status, _) = send(&app, "POST", "/api/public/requests/999/vote", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback_workflow_stores_response() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    let (status, body) = send(
        &app,
        "POST",
        "/api/public/feedback",
        None,
        Some(json!({ "feedback_type": "BUG", "message": "Video player stutters", "rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    let status_uri = format!("/api/feedback/{}/status", id);

    let (status, _) = send(&app, "PUT", &status_uri, Some(&token), Some(json!({ "status": "CLOSED" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, "PUT", &status_uri, Some(&token), Some(json!({ "status": "REVIEWING" }))).await;
    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        Some(&token),
        Some(json!({ "status": "RESPONDED", "response": "Fixed in the latest deploy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"]["status"], "RESPONDED");
    assert_eq!(body["feedback"]["response"], "Fixed in the latest deploy");
    assert_eq!(body["available_actions"], json!(["CLOSED"]));
}

#[tokio::test]
async fn test_feedback_rating_out_of_range() {
    let db = setup_test_db().await;
    let app = test_app(&db);

    let (status, body) = send(
        &app,
        "POST",
        "/api/public/feedback",
        None,
        Some(json!({ "feedback_type": "PRAISE", "message": "Love it", "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_public_lead_validation() {
    let db = setup_test_db().await;
    let app = test_app(&db);

    let (status, _) = send(
        &app,
        "POST",
        "/api/public/leads",
        None,
        Some(json!({ "name": "Mika", "email": "not-an-email", "message": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/public/leads",
        None,
        Some(json!({ "name": "  ", "email": "mika@example.com", "message": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submissions_notify_and_mark_all_read() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    let (status, _) = send(
        &app,
        "POST",
        "/api/public/leads",
        None,
        Some(json!({
            "name": "Mika Tanaka",
            "email": "mika@example.com",
            "message": "Sponsorship enquiry",
            "estimated_value": 1200.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    send(
        &app,
        "POST",
        "/api/public/feedback",
        None,
        Some(json!({ "feedback_type": "PRAISE", "message": "Great stream" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/notifications", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 2);
    assert_eq!(body["total"], 2);
    let types: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["notification_type"].as_str())
        .collect();
    assert!(types.contains(&"LEAD"));
    assert!(types.contains(&"FEEDBACK"));

    let (status, body) = send(&app, "PUT", "/api/notifications/read-all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);
    assert_eq!(body["unread_count"], 0);

    let (_, body) = send(&app, "GET", "/api/notifications?unread_only=true", Some(&token), None).await;
    assert_eq!(body["total"], 0);

    // Idempotent
    let (_, body) = send(&app, "PUT", "/api/notifications/read-all", Some(&token), None).await;
    assert_eq!(body["updated"], 0);
}

#[tokio::test]
async fn test_mark_single_notification_read() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    send(
        &app,
        "POST",
        "/api/public/leads",
        None,
        Some(json!({ "name": "Ren", "email": "ren@example.com", "message": "Hello" })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/notifications", Some(&token), None).await;
    let id = body["notifications"][0]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "PUT", &format!("/api/notifications/{}/read", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 0);

    let (status, _) = send(&app, "PUT", "/api/notifications/9999/read", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_analytics_monthly_trend() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    let stream = create_test_content(&db, "Karaoke night", "Aoba").await;
    let short = create_test_content(&db, "Morning short", "Sora").await;

    create_test_event(&db, stream, "view", "twitter", "2026-01-10T12:00:00.000Z").await;
    create_test_event(&db, stream, "view", "direct", "2026-01-28T08:30:00.000Z").await;
    create_test_event(&db, stream, "view", "twitter", "2026-02-02T21:00:00.000Z").await;
    create_test_event(&db, stream, "like", "direct", "2026-02-02T21:05:00.000Z").await;
    create_test_event(&db, short, "view", "direct", "2026-02-14T09:00:00.000Z").await;

    let (status, body) = send(&app, "GET", "/api/analytics/content", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_views"], 4);
    assert_eq!(
        body["monthly_trend"],
        json!([
            { "month": "2026-01", "label": "Jan 2026", "views": 2 },
            { "month": "2026-02", "label": "Feb 2026", "views": 2 }
        ])
    );

    let top = &body["top_content"][0];
    assert_eq!(top["title"], "Karaoke night");
    assert_eq!(top["views"], 3);
    assert_eq!(top["interactions"], 1);
    assert_eq!(top["engagement_rate"], 33.3);

    // Character filter narrows everything
    let (_, body) = send(&app, "GET", "/api/analytics/content?character=Sora", Some(&token), None).await;
    assert_eq!(body["total_views"], 1);
    assert_eq!(body["monthly_trend"][0]["month"], "2026-02");

    // Date range is inclusive on both ends
    let (_, body) = send(
        &app,
        "GET",
        "/api/analytics/content?from=2026-01-01&to=2026-01-31",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total_views"], 2);

    let (status, _) = send(
        &app,
        "GET",
        "/api/analytics/content?from=2026-02-01&to=2026-01-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_content_analytics_csv_export() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    let id = create_test_content(&db, "Live, Laugh, Sing", "Aoba").await;
    create_test_event(&db, id, "view", "direct", "2026-03-01T10:00:00.000Z").await;

    let req = Request::builder()
        .uri("/api/analytics/content/export")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("content_analytics_"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("title,content_type,character,views,engagement_rate")
    );
    assert_eq!(lines.next(), Some("\"Live, Laugh, Sing\",VIDEO,Aoba,1,0.0"));
}

#[tokio::test]
async fn test_record_event_for_unknown_content() {
    let db = setup_test_db().await;
    let app = test_app(&db);

    let (status, _) = send(
        &app,
        "POST",
        "/api/public/content/42/events",
        None,
        Some(json!({ "event_type": "view" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create_test_content(&db, "Archive", "Aoba").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/public/content/{}/events", id),
        None,
        Some(json!({ "event_type": "teleport" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    for value in [1000.0, 500.0] {
        send(
            &app,
            "POST",
            "/api/public/leads",
            None,
            Some(json!({
                "name": "Sponsor",
                "email": "sponsor@example.com",
                "message": "Deal",
                "estimated_value": value
            })),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", "/api/dashboard/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_leads"], 2);
    assert_eq!(body["pipeline_value"], 1500.0);
    assert_eq!(body["unread_notifications"], 2);
}

#[tokio::test]
async fn test_list_pagination_envelope() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    for i in 0..3 {
        send(
            &app,
            "POST",
            "/api/public/leads",
            None,
            Some(json!({ "name": format!("Lead {}", i), "email": "l@example.com", "message": "m" })),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", "/api/leads?page=2&limit=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let db = setup_test_db().await;
    let (_, token) = create_test_admin(&db).await;
    let app = test_app(&db);

    send(
        &app,
        "POST",
        "/api/public/leads",
        None,
        Some(json!({ "name": "Lead", "email": "l@example.com", "message": "m" })),
    )
    .await;

    for uri in [
        "/api/leads?page=18446744073709551615&limit=20",
        "/api/requests?page=18446744073709551615",
        "/api/feedback?page=18446744073709551615&limit=1",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["items"], json!([]), "{}", uri);
    }

    let (_, body) = send(&app, "GET", "/api/leads?page=18446744073709551615&limit=20", Some(&token), None).await;
    assert_eq!(body["total"], 1);
}
