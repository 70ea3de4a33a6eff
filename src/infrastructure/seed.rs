use chrono::{Duration, SecondsFormat, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::auth::hash_password;
use crate::domain::DomainError;
use crate::models::content::ContentType;
use crate::models::content_event::EVENT_VIEW;
use crate::models::feedback::FeedbackType;
use crate::models::lead::LeadSource;
use crate::models::request::{RequestPriority, RequestType};
use crate::models::{content, content_event, user};
use crate::services::feedback_service::{self, NewFeedback};
use crate::services::lead_service::{self, NewLead};
use crate::services::request_service::{self, NewRequest};
use crate::services::now;

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Populate an empty database with a demo editor, catalogue and inbox.
/// Safe to run twice: users are upserted and the rest is skipped once content exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    // 1. Demo editor
    let editor = user::ActiveModel {
        username: Set("editor".to_owned()),
        password_hash: Set(hash_password("editor-demo").map_err(DomainError::Internal)?),
        role: Set(user::ROLE_EDITOR.to_owned()),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    };

    user::Entity::insert(editor)
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(db)
        .await?;

    if content::Entity::find().count(db).await? > 0 {
        tracing::info!("Content already present, skipping demo catalogue");
        return Ok(());
    }

    // 2. Catalogue, with view/like traffic spread over the last two months
    let catalogue = [
        ("Aoba's first karaoke stream", ContentType::Stream, "Aoba", 40, 12),
        ("Nekosora theme song", ContentType::Music, "Aoba", 25, 9),
        ("Building the fan site in a weekend", ContentType::Article, "Sora", 12, 3),
        ("Rigging tutorial: blinking eyes", ContentType::Tutorial, "Sora", 18, 6),
    ];

    for (title, content_type, character, views, likes) in catalogue {
        let item = content::ActiveModel {
            title: Set(title.to_owned()),
            content_type: Set(content_type),
            character_name: Set(character.to_owned()),
            url: Set(None),
            published_at: Set(Some(days_ago(60))),
            created_at: Set(days_ago(60)),
            updated_at: Set(days_ago(60)),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let events = (0..views)
            .map(|i| (EVENT_VIEW, i))
            .chain((0..likes).map(|i| ("like", i)))
            .map(|(event_type, i)| content_event::ActiveModel {
                content_id: Set(item.id),
                event_type: Set(event_type.to_owned()),
                source: Set(if i % 3 == 0 { "twitter" } else { "direct" }.to_owned()),
                created_at: Set(days_ago(i64::from(i % 50))),
                ..Default::default()
            });

        content_event::Entity::insert_many(events).exec(db).await?;
    }

    // 3. Inbox
    lead_service::create_lead(
        db,
        NewLead {
            name: "Mika Tanaka".to_owned(),
            email: "mika@example.com".to_owned(),
            company: Some("Starlight Audio".to_owned()),
            message: "We'd love to sponsor the next anniversary stream.".to_owned(),
            source: Some(LeadSource::Website),
            estimated_value: Some(2500.0),
            site: Some("aoba-nekosora.com".to_owned()),
        },
    )
    .await?;

    request_service::create_request(
        db,
        NewRequest {
            title: "Cover of a 90s city-pop song".to_owned(),
            description: "Anything by Mariya Takeuchi please!".to_owned(),
            request_type: RequestType::Song,
            priority: Some(RequestPriority::Medium),
            submitter_name: Some("kumo".to_owned()),
            submitter_email: None,
            site: Some("aoba-nekosora.com".to_owned()),
        },
    )
    .await?;

    feedback_service::create_feedback(
        db,
        NewFeedback {
            feedback_type: FeedbackType::Praise,
            message: "The new tech blog layout is great on mobile.".to_owned(),
            rating: Some(5),
            submitter_name: None,
            submitter_email: None,
            site: Some("tech.aoba-nekosora.com".to_owned()),
        },
    )
    .await?;

    Ok(())
}
