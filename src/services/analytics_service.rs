//! Analytics Service - read-only aggregates over content events
//!
//! Views are events with `event_type = 'view'`; every other event type counts
//! as an interaction for the engagement rate.

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::optional;
use crate::domain::DomainError;
use crate::models::content::{self, ContentType, Entity as Content};
use crate::models::content_event::{self, EVENT_VIEW, Entity as ContentEvent};

pub const DEFAULT_TOP_N: u64 = 10;

/// `created_at` is RFC 3339, so its first seven characters are `YYYY-MM`
const MONTH_EXPR: &str = "substr(created_at, 1, 7)";

#[derive(Debug, Default, Clone)]
pub struct AnalyticsFilter {
    pub content_type: Option<ContentType>,
    pub character: Option<String>,
    /// Inclusive start date
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    pub to: Option<NaiveDate>,
    /// Top-N size; `None` keeps every item (CSV export)
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopContent {
    pub id: i32,
    pub title: String,
    pub content_type: ContentType,
    pub character: String,
    pub views: u64,
    pub interactions: u64,
    /// interactions / views * 100, one decimal
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountBucket {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub month: String,
    /// e.g. `Jan 2026`
    pub label: String,
    pub views: u64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ContentAnalytics {
    pub total_views: u64,
    pub top_content: Vec<TopContent>,
    pub by_source: Vec<CountBucket>,
    pub by_event_type: Vec<CountBucket>,
    pub monthly_trend: Vec<MonthBucket>,
}

pub fn engagement_rate(views: u64, interactions: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    let rate = interactions as f64 / views as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

pub fn month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

fn sorted_buckets(rows: Vec<(String, i64)>) -> Vec<CountBucket> {
    let mut buckets: Vec<CountBucket> = rows
        .into_iter()
        .map(|(key, count)| CountBucket {
            key,
            count: to_count(count),
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets
}

/// Event condition for the date range and (optionally) a content id set
fn event_condition(filter: &AnalyticsFilter, content_ids: Option<&[i32]>) -> Condition {
    let mut condition = Condition::all();

    if let Some(ids) = content_ids {
        condition = condition.add(content_event::Column::ContentId.is_in(ids.iter().copied()));
    }
    if let Some(from) = filter.from {
        condition = condition.add(
            content_event::Column::CreatedAt.gte(from.format("%Y-%m-%d").to_string()),
        );
    }
    if let Some(to) = filter.to.and_then(|d| d.succ_opt()) {
        condition =
            condition.add(content_event::Column::CreatedAt.lt(to.format("%Y-%m-%d").to_string()));
    }

    condition
}

/// Content ids matching the content-level filters, `None` when unfiltered
async fn matching_content_ids(
    db: &DatabaseConnection,
    filter: &AnalyticsFilter,
) -> Result<Option<Vec<i32>>, DomainError> {
    let character = optional(filter.character.clone());
    if filter.content_type.is_none() && character.is_none() {
        return Ok(None);
    }

    let mut query = Content::find().select_only().column(content::Column::Id);
    if let Some(content_type) = filter.content_type {
        query = query.filter(content::Column::ContentType.eq(content_type));
    }
    if let Some(character) = character {
        query = query.filter(content::Column::CharacterName.eq(character));
    }

    Ok(Some(query.into_tuple::<i32>().all(db).await?))
}

pub async fn content_analytics(
    db: &DatabaseConnection,
    filter: AnalyticsFilter,
) -> Result<ContentAnalytics, DomainError> {
    let content_ids = matching_content_ids(db, &filter).await?;
    if matches!(&content_ids, Some(ids) if ids.is_empty()) {
        return Ok(ContentAnalytics::default());
    }

    let base = event_condition(&filter, content_ids.as_deref());
    let views_only = base
        .clone()
        .add(content_event::Column::EventType.eq(EVENT_VIEW));

    let total_views = ContentEvent::find()
        .filter(views_only.clone())
        .count(db)
        .await?;

    let by_source = ContentEvent::find()
        .select_only()
        .column(content_event::Column::Source)
        .column_as(content_event::Column::Id.count(), "count")
        .filter(views_only.clone())
        .group_by(content_event::Column::Source)
        .into_tuple::<(String, i64)>()
        .all(db)
        .await?;

    let by_event_type = ContentEvent::find()
        .select_only()
        .column(content_event::Column::EventType)
        .column_as(content_event::Column::Id.count(), "count")
        .filter(base.clone())
        .group_by(content_event::Column::EventType)
        .into_tuple::<(String, i64)>()
        .all(db)
        .await?;

    let months = ContentEvent::find()
        .select_only()
        .column_as(Expr::cust(MONTH_EXPR), "month")
        .column_as(content_event::Column::Id.count(), "views")
        .filter(views_only)
        .group_by(Expr::cust(MONTH_EXPR))
        .into_tuple::<(String, i64)>()
        .all(db)
        .await?;

    let per_content = ContentEvent::find()
        .select_only()
        .column(content_event::Column::ContentId)
        .column(content_event::Column::EventType)
        .column_as(content_event::Column::Id.count(), "count")
        .filter(base)
        .group_by(content_event::Column::ContentId)
        .group_by(content_event::Column::EventType)
        .into_tuple::<(i32, String, i64)>()
        .all(db)
        .await?;

    let top_content = rank_content(db, per_content, filter.limit).await?;

    // BTreeMap keeps the trend in ascending month order
    let monthly_trend = months
        .into_iter()
        .map(|(month, views)| (month, to_count(views)))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(month, views)| MonthBucket {
            label: month_label(&month),
            month,
            views,
        })
        .collect();

    Ok(ContentAnalytics {
        total_views,
        top_content,
        by_source: sorted_buckets(by_source),
        by_event_type: sorted_buckets(by_event_type),
        monthly_trend,
    })
}

async fn rank_content(
    db: &DatabaseConnection,
    per_content: Vec<(i32, String, i64)>,
    limit: Option<u64>,
) -> Result<Vec<TopContent>, DomainError> {
    // content_id -> (views, interactions)
    let mut totals: HashMap<i32, (u64, u64)> = HashMap::new();
    for (content_id, event_type, count) in per_content {
        let entry = totals.entry(content_id).or_default();
        if event_type == EVENT_VIEW {
            entry.0 += to_count(count);
        } else {
            entry.1 += to_count(count);
        }
    }

    let mut ranked: Vec<(i32, u64, u64)> = totals
        .into_iter()
        .map(|(id, (views, interactions))| (id, views, interactions))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(limit) = limit {
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    if ranked.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = ranked.iter().map(|(id, _, _)| *id).collect();
    let items: HashMap<i32, content::Model> = Content::find()
        .filter(content::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(ranked
        .into_iter()
        .filter_map(|(id, views, interactions)| {
            items.get(&id).map(|item| TopContent {
                id,
                title: item.title.clone(),
                content_type: item.content_type,
                character: item.character_name.clone(),
                views,
                interactions,
                engagement_rate: engagement_rate(views, interactions),
            })
        })
        .collect())
}

/// Render the per-content table as CSV. Fields containing separators or
/// quotes are quoted by the writer.
pub fn render_csv(rows: &[TopContent]) -> Result<String, DomainError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["title", "content_type", "character", "views", "engagement_rate"])
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    for row in rows {
        let views = row.views.to_string();
        let rate = format!("{:.1}", row.engagement_rate);
        writer
            .write_record([
                row.title.as_str(),
                row.content_type.as_str(),
                row.character.as_str(),
                views.as_str(),
                rate.as_str(),
            ])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DomainError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, views: u64, rate: f64) -> TopContent {
        TopContent {
            id: 1,
            title: title.to_string(),
            content_type: ContentType::Music,
            character: "aoba".to_string(),
            views,
            interactions: 0,
            engagement_rate: rate,
        }
    }

    #[test]
    fn test_engagement_rate_rounds_to_one_decimal() {
        assert_eq!(engagement_rate(3, 1), 33.3);
        assert_eq!(engagement_rate(8, 2), 25.0);
        assert_eq!(engagement_rate(0, 5), 0.0);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2026-01"), "Jan 2026");
        assert_eq!(month_label("2025-12"), "Dec 2025");
        assert_eq!(month_label("garbage"), "garbage");
    }

    #[test]
    fn test_buckets_sorted_by_count_then_key() {
        let buckets = sorted_buckets(vec![
            ("twitter".to_string(), 2),
            ("youtube".to_string(), 5),
            ("discord".to_string(), 2),
        ]);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["youtube", "discord", "twitter"]);
    }

    #[test]
    fn test_csv_plain_rows_are_simple_joins() {
        let csv = render_csv(&[row("Night Song", 12, 25.0)]).unwrap();
        assert_eq!(
            csv,
            "title,content_type,character,views,engagement_rate\nNight Song,MUSIC,aoba,12,25.0\n"
        );
    }

    #[test]
    fn test_csv_quotes_embedded_commas_and_quotes() {
        let csv = render_csv(&[row("Hello, \"World\"", 1, 0.0)]).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "\"Hello, \"\"World\"\"\",MUSIC,aoba,1,0.0");
    }
}
