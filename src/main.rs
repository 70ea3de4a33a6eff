use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nekosora_cms::infrastructure::AppState;
use nekosora_cms::services::{audit_service, user_service};
use nekosora_cms::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nekosora_cms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    // Bootstrap admin account
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password)
        && let Err(e) = user_service::ensure_admin(&db, username, password).await
    {
        tracing::error!("Failed to create admin account: {}", e);
    }

    // Check for seed flag
    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    // Audit retention sweep
    tokio::spawn(audit_service::run_retention(
        db.clone(),
        config.audit_retention_days,
        Duration::from_secs(config.audit_purge_interval_secs),
    ));

    let state = AppState::new(db, config);
    if let Err(e) = server::serve(state).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
