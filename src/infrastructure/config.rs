use std::env;

/// Fan-site domains plus the local dev servers of all three apps
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://aoba-nekosora.com",
    "https://www.aoba-nekosora.com",
    "https://tech.aoba-nekosora.com",
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:3002",
    "http://127.0.0.1:3000",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub audit_retention_days: i64,
    pub audit_purge_interval_secs: u64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://nekosora_cms.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| parse_origin_list(&s))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(default_origins),
            audit_retention_days: env::var("AUDIT_RETENTION_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(90),
            audit_purge_interval_secs: env::var("AUDIT_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(86_400),
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            cors_allowed_origins: default_origins(),
            audit_retention_days: 90,
            audit_purge_interval_secs: 86_400,
            admin_username: None,
            admin_password: None,
            seed_demo: false,
        }
    }
}

fn default_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_list_trims_and_drops_empty() {
        let list = parse_origin_list(" https://a.example/ ,, http://localhost:3000 ");
        assert_eq!(list, vec!["https://a.example", "http://localhost:3000"]);
    }

    #[test]
    fn test_default_includes_fan_site() {
        let config = Config::default();
        assert!(
            config
                .cors_allowed_origins
                .iter()
                .any(|o| o == "https://aoba-nekosora.com")
        );
    }
}
