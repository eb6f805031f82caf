use std::time::Duration;

use serde::Deserialize;
use shared::github::GITHUB_API_URL;

use crate::cache::DEFAULT_TTL_IN_MINUTES;

const DEFAULT_REQUEST_TIMEOUT_IN_SECONDS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct Env {
    pub github_repository: String,
    pub github_api_url: Option<String>,
    pub github_token: Option<String>,
    pub cache_ttl_in_minutes: Option<u32>,
    pub request_timeout_in_seconds: Option<u64>,
    pub warmup_interval_in_minutes: Option<u32>,
}

impl Env {
    pub fn load() -> anyhow::Result<Self> {
        Ok(envy::from_env::<Self>()?)
    }

    pub fn github_api_url(&self) -> &str {
        self.github_api_url.as_deref().unwrap_or(GITHUB_API_URL)
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.cache_ttl_in_minutes
                .unwrap_or(DEFAULT_TTL_IN_MINUTES) as i64,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_in_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_IN_SECONDS),
        )
    }

    pub fn warmup_interval(&self) -> Option<Duration> {
        self.warmup_interval_in_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(minutes as u64 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Env, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
    }

    #[test]
    fn defaults() {
        let env = parse(&[("GITHUB_REPOSITORY", "owner/repo")]).unwrap();

        assert_eq!(env.github_api_url(), "https://api.github.com");
        assert_eq!(env.cache_ttl(), chrono::Duration::minutes(30));
        assert_eq!(env.request_timeout(), Duration::from_secs(30));
        assert!(env.github_token.is_none());
        assert!(env.warmup_interval().is_none());
    }

    #[test]
    fn overrides() {
        let env = parse(&[
            ("GITHUB_REPOSITORY", "owner/repo"),
            ("GITHUB_API_URL", "http://localhost:9000"),
            ("GITHUB_TOKEN", "secret"),
            ("CACHE_TTL_IN_MINUTES", "5"),
            ("REQUEST_TIMEOUT_IN_SECONDS", "2"),
            ("WARMUP_INTERVAL_IN_MINUTES", "10"),
        ])
        .unwrap();

        assert_eq!(env.github_api_url(), "http://localhost:9000");
        assert_eq!(env.github_token.as_deref(), Some("secret"));
        assert_eq!(env.cache_ttl(), chrono::Duration::minutes(5));
        assert_eq!(env.request_timeout(), Duration::from_secs(2));
        assert_eq!(env.warmup_interval(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn zero_warmup_interval_disables_warmer() {
        let env = parse(&[
            ("GITHUB_REPOSITORY", "owner/repo"),
            ("WARMUP_INTERVAL_IN_MINUTES", "0"),
        ])
        .unwrap();

        assert!(env.warmup_interval().is_none());
    }

    #[test]
    fn repository_is_required() {
        assert!(parse(&[]).is_err());
    }
}
