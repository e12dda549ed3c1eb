use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const GEMINI_GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro-preview-03-25:generateContent";
pub const STRIPE_API_BASE: &str = "https://api.stripe.com/";

/// Environment variables picked up by [`Config::load`], lowercased.
const ENV_KEYS: &[&str] = &[
    "gemini_api_url",
    "gemini_timeout_secs",
    "stripe_api_base",
    "public_base_url",
    "database_url",
    "listen_addr",
    "loglevel",
    "insecure_cookie",
];

/// Opaque credentials. Read verbatim so values like `123456` or `true` stay strings.
const SECRET_ENV_KEYS: &[&str] = &[
    "secret_key",
    "gemini_api_key",
    "stripe_secret_key",
    "stripe_public_key",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Key material for the private session cookies.
    pub secret_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: Url,
    pub gemini_timeout_secs: u64,
    pub stripe_secret_key: Option<String>,
    /// Publishable key; only browser-side Stripe.js needs it, the hosted checkout redirect does not.
    pub stripe_public_key: Option<String>,
    pub stripe_api_base: Url,
    /// External address of this service; checkout return URLs are built from it.
    pub public_base_url: Url,
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub insecure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: None,
            gemini_api_key: None,
            gemini_api_url: Url::parse(GEMINI_GENERATE_URL).expect("valid default Gemini URL"),
            gemini_timeout_secs: 30,
            stripe_secret_key: None,
            stripe_public_key: None,
            stripe_api_base: Url::parse(STRIPE_API_BASE).expect("valid default Stripe URL"),
            public_base_url: Url::parse("http://localhost:8000/").expect("valid default base URL"),
            database_url: "sqlite://users.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            insecure_cookie: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(ENV_KEYS));
        for key in SECRET_ENV_KEYS {
            if let Ok(value) = std::env::var(key.to_ascii_uppercase()) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    pub fn gemini_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini_timeout_secs)
    }

    /// Empty strings in the environment count as "not configured".
    pub fn gemini_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn stripe_key(&self) -> Option<&str> {
        self.stripe_secret_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_providers_unconfigured() {
        let cfg = Config::default();
        assert!(cfg.gemini_key().is_none());
        assert!(cfg.stripe_key().is_none());
        assert_eq!(cfg.gemini_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.stripe_api_base.as_str(), STRIPE_API_BASE);
    }

    #[test]
    fn environment_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("GEMINI_API_KEY", "abc");
            jail.set_env("GEMINI_TIMEOUT_SECS", "5");
            jail.set_env("PUBLIC_BASE_URL", "https://copy.example.com/");
            jail.set_env("UNRELATED_VAR", "ignored");

            let cfg = Config::load()?;
            assert_eq!(cfg.gemini_key(), Some("abc"));
            assert_eq!(cfg.gemini_timeout_secs, 5);
            assert_eq!(cfg.public_base_url.as_str(), "https://copy.example.com/");
            Ok(())
        });
    }

    #[test]
    fn secrets_keep_numeric_and_boolean_looking_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SECRET_KEY", "123456");
            jail.set_env("GEMINI_API_KEY", "true");
            jail.set_env("STRIPE_SECRET_KEY", "007");

            let cfg = Config::load()?;
            assert_eq!(cfg.secret_key.as_deref(), Some("123456"));
            assert_eq!(cfg.gemini_key(), Some("true"));
            assert_eq!(cfg.stripe_key(), Some("007"));
            Ok(())
        });
    }

    #[test]
    fn blank_keys_are_treated_as_missing() {
        let cfg = Config {
            gemini_api_key: Some("  ".to_string()),
            stripe_secret_key: Some(String::new()),
            ..Config::default()
        };
        assert!(cfg.gemini_key().is_none());
        assert!(cfg.stripe_key().is_none());
    }
}
