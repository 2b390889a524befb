use std::env;
use thiserror::Error;
use tracing::warn;

pub const REQUIRED_ENV_VARS: [&str; 3] = ["GROQ_API_KEY", "SUPABASE_URL", "SUPABASE_KEY"];

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_GROQ_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
const DEFAULT_BOOKS_TABLE: &str = "filtered_books";
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),
}

/// Process-wide settings, read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub books_table: String,
    pub static_dir: String,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary lookup.
    ///
    /// Every required variable is checked before failing, so the error names
    /// all of the missing ones at once. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let missing: Vec<&'static str> = REQUIRED_ENV_VARS
            .iter()
            .copied()
            .filter(|&name| get(name).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid PORT value '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Ok(Config {
            port,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            groq_api_key: get("GROQ_API_KEY").unwrap_or_default(),
            groq_api_url: get("GROQ_API_URL").unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string()),
            groq_model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            supabase_url: get("SUPABASE_URL").unwrap_or_default(),
            supabase_key: get("SUPABASE_KEY").unwrap_or_default(),
            books_table: get("BOOKS_TABLE").unwrap_or_else(|| DEFAULT_BOOKS_TABLE.to_string()),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        })
    }

    pub fn has_groq_key(&self) -> bool {
        !self.groq_api_key.is_empty()
    }

    pub fn has_supabase_url(&self) -> bool {
        !self.supabase_url.is_empty()
    }

    pub fn has_supabase_key(&self) -> bool {
        !self.supabase_key.is_empty()
    }

    /// Number of required variables that are set.
    pub fn loaded_count(&self) -> usize {
        [
            self.has_groq_key(),
            self.has_supabase_url(),
            self.has_supabase_key(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_loads_required_and_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("SUPABASE_URL", "https://db.example.co"),
            ("SUPABASE_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.groq_model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.books_table, "filtered_books");
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.loaded_count(), 3);
    }

    #[test]
    fn test_reports_every_missing_variable() {
        let err = Config::from_lookup(lookup_from(&[("SUPABASE_URL", "https://db.example.co")]))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingVars(vec!["GROQ_API_KEY", "SUPABASE_KEY"])
        );
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: GROQ_API_KEY, SUPABASE_KEY"
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", ""),
            ("SUPABASE_URL", "https://db.example.co"),
            ("SUPABASE_KEY", "anon"),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::MissingVars(vec!["GROQ_API_KEY"]));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("SUPABASE_URL", "https://db.example.co"),
            ("SUPABASE_KEY", "anon"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
    }
}
