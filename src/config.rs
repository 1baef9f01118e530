use anyhow::{anyhow, Context, Result};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Limits and repair behaviour applied to generated ad copy.
#[derive(Debug, Clone)]
pub struct AdRules {
    pub headline_count: usize,
    pub description_count: usize,
    pub headline_max_chars: usize,
    pub description_max_chars: usize,
    /// Collapse the three headlines into a single `" | "` joined entry.
    pub join_headlines: bool,
    pub strip_disallowed_chars: bool,
    pub brand_markers: Vec<String>,
    pub brand_suffix: String,
    pub cta_verbs: Vec<String>,
    pub cta_text: String,
}

impl Default for AdRules {
    fn default() -> Self {
        Self {
            headline_count: 3,
            description_count: 1,
            headline_max_chars: 30,
            description_max_chars: 90,
            join_headlines: false,
            strip_disallowed_chars: true,
            brand_markers: vec!["dental".into(), "dentistry".into()],
            brand_suffix: " Dental".into(),
            cta_verbs: vec!["book".into(), "call".into(), "visit".into()],
            cta_text: "Book Your Visit Today".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.7, top_k: 40, top_p: 0.95, max_output_tokens: 200 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `?key=` query parameter
    Query,
    /// `Authorization: Bearer` header
    Bearer,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub auth_mode: AuthMode,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            auth_mode: AuthMode::Query,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub rules: AdRules,
    pub params: GenerationParams,
    pub request_timeout: Duration,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let auth_mode = match var("GEMINI_AUTH_MODE").as_deref() {
            None | Some("query") => AuthMode::Query,
            Some("bearer") => AuthMode::Bearer,
            Some(other) => {
                return Err(anyhow!("GEMINI_AUTH_MODE must be 'query' or 'bearer', got '{}'", other))
            }
        };

        let gemini = GeminiSettings {
            api_key: var("GEMINI_API_KEY"),
            base_url: var("GEMINI_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            auth_mode,
        };

        let defaults = AdRules::default();
        let rules = AdRules {
            headline_max_chars: parse_or(var("AD_HEADLINE_MAX_CHARS"), "AD_HEADLINE_MAX_CHARS", defaults.headline_max_chars)?,
            description_max_chars: parse_or(var("AD_DESCRIPTION_MAX_CHARS"), "AD_DESCRIPTION_MAX_CHARS", defaults.description_max_chars)?,
            join_headlines: parse_or(var("AD_JOIN_HEADLINES"), "AD_JOIN_HEADLINES", defaults.join_headlines)?,
            strip_disallowed_chars: parse_or(var("AD_STRIP_DISALLOWED_CHARS"), "AD_STRIP_DISALLOWED_CHARS", defaults.strip_disallowed_chars)?,
            ..defaults
        };
        if rules.headline_max_chars == 0 || rules.description_max_chars == 0 {
            return Err(anyhow!("ad character limits must be greater than zero"));
        }

        let timeout_secs: u64 = parse_or(var("GEMINI_TIMEOUT_SECS"), "GEMINI_TIMEOUT_SECS", 30)?;
        let port: u16 = parse_or(var("PORT"), "PORT", 8080)?;

        Ok(Self {
            gemini,
            rules,
            params: GenerationParams::default(),
            request_timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v.parse::<T>().with_context(|| format!("{key} has an invalid value '{v}'")),
        None => Ok(default),
    }
}
