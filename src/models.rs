use serde::{Serialize, Deserialize};
use reqwest::Url;

use crate::error::GenerationError;

pub const MAX_SERVICES: usize = 3;
pub const MAX_KEYWORDS: usize = 3;

/// Body posted by the wizard. Every field defaults so that a missing value
/// surfaces as a request validation error instead of a JSON rejection.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdRequest {
    #[serde(default)]
    pub practice_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub selected_services: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>, // wizard always sends three slots, blanks included
}

/// Trimmed, filtered view of an [`AdRequest`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeFacts {
    pub practice_name: String,
    pub website: String,
    pub services: Vec<String>,
    pub keywords: Vec<String>,
}

impl AdRequest {
    pub fn validate(&self) -> Result<PracticeFacts, GenerationError> {
        let practice_name = self.practice_name.trim();
        if practice_name.is_empty() {
            return Err(GenerationError::RequestValidation("practiceName is required".into()));
        }

        let website = self.website.trim();
        if website.is_empty() {
            return Err(GenerationError::RequestValidation("website is required".into()));
        }
        Url::parse(website)
            .map_err(|e| GenerationError::RequestValidation(format!("website is not a valid URL: {e}")))?;

        let services = non_blank(&self.selected_services);
        if services.is_empty() {
            return Err(GenerationError::RequestValidation("at least one service must be selected".into()));
        }
        if services.len() > MAX_SERVICES {
            return Err(GenerationError::RequestValidation(format!(
                "at most {MAX_SERVICES} services may be selected, got {}",
                services.len()
            )));
        }

        let keywords = non_blank(&self.keywords);
        if keywords.len() > MAX_KEYWORDS {
            return Err(GenerationError::RequestValidation(format!(
                "at most {MAX_KEYWORDS} keywords may be given, got {}",
                keywords.len()
            )));
        }

        Ok(PracticeFacts {
            practice_name: practice_name.to_string(),
            website: website.to_string(),
            services,
            keywords,
        })
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ad copy as returned to the wizard's preview and stored alongside the practice record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GeneratedAd {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub url: String,
}

/// Generated payload that passed structural checks but has not been repaired yet.
#[derive(Debug, Clone, PartialEq)]
pub struct AdDraft {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub url: Option<String>,
}
