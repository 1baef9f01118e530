use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{AdRules, GenerationParams};
use crate::error::GenerationError;
use crate::gemini::TextGenerator;
use crate::models::{AdRequest, GeneratedAd};
use crate::{normalize, parse, prompt};

/// Turns practice facts into validated Google Ad copy with one call to the text backend.
pub struct AdCopyGenerator {
    backend: Arc<dyn TextGenerator>,
    rules: AdRules,
    params: GenerationParams,
    timeout: Duration,
}

impl AdCopyGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>, rules: AdRules, params: GenerationParams, timeout: Duration) -> Self {
        Self { backend, rules, params, timeout }
    }

    pub async fn generate(&self, request: &AdRequest) -> Result<GeneratedAd, GenerationError> {
        self.generate_until(request, std::future::pending::<()>()).await
    }

    /// Like [`generate`](Self::generate) but gives up as soon as `cancel` resolves.
    pub async fn generate_until<F>(&self, request: &AdRequest, cancel: F) -> Result<GeneratedAd, GenerationError>
    where
        F: Future<Output = ()>,
    {
        let facts = request.validate()?;
        info!("🎯 Generating ad for '{}' ({} services, {} keywords)", facts.practice_name, facts.services.len(), facts.keywords.len());

        let prompt = prompt::build_ad_prompt(&facts, &self.rules);
        let call = tokio::time::timeout(self.timeout, self.backend.generate_text(&prompt, &self.params));

        let text = tokio::select! {
            biased;
            _ = cancel => {
                warn!("🛑 Ad generation for '{}' cancelled", facts.practice_name);
                return Err(GenerationError::Service("cancelled".into()));
            }
            result = call => match result {
                Ok(text) => text?,
                Err(_) => return Err(GenerationError::Service(format!("timed out after {}s", self.timeout.as_secs_f32()))),
            },
        };

        let value = parse::parse_generated_json(&text)?;
        let draft = parse::validate_structure(&value, &self.rules)?;
        let ad = normalize::normalize_ad(draft, &facts, &self.rules)?;

        info!("✅ Generated ad for '{}': {:?}", facts.practice_name, ad.headlines);
        Ok(ad)
    }
}
