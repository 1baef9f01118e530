//! Deterministic repair of generated ad copy.
//!
//! Each rule is a pure `&str -> String` step. Headlines and descriptions run
//! through a short ordered list of steps; position specific rules (brand on
//! the first headline, call to action on the last) run on the already cut
//! headline, followed by one more cut. Running the whole pass twice changes
//! nothing.

use crate::config::AdRules;
use crate::error::GenerationError;
use crate::models::{AdDraft, GeneratedAd, PracticeFacts};

pub type Step = Box<dyn Fn(&str) -> String + Send + Sync>;

pub const HEADLINE_SEPARATOR: &str = " | ";

const HEADLINE_TRAILING: &[char] = &['.', ':', '!', '?', ',', ';', '-', '&'];
const DESCRIPTION_PUNCTUATION: &[char] = &['.', ',', '!', '?', '\'', '-', '&', ':', ';', '%', '$', '/', '(', ')', '+'];
const DESCRIPTION_DANGLING: &[char] = &[',', ';', ':', '-', '&', '/', '(', '+'];

pub fn run(steps: &[Step], input: &str) -> String {
    steps.iter().fold(input.to_string(), |acc, step| step(&acc))
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word characters, space, `&` and `-`.
pub fn keep_headline_chars(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | ' ' | '&' | '-'))
        .collect()
}

pub fn keep_description_chars(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || DESCRIPTION_PUNCTUATION.contains(c))
        .collect()
}

pub fn strip_trailing_punctuation(s: &str) -> String {
    s.trim_end_matches(|c: char| c.is_whitespace() || HEADLINE_TRAILING.contains(&c))
        .to_string()
}

/// Hard cut to `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Cut to `max` characters without leaving a fragment of a word behind.
/// A single word longer than `max` is hard cut.
pub fn truncate_at_word(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut = truncate_chars(s, max);
    let next_is_break = s.chars().nth(max).map_or(true, char::is_whitespace);
    let kept = if next_is_break || cut.ends_with(char::is_whitespace) {
        cut.as_str()
    } else {
        match cut.rfind(char::is_whitespace) {
            Some(idx) => &cut[..idx],
            None => cut.as_str(),
        }
    };
    kept.trim_end_matches(|c: char| c.is_whitespace() || DESCRIPTION_DANGLING.contains(&c))
        .to_string()
}

pub fn has_brand_marker(headline: &str, markers: &[String]) -> bool {
    let lower = headline.to_lowercase();
    markers.iter().any(|m| lower.contains(&m.to_lowercase()))
}

/// Append the brand suffix, shortening the headline first so the suffix survives the length cut.
pub fn ensure_brand(headline: &str, rules: &AdRules) -> String {
    if has_brand_marker(headline, &rules.brand_markers) {
        return headline.to_string();
    }
    let room = rules.headline_max_chars.saturating_sub(rules.brand_suffix.chars().count());
    let base = strip_trailing_punctuation(&truncate_chars(headline, room));
    format!("{}{}", base, rules.brand_suffix).trim().to_string()
}

pub fn has_call_to_action(headline: &str, verbs: &[String]) -> bool {
    headline
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| verbs.iter().any(|v| word.eq_ignore_ascii_case(v)))
}

pub fn ensure_call_to_action(headline: &str, rules: &AdRules) -> String {
    if has_call_to_action(headline, &rules.cta_verbs) {
        headline.to_string()
    } else {
        rules.cta_text.clone()
    }
}

fn headline_cleanup(rules: &AdRules) -> Vec<Step> {
    let mut steps: Vec<Step> = Vec::new();
    steps.push(Box::new(collapse_whitespace));
    if rules.strip_disallowed_chars {
        steps.push(Box::new(keep_headline_chars));
        steps.push(Box::new(collapse_whitespace));
    }
    steps.push(Box::new(strip_trailing_punctuation));
    steps
}

fn description_pipeline(rules: &AdRules) -> Vec<Step> {
    let mut steps: Vec<Step> = Vec::new();
    steps.push(Box::new(collapse_whitespace));
    if rules.strip_disallowed_chars {
        steps.push(Box::new(keep_description_chars));
        steps.push(Box::new(collapse_whitespace));
    }
    let max = rules.description_max_chars;
    steps.push(Box::new(move |s: &str| truncate_at_word(s, max)));
    steps
}

fn fit_headline(headline: &str, max: usize) -> String {
    strip_trailing_punctuation(&truncate_chars(headline, max))
}

pub fn normalize_ad(draft: AdDraft, facts: &PracticeFacts, rules: &AdRules) -> Result<GeneratedAd, GenerationError> {
    let cleanup = headline_cleanup(rules);
    let last = draft.headlines.len().saturating_sub(1);

    let mut headlines = Vec::with_capacity(draft.headlines.len());
    for (i, raw) in draft.headlines.iter().enumerate() {
        // Position rules look at the text that will actually ship.
        let mut headline = fit_headline(&run(&cleanup, raw), rules.headline_max_chars);
        if i == 0 {
            headline = ensure_brand(&headline, rules);
        } else if i == last {
            headline = ensure_call_to_action(&headline, rules);
        } else if headline.is_empty() {
            headline = facts.services.first().map(|s| run(&cleanup, s)).unwrap_or_default();
        }
        // The brand suffix or call to action may have pushed it back over the limit.
        let headline = fit_headline(&headline, rules.headline_max_chars);
        if headline.is_empty() {
            return Err(GenerationError::StructuralValidation(format!("headline {} is empty after cleanup", i + 1)));
        }
        headlines.push(headline);
    }

    let description_steps = description_pipeline(rules);
    let mut descriptions = Vec::with_capacity(draft.descriptions.len());
    for (i, raw) in draft.descriptions.iter().enumerate() {
        let description = run(&description_steps, raw);
        if description.is_empty() {
            return Err(GenerationError::StructuralValidation(format!("description {} is empty after cleanup", i + 1)));
        }
        descriptions.push(description);
    }

    if rules.join_headlines {
        headlines = vec![headlines.join(HEADLINE_SEPARATOR)];
    }

    Ok(GeneratedAd {
        headlines,
        descriptions,
        url: draft.url.unwrap_or_else(|| facts.website.clone()),
    })
}
