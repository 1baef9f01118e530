use crate::config::AdRules;
use crate::models::PracticeFacts;

pub fn build_ad_prompt(facts: &PracticeFacts, rules: &AdRules) -> String {
    let keywords = if facts.keywords.is_empty() {
        String::new()
    } else {
        format!("\nKeywords to Target: {}", facts.keywords.join(", "))
    };

    format!(
        "Create a Google Search ad for a dental practice with the following information:\n\
        Practice Name: {name}\n\
        Website: {website}\n\
        Services Offered: {services}{keywords}\n\
        \n\
        Requirements (these are hard limits, not suggestions):\n\
        - Exactly {headline_count} headlines, each at most {headline_max} characters.\n\
        - Exactly {description_count} description, at most {description_max} characters.\n\
        - A display URL based on the practice website.\n\
        \n\
        Respond with a single JSON object and nothing else, using exactly these keys:\n\
        {{\"headlines\": [\"...\", \"...\", \"...\"], \"descriptions\": [\"...\"], \"url\": \"...\"}}",
        name = facts.practice_name,
        website = facts.website,
        services = facts.services.join(", "),
        keywords = keywords,
        headline_count = rules.headline_count,
        headline_max = rules.headline_max_chars,
        description_count = rules.description_count,
        description_max = rules.description_max_chars,
    )
}
