//! Turning the model's free-form reply into an [`AdDraft`].

use serde_json::Value;

use crate::config::AdRules;
use crate::error::GenerationError;
use crate::models::AdDraft;

/// Parse generated text as JSON, retrying once with code fences removed.
pub fn parse_generated_json(text: &str) -> Result<Value, GenerationError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(_) => {
            let stripped = strip_code_fences(text);
            serde_json::from_str::<Value>(stripped)
                .map_err(|e| GenerationError::Parse(format!("{} (text: {})", e, crate::gemini::preview(text, 200))))
        }
    }
}

/// Drop a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest.strip_prefix("json").or_else(|| rest.strip_prefix("JSON")).unwrap_or(rest);
        s = rest;
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

pub fn validate_structure(value: &Value, rules: &AdRules) -> Result<AdDraft, GenerationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| GenerationError::StructuralValidation("expected a JSON object".into()))?;

    let headlines = string_list(obj.get("headlines"), "headlines", rules.headline_count)?;
    let descriptions = string_list(obj.get("descriptions"), "descriptions", rules.description_count)?;

    let url = match obj.get("url") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => return Err(GenerationError::StructuralValidation("url must be a string".into())),
    };

    Ok(AdDraft { headlines, descriptions, url })
}

fn string_list(field: Option<&Value>, name: &str, expected: usize) -> Result<Vec<String>, GenerationError> {
    let items = field
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::StructuralValidation(format!("{name} must be an array")))?;
    if items.len() != expected {
        return Err(GenerationError::StructuralValidation(format!(
            "expected {expected} {name}, got {}",
            items.len()
        )));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
            Some(_) => Err(GenerationError::StructuralValidation(format!("{name}[{i}] is empty"))),
            None => Err(GenerationError::StructuralValidation(format!("{name}[{i}] is not a string"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_plain_json_directly() {
        let v = parse_generated_json(r#"{"url":"x"}"#).unwrap();
        assert_eq!(v, json!({"url":"x"}));
    }

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"headlines\":[\"a\"]}\n```";
        assert_eq!(parse_generated_json(text).unwrap(), json!({"headlines":["a"]}));
        let bare_fence = "  ```\n{\"a\":1}\n```  ";
        assert_eq!(parse_generated_json(bare_fence).unwrap(), json!({"a":1}));
    }

    #[test]
    fn prose_is_a_parse_error() {
        let err = parse_generated_json("Here is your ad: Bright Smile Dental!").unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
        let err = parse_generated_json("```json\n{\"headlines\": [\n```").unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn strip_code_fences_leaves_unfenced_text() {
        assert_eq!(strip_code_fences("  {\"a\":1} \n"), "{\"a\":1}");
    }

    #[test]
    fn accepts_canonical_shape() {
        let v = json!({
            "headlines": ["One", "Two", "Three"],
            "descriptions": ["Desc"],
            "url": " brightsmile.com "
        });
        let draft = validate_structure(&v, &AdRules::default()).unwrap();
        assert_eq!(draft.headlines, vec!["One", "Two", "Three"]);
        assert_eq!(draft.descriptions, vec!["Desc"]);
        assert_eq!(draft.url.as_deref(), Some("brightsmile.com"));
    }

    #[test]
    fn missing_or_blank_url_is_absent() {
        for url in [json!(null), json!(""), json!("   ")] {
            let v = json!({"headlines": ["a", "b", "c"], "descriptions": ["d"], "url": url});
            assert_eq!(validate_structure(&v, &AdRules::default()).unwrap().url, None);
        }
        let v = json!({"headlines": ["a", "b", "c"], "descriptions": ["d"]});
        assert_eq!(validate_structure(&v, &AdRules::default()).unwrap().url, None);
    }

    #[test]
    fn rejects_wrong_counts() {
        let two = json!({"headlines": ["a", "b"], "descriptions": ["d"]});
        assert!(matches!(validate_structure(&two, &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
        let no_desc = json!({"headlines": ["a", "b", "c"], "descriptions": []});
        assert!(matches!(validate_structure(&no_desc, &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
    }

    #[test]
    fn rejects_legacy_single_title_shape() {
        let v = json!({"title": "Bright Smile", "description": "Great care", "url": "x"});
        assert!(matches!(validate_structure(&v, &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
    }

    #[test]
    fn rejects_non_string_or_blank_items() {
        let v = json!({"headlines": ["a", 2, "c"], "descriptions": ["d"]});
        assert!(matches!(validate_structure(&v, &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
        let v = json!({"headlines": ["a", " ", "c"], "descriptions": ["d"]});
        assert!(matches!(validate_structure(&v, &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
        let v = json!({"headlines": ["a", "b", "c"], "descriptions": ["d"], "url": 7});
        assert!(matches!(validate_structure(&v, &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
    }

    #[test]
    fn rejects_non_object_root() {
        assert!(matches!(validate_structure(&json!([1, 2]), &AdRules::default()), Err(GenerationError::StructuralValidation(_))));
    }
}
