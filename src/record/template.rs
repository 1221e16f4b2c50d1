//! Message templates with named `{Property}` holes.
//!
//! # Design Decisions
//! - `{{` and `}}` escape literal braces
//! - Holes naming an unknown property are kept verbatim
//! - A leading `@` or `$` on a hole name is accepted and ignored
//! - Strings render without quotes; everything else renders as JSON

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed property hole starting at byte {0}")]
    Unclosed(usize),

    #[error("empty property hole at byte {0}")]
    Empty(usize),
}

/// Check that every `{` opens a named, closed hole.
pub fn validate(template: &str) -> Result<(), TemplateError> {
    let bytes = template.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'{' if bytes.get(index + 1) == Some(&b'{') => index += 2,
            b'{' => {
                let Some(offset) = template[index + 1..].find('}') else {
                    return Err(TemplateError::Unclosed(index));
                };
                if hole_name(&template[index + 1..index + 1 + offset]).is_empty() {
                    return Err(TemplateError::Empty(index));
                }
                index += offset + 2;
            }
            _ => index += 1,
        }
    }

    Ok(())
}

/// Substitute property values into a template.
pub fn render(template: &str, properties: &[(String, Value)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(['{', '}']) {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            rendered.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('}') {
            rendered.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(end) = tail.find('}') else {
            rendered.push_str(tail);
            return rendered;
        };

        let name = hole_name(&tail[1..end]);
        match properties.iter().find(|(key, _)| key == name) {
            Some((_, value)) => rendered.push_str(&display(value)),
            None => rendered.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    rendered.push_str(rest);
    rendered
}

fn hole_name(hole: &str) -> &str {
    hole.trim_start_matches(['@', '$']).trim()
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn properties() -> Vec<(String, Value)> {
        vec![
            ("Method".to_string(), json!("POST")),
            ("Path".to_string(), json!("/test")),
            ("StatusCode".to_string(), json!(201)),
            ("ElapsedMilliseconds".to_string(), json!(-1)),
            ("RequestKey".to_string(), Value::Null),
        ]
    }

    #[test]
    fn test_render_default_shape() {
        let rendered = render(
            "HTTP {Method} {Path} responded {StatusCode} in {ElapsedMilliseconds} ms",
            &properties(),
        );
        assert_eq!(rendered, "HTTP POST /test responded 201 in -1 ms");
    }

    #[test]
    fn test_unknown_holes_are_kept() {
        assert_eq!(render("{Method} {Missing}", &properties()), "POST {Missing}");
    }

    #[test]
    fn test_escapes_and_null() {
        assert_eq!(render("{{literal}} {RequestKey}", &properties()), "{literal} null");
        assert_eq!(render("{@Method}", &properties()), "POST");
        assert_eq!(render("open {Method", &properties()), "open {Method");
    }

    #[test]
    fn test_validate() {
        assert!(validate("HTTP {Method} {{x}}").is_ok());
        assert_eq!(validate("HTTP {Method"), Err(TemplateError::Unclosed(5)));
        assert_eq!(validate("HTTP { }"), Err(TemplateError::Empty(5)));
    }
}
