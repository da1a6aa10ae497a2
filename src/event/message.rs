//! The `msg` field of a task result

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

/// A task message, normalized from whatever JSON the engine sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum Message {
    #[default]
    Empty,
    Text(String),
    Lines(Vec<String>),
}

impl Message {
    pub fn is_empty(&self) -> bool {
        match self {
            Message::Empty => true,
            Message::Text(text) => text.is_empty(),
            Message::Lines(lines) => lines.is_empty(),
        }
    }

    /// Single-line rendering, `None` when there is nothing to show
    ///
    /// Lines are joined with `, ` rather than printed as a list literal.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        if self.is_empty() {
            return None;
        }
        match self {
            Message::Empty => None,
            Message::Text(text) => Some(Cow::Borrowed(text)),
            Message::Lines(lines) => Some(Cow::Owned(lines.join(", "))),
        }
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Message::Empty,
            Value::Number(ref n) if n.as_f64() == Some(0.0) => Message::Empty,
            Value::Object(ref map) if map.is_empty() => Message::Empty,
            Value::String(text) if text.is_empty() => Message::Empty,
            Value::String(text) => Message::Text(text),
            Value::Array(items) => Message::Lines(items.into_iter().map(render).collect()),
            other => Message::Text(other.to_string()),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::from(Value::String(text.to_string()))
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::from(Value::String(text))
    }
}

impl From<Vec<&str>> for Message {
    fn from(lines: Vec<&str>) -> Self {
        Message::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

// Non-string values print as JSON (`true`, `{"k":"v"}`), not in the engine's
// native repr (`True`, `{'k': 'v'}`); parsers only key on the line prefixes
fn render(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values_are_empty() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!({})] {
            assert_eq!(Message::from(value), Message::Empty);
        }
    }

    #[test]
    fn test_string_is_text() {
        assert_eq!(Message::from(json!("hello")), Message::Text("hello".to_string()));
    }

    #[test]
    fn test_array_is_lines() {
        assert_eq!(
            Message::from(json!(["a", "", 3])),
            Message::Lines(vec!["a".to_string(), String::new(), "3".to_string()])
        );
    }

    #[test]
    fn test_other_scalars_render_as_json() {
        assert_eq!(Message::from(json!(42)), Message::Text("42".to_string()));
        assert_eq!(Message::from(json!(true)), Message::Text("true".to_string()));
        assert_eq!(
            Message::from(json!({"k": "v"})),
            Message::Text(r#"{"k":"v"}"#.to_string())
        );
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Message::Empty.as_text(), None);
        assert_eq!(Message::Lines(vec![]).as_text(), None);
        assert_eq!(Message::from("x").as_text().as_deref(), Some("x"));
        assert_eq!(Message::from(vec!["a", "b"]).as_text().as_deref(), Some("a, b"));
    }

    #[test]
    fn test_deserialize_missing_is_default() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default)]
            msg: Message,
        }
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(holder.msg, Message::Empty);
    }
}
