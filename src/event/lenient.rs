//! Per-field deserializers that fall back to a default instead of failing
//!
//! A field of the wrong type only loses that field; the event survives.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::HostStats;

pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

pub fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// stderr is sometimes null or a list of lines; anything non-textual counts as absent
pub fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    })
}

/// Decodes a nested record, using its default when the value is null or malformed
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        log::warn!("Malformed record, using defaults: {}", e);
        T::default()
    }))
}

/// Per-host stats; a malformed host entry becomes all-zero rather than dropping the map
pub fn host_stats<'de, D>(deserializer: D) -> Result<BTreeMap<String, HostStats>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(hosts) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(hosts
        .into_iter()
        .map(|(host, stats)| {
            let stats = HostStats::deserialize(stats).unwrap_or_else(|e| {
                log::warn!("Malformed stats for host {}: {}", host, e);
                HostStats::default()
            });
            (host, stats)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "bool_or_false")]
        flag: bool,
        #[serde(deserialize_with = "count_or_zero")]
        count: u64,
        #[serde(deserialize_with = "string_or_empty")]
        name: String,
        #[serde(deserialize_with = "string_or_none")]
        label: Option<String>,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_nulls_fall_back() {
        let s = sample(r#"{"flag":null,"count":null,"name":null,"label":null}"#);
        assert!(!s.flag);
        assert_eq!(s.count, 0);
        assert!(s.name.is_empty());
        assert_eq!(s.label, None);
    }

    #[test]
    fn test_wrong_types_fall_back() {
        let s = sample(r#"{"flag":"yes","count":[1],"name":42,"label":7}"#);
        assert!(!s.flag);
        assert_eq!(s.count, 0);
        assert_eq!(s.name, "42");
        assert_eq!(s.label, None);
    }

    #[test]
    fn test_valid_values_kept() {
        let s = sample(r#"{"flag":true,"count":5,"name":"Install","label":"k3s"}"#);
        assert!(s.flag);
        assert_eq!(s.count, 5);
        assert_eq!(s.name, "Install");
        assert_eq!(s.label.as_deref(), Some("k3s"));
    }

    #[test]
    fn test_count_from_string_and_float() {
        assert_eq!(sample(r#"{"count":"3"}"#).count, 3);
        assert_eq!(sample(r#"{"count":2.0}"#).count, 2);
        assert_eq!(sample(r#"{"count":-1}"#).count, 0);
    }
}
