//! Article and skin records as delivered by the backend.
//!
//! The backend is loose about shapes: ids arrive as numbers or strings, text
//! columns may be `null`, and `tags` may be an array or a JSON-encoded string
//! of one. Everything is normalized on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A visual skin for rendering articles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Skin {
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Template resource, absolute or relative to the configured template root.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub template_path: String,
}

/// An article as stored by the backend. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Article {
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default)]
    pub subtitle: Option<String>,

    /// Pre-rendered, backend-sanitized HTML. Never escaped again.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content_html: String,

    #[serde(default)]
    pub publication_datetime: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub author_description: Option<String>,

    /// Ordered; index 0 is the primary tag.
    #[serde(default, deserialize_with = "flexible_tags")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "optional_id_string")]
    pub skin_id: Option<String>,
}

impl Article {
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Every tag after the primary one.
    pub fn secondary_tags(&self) -> &[String] {
        self.tags.get(1..).unwrap_or(&[])
    }
}

fn value_to_id(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    value_to_id(Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("id must be a string or number"))
}

fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_id(Value::deserialize(deserializer)?))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn flexible_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::String(encoded) => serde_json::from_str(&encoded).unwrap_or(Value::Null),
        other => other,
    };

    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(value_to_id).collect(),
        _ => Vec::new(),
    })
}
