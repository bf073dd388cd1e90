//! Result envelope returned by content handlers.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output of a content handler.
///
/// The routing core only looks at `type` and the optional `error` field; the
/// remaining fields are handler-specific and carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Discriminator naming the kind of content produced
    #[serde(rename = "type")]
    pub content_type: String,

    /// Handler-specific payload fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResultEnvelope {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            fields: Map::new(),
        }
    }

    /// Build an envelope from a typed content struct.
    ///
    /// Objects are flattened into the envelope; any other JSON value is
    /// stored under `content`.
    pub fn from_content<T: Serialize>(content_type: impl Into<String>, content: &T) -> Result<Self> {
        let mut envelope = Self::new(content_type);
        match serde_json::to_value(content)? {
            Value::Object(mut map) => {
                map.remove("type");
                envelope.fields = map;
            }
            other => {
                envelope.fields.insert("content".into(), other);
            }
        }
        Ok(envelope)
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `error` field, when the handler reported one as data.
    ///
    /// Any non-null value counts; non-string values are rendered as JSON.
    pub fn error(&self) -> Option<String> {
        match self.fields.get("error")? {
            Value::Null => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert("type".into(), Value::String(self.content_type.clone()));
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Post {
        content: String,
        hashtags: Vec<String>,
    }

    #[test]
    fn from_content_flattens_struct_fields() {
        let post = Post {
            content: "Hello".into(),
            hashtags: vec!["#rust".into()],
        };
        let envelope = ResultEnvelope::from_content("social_post", &post).unwrap();

        assert_eq!(envelope.content_type, "social_post");
        assert_eq!(envelope.get("content"), Some(&json!("Hello")));
        assert_eq!(envelope.get("hashtags"), Some(&json!(["#rust"])));
        assert!(envelope.error().is_none());
    }

    #[test]
    fn from_content_wraps_non_objects() {
        let envelope = ResultEnvelope::from_content("research", &"plain text").unwrap();
        assert_eq!(envelope.get("content"), Some(&json!("plain text")));
    }

    #[test]
    fn serializes_type_alongside_fields() {
        let envelope = ResultEnvelope::new("article").with_field("word_count", 1200);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["type"], "article");
        assert_eq!(json["word_count"], 1200);
        assert_eq!(json, envelope.to_value());
    }

    #[test]
    fn deserializes_and_exposes_error_field() {
        let envelope: ResultEnvelope =
            serde_json::from_value(json!({"type": "image", "error": "quota exceeded"})).unwrap();
        assert_eq!(envelope.content_type, "image");
        assert_eq!(envelope.error().as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn structured_error_is_rendered_as_json() {
        let envelope =
            ResultEnvelope::new("research").with_field("error", json!({"message": "quota exhausted"}));
        assert_eq!(
            envelope.error().as_deref(),
            Some(r#"{"message":"quota exhausted"}"#)
        );

        let envelope = ResultEnvelope::new("research").with_field("error", Value::Null);
        assert!(envelope.error().is_none());
    }
}
