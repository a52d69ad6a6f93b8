//! Row identity and field access
//!
//! The engine never looks inside a row except through [`TableRow`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

/// A record the table engine can search and select
pub trait TableRow {
    /// Stable identity, used for selection
    type Id: Clone + Eq + Ord + Hash + Debug;

    /// Identity of this row
    fn row_id(&self) -> Self::Id;

    /// Text form of the named field, `None` if the row has no such field
    fn field_text(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// A JSON object row with an explicit identity
///
/// Used for rows that arrive straight from the backend without a typed DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    id: String,
    value: Value,
}

impl JsonRecord {
    /// Create record with explicit id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, value: Value) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    /// Create record taking its id from `id_key`
    ///
    /// Rows without a usable id fall back to `#<position>`.
    #[must_use]
    pub fn from_value(value: Value, id_key: &str, position: usize) -> Self {
        let id = value
            .get(id_key)
            .and_then(value_text)
            .map_or_else(|| format!("#{position}"), Cow::into_owned);
        Self { id, value }
    }

    /// Convert a JSON array of objects into records
    #[must_use]
    pub fn collect(values: Vec<Value>, id_key: &str) -> Vec<Self> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Self::from_value(v, id_key, i))
            .collect()
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Underlying JSON value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Field lookup
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }
}

impl TableRow for JsonRecord {
    type Id = String;

    fn row_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn field_text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.value.get(key).and_then(value_text)
    }
}

/// Scalar JSON value as text; containers and null have none
fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_uses_id_key() {
        let record = JsonRecord::from_value(json!({"id": 42, "code": "OP-1"}), "id", 0);
        assert_eq!(record.id(), "42");
        assert_eq!(record.field_text("code").as_deref(), Some("OP-1"));
    }

    #[test]
    fn from_value_falls_back_to_position() {
        let record = JsonRecord::from_value(json!({"code": "OP-1"}), "id", 7);
        assert_eq!(record.id(), "#7");
    }

    #[test]
    fn containers_have_no_text() {
        let record = JsonRecord::new("a", json!({"tags": ["x"], "note": null, "ok": true}));
        assert!(record.field_text("tags").is_none());
        assert!(record.field_text("note").is_none());
        assert_eq!(record.field_text("ok").as_deref(), Some("true"));
        assert!(record.field_text("missing").is_none());
    }

    #[test]
    fn collect_keeps_order() {
        let records = JsonRecord::collect(vec![json!({"id": "b"}), json!({"id": "a"})], "id");
        let ids: Vec<_> = records.iter().map(JsonRecord::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
