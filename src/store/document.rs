//! Document representation shared by the store and the repository.

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// Reserved key carrying the document identifier on the wire
pub const ID_FIELD: &str = "_id";

/// Field name to value mapping supplied by callers
pub type Payload = Map<String, Value>;

/// Document identifier.
///
/// Whether a raw string is well formed is decided by the store's
/// [`IdFormat`](super::IdFormat); this type only carries the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single stored record: an identifier plus opaque fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocumentId,
    fields: Payload,
}

impl Document {
    /// Build a document. A stray `_id` key in `fields` is dropped so the
    /// identifier has exactly one source.
    pub fn new(id: DocumentId, mut fields: Payload) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn fields(&self) -> &Payload {
        &self.fields
    }

    /// Get a single field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == ID_FIELD {
            return None;
        }
        self.fields.get(field)
    }

    /// Overwrite the given fields, keeping every other field as is
    pub fn merge(&mut self, patch: Payload) {
        for (key, value) in patch {
            if key != ID_FIELD {
                self.fields.insert(key, value);
            }
        }
    }

}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_new_drops_stray_id_field() {
        let doc = Document::new(
            DocumentId::new("a1"),
            fields(json!({"_id": "other", "name": "Veggie"})),
        );
        assert_eq!(doc.id().as_str(), "a1");
        assert!(doc.fields().get(ID_FIELD).is_none());
        assert_eq!(doc.get("name").unwrap(), "Veggie");
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut doc = Document::new(
            DocumentId::new("a1"),
            fields(json!({"name": "Veggie", "toppings": ["onion"]})),
        );
        doc.merge(fields(json!({"name": "Veggie Deluxe", "_id": "zz"})));

        assert_eq!(doc.id().as_str(), "a1");
        assert_eq!(doc.get("name").unwrap(), "Veggie Deluxe");
        assert_eq!(doc.get("toppings").unwrap(), &json!(["onion"]));
    }

    #[test]
    fn test_serializes_flat_with_id() {
        let doc = Document::new(DocumentId::new("a1"), fields(json!({"name": "Veggie"})));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json, json!({"_id": "a1", "name": "Veggie"}));
    }
}
