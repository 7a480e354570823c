// ── Order-preserving records ──
//
// `serde_json::Map` does not keep source key order without the
// `preserve_order` feature, so rows are decoded through a visitor that
// records each key as it is read.

use std::collections::HashMap;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

/// One JSON object with its key order kept exactly as in the source.
///
/// A repeated key keeps its first position and its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedRecord {
    keys: Vec<String>,
    values: HashMap<String, Value>,
}

impl OrderedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: Value) {
        if !self.values.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.values.insert(key, value);
    }

    /// Keys in source order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value of `key`, treating JSON `null` as absent.
    pub fn get_non_null(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = OrderedRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut record = OrderedRecord::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            record.insert(key, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for OrderedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}
