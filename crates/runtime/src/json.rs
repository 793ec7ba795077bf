use serde_json::Value as JsonValue;

use crate::{props::PropertyKey, realm::Realm, values::Value};

impl Realm {
    /// Build a value from parsed JSON (what `JSON.parse` produces)
    ///
    /// Objects become plain objects whose properties are all enumerable, in source order
    /// (array indices-like keys excepted, which are always enumerated first).
    pub fn value_from_json(&self, json: JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,

            JsonValue::Bool(bool) => Value::Bool(bool),

            // Every JSON number is a double once parsed
            JsonValue::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),

            JsonValue::String(string) => Value::String(string),

            JsonValue::Array(items) => self.new_array(
                items
                    .into_iter()
                    .map(|item| self.value_from_json(item))
                    .collect::<Vec<_>>(),
            ),

            JsonValue::Object(entries) => self.new_object_from(
                entries
                    .into_iter()
                    .map(|(key, value)| (PropertyKey::from(key), self.value_from_json(value)))
                    .collect::<Vec<_>>(),
            ),
        }
    }

    /// Parse a JSON string into a value
    pub fn parse_json(&self, source: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(source).map(|json| self.value_from_json(json))
    }
}
