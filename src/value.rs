use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// A parsed JSON document.
///
/// The tree is built bottom-up by the parser and exclusively owns its
/// children; dropping the root recursively drops everything below it.
/// Object key order is not preserved, and duplicate keys resolve to the
/// last occurrence in the input.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(HashMap<String, JsonValue>),
}

static NULL: JsonValue = JsonValue::Null;

impl JsonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, JsonValue::Boolean(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, JsonValue>> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Array element by position, `None` on type mismatch or out of range.
    pub fn get(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Object member by key, `None` on type mismatch or missing key.
    pub fn get_key(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Boolean(b) => write!(f, "{b}"),
            JsonValue::Number(n) => write!(f, "{n}"),
            JsonValue::String(s) => write!(f, "{s:?}"),
            JsonValue::Array(items) => write!(f, "[array of {}]", items.len()),
            JsonValue::Object(map) => write!(f, "[object of {}]", map.len()),
        }
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Boolean(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(f64::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}

impl From<HashMap<String, JsonValue>> for JsonValue {
    fn from(map: HashMap<String, JsonValue>) -> Self {
        JsonValue::Object(map)
    }
}

impl Index<usize> for JsonValue {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &JsonValue {
        self.get(index).unwrap_or(&NULL)
    }
}

impl Index<&str> for JsonValue {
    type Output = JsonValue;

    fn index(&self, key: &str) -> &JsonValue {
        self.get_key(key).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        let value = JsonValue::Number(42.0);
        assert!(value.is_number());
        assert_eq!(value.as_number(), Some(42.0));
        assert_eq!(value.as_str(), None);
        assert_eq!(value.as_boolean(), None);
    }

    #[test]
    fn index_missing_yields_null() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), JsonValue::from(1));
        let value = JsonValue::Object(map);
        assert_eq!(value["a"], JsonValue::Number(1.0));
        assert!(value["missing"].is_null());
        assert!(value[7].is_null());
    }

    #[test]
    fn array_indexing() {
        let value = JsonValue::Array(vec![JsonValue::from(false), JsonValue::from("x")]);
        assert_eq!(value[0], JsonValue::Boolean(false));
        assert_eq!(value[1].as_str(), Some("x"));
    }

    #[test]
    fn recursive_drop_of_deep_tree() {
        // A few thousand nested arrays must drop without issue.
        let mut value = JsonValue::Null;
        for _ in 0..4096 {
            value = JsonValue::Array(vec![value]);
        }
        drop(value);
    }
}
