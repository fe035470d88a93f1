//! Request parameters
//!
//! [`Params`] is the ordered name → value map sent with every request. Typed
//! filter objects in [`crate::endpoints`] render themselves into it; callers can
//! also fill it directly for parameters the typed objects don't expose.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameter map for a single remote operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Create an empty parameter map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Insert a parameter only when a value is present
    pub fn insert_opt<V: Into<Value>>(&mut self, name: &str, value: Option<V>) {
        if let Some(v) = value {
            self.insert(name, v);
        }
    }

    /// Insert a boolean flag the way the remote service expects it (`1` / `0`)
    pub fn insert_flag(&mut self, name: &str, value: Option<bool>) {
        if let Some(v) = value {
            self.insert(name, i64::from(v));
        }
    }

    /// Insert a comma separated id list, skipping empty lists
    pub fn insert_ids(&mut self, name: &str, ids: &[i64]) {
        if !ids.is_empty() {
            let joined = ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.insert(name, joined);
        }
    }

    /// Look up a parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether a parameter is present, regardless of its value
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over parameters in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Render as form fields for a single request
    ///
    /// Strings are sent verbatim, booleans as `1` / `0`, nulls as empty
    /// strings and structured values as JSON text.
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), form_value(v)))
            .collect()
    }

    /// Consume into a JSON object for a bulk request entry
    #[must_use]
    pub fn into_json_object(self) -> serde_json::Map<String, Value> {
        self.0.into_iter().collect()
    }
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        structured @ (Value::Array(_) | Value::Object(_)) => structured.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_rendering() {
        let params = Params::new()
            .with("searchName", "Acme")
            .with("recordsOnPage", 100)
            .with("active", true)
            .with("attributes", json!([{"attributeName": "x"}]));

        let form = params.to_form();
        assert!(form.contains(&("searchName".into(), "Acme".into())));
        assert!(form.contains(&("recordsOnPage".into(), "100".into())));
        assert!(form.contains(&("active".into(), "1".into())));
        assert!(form.contains(&("attributes".into(), r#"[{"attributeName":"x"}]"#.into())));
    }

    #[test]
    fn test_insert_helpers() {
        let mut params = Params::new();
        params.insert_opt::<i64>("supplierID", None);
        params.insert_flag("getAddresses", Some(false));
        params.insert_ids("supplierIDs", &[1, 2, 3]);
        params.insert_ids("groupIDs", &[]);

        assert!(!params.contains("supplierID"));
        assert_eq!(params.get("getAddresses"), Some(&json!(0)));
        assert_eq!(params.get("supplierIDs"), Some(&json!("1,2,3")));
        assert!(!params.contains("groupIDs"));
    }
}
