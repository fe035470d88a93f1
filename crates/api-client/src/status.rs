//! Response status descriptors shared by single and bulk responses
//!
//! The remote service reports the outcome of every call in a `status` object.
//! Bulk responses repeat the same object once for the whole batch and once per
//! item, the latter with the echoed `requestName` / `requestID` added.

use serde::{Deserialize, Deserializer, Serialize};

/// `responseStatus` value signalling success
pub const RESPONSE_STATUS_OK: &str = "ok";

/// Outcome of a request as reported by the remote service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    /// Remote error code, `0` on success
    #[serde(rename = "errorCode", with = "lenient_i64")]
    pub error_code: i64,
    /// Echoed operation name
    #[serde(deserialize_with = "null_as_default")]
    pub request: String,
    /// `"ok"` or `"error"`
    #[serde(rename = "responseStatus", deserialize_with = "null_as_default")]
    pub response_status: String,
    /// Server time the request was received
    #[serde(rename = "requestUnixTime", skip_serializing_if = "Option::is_none")]
    pub request_unix_time: Option<i64>,
    /// Seconds spent producing the response
    #[serde(rename = "generationTime", skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,
    /// Total number of records matching the filters
    #[serde(rename = "recordsTotal", skip_serializing_if = "Option::is_none")]
    pub records_total: Option<i64>,
    /// Number of records in this response
    #[serde(rename = "recordsInResponse", skip_serializing_if = "Option::is_none")]
    pub records_in_response: Option<i64>,
    /// Input field the error relates to, if any
    #[serde(rename = "errorField", skip_serializing_if = "Option::is_none")]
    pub error_field: Option<String>,
}

impl Status {
    /// Successful status for `request`
    pub fn ok(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            response_status: RESPONSE_STATUS_OK.to_string(),
            ..Self::default()
        }
    }

    /// Failed status for `request`
    pub fn error(request: impl Into<String>, error_code: i64) -> Self {
        Self {
            error_code,
            request: request.into(),
            response_status: "error".to_string(),
            ..Self::default()
        }
    }

    /// Whether the remote service reported success
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.response_status == RESPONSE_STATUS_OK
    }

    /// Human readable failure description
    #[must_use]
    pub fn message(&self) -> String {
        match &self.error_field {
            Some(field) if !field.is_empty() => {
                format!("{} (field: {field})", self.response_status)
            }
            _ => self.response_status.clone(),
        }
    }
}

/// Per-item status inside a bulk response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkItemStatus {
    /// Method name the item was submitted with
    #[serde(rename = "requestName", deserialize_with = "null_as_default")]
    pub request_name: String,
    /// Correlation id the item was submitted with
    #[serde(rename = "requestID", with = "lenient_string")]
    pub request_id: String,
    /// Shared status fields
    #[serde(flatten)]
    pub status: Status,
}

impl BulkItemStatus {
    /// Whether the item succeeded
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Name of the operation this item ran, preferring the echoed request name
    #[must_use]
    pub fn request(&self) -> &str {
        if self.request_name.is_empty() {
            &self.status.request
        } else {
            &self.request_name
        }
    }
}

/// Single-request response envelope: `{status, records}`
///
/// `records` is kept undecoded until the status has been checked, since
/// failed calls often carry a payload of a different shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Outcome of the call
    pub status: Status,
    /// Operation-specific payload
    #[serde(default)]
    pub records: serde_json::Value,
}

/// Go-style decoding: `null` reads as the zero value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `errorCode` arrives as a number, but some endpoints quote it
mod lenient_i64 {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        struct CodeVisitor;

        impl Visitor<'_> for CodeVisitor {
            type Value = i64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
                i64::try_from(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
                if v.is_empty() {
                    return Ok(0);
                }
                v.trim().parse().map_err(E::custom)
            }

            fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
                Ok(0)
            }
        }

        deserializer.deserialize_any(CodeVisitor)
    }
}

/// `requestID` echoes whatever was sent, number or string
mod lenient_string {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = String;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or a number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_unit<E: de::Error>(self) -> Result<String, E> {
                Ok(String::new())
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
