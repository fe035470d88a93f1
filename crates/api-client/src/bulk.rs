//! Bulk requests
//!
//! A bulk request carries many named operations in one HTTP call. This module
//! packs operations into [`NamedRequest`]s (enforcing the batch ceiling before
//! anything is sent) and reconciles the response: the batch status is checked
//! first, then every item status in response order. The first failure wins.

use crate::error::{ApiError, ApiResult};
use crate::params::Params;
use crate::status::{BulkItemStatus, Status};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Maximum number of operations the remote service accepts in one bulk call
pub const MAX_BULK_REQUESTS: usize = 100;

/// Something that can be sent as one remote operation
pub trait Operation {
    /// Remote method name, e.g. `getSuppliers`
    fn method(&self) -> &str;

    /// Parameters for this operation
    fn params(&self) -> Params;
}

/// One operation destined for a bulk request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRequest {
    method: String,
    params: Params,
}

impl NamedRequest {
    /// Create a named request
    pub fn new(method: impl Into<String>, params: Params) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Remote method name
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Operation parameters
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Render as an entry of the `requests` array
    ///
    /// `requestName` and `requestID` are written last so they cannot be
    /// shadowed by parameters of the same name.
    #[must_use]
    pub fn to_wire(&self, index: usize) -> Value {
        let mut object = self.params.clone().into_json_object();
        object.insert("requestName".to_string(), Value::from(self.method.as_str()));
        object.insert("requestID".to_string(), Value::from(index));
        Value::Object(object)
    }
}

impl Operation for NamedRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn params(&self) -> Params {
        self.params.clone()
    }
}

/// Render a batch as the JSON array sent in the `requests` field
#[must_use]
pub fn wire_requests(requests: &[NamedRequest]) -> Value {
    Value::Array(
        requests
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_wire(i))
            .collect(),
    )
}

/// Pack operations into a batch, in order
///
/// Fails with [`ApiError::BatchSizeExceeded`] when `items` is longer than
/// `limit`; no partial batch is produced.
pub fn compose_batch<O: Operation>(items: &[O], limit: usize) -> ApiResult<Vec<NamedRequest>> {
    check_batch_size(items.len(), limit)?;

    Ok(items
        .iter()
        .map(|item| NamedRequest::new(item.method(), item.params()))
        .collect())
}

/// Pack parameter maps that all run the same method
pub fn compose_uniform(
    method: &str,
    items: Vec<Params>,
    limit: usize,
) -> ApiResult<Vec<NamedRequest>> {
    check_batch_size(items.len(), limit)?;

    Ok(items
        .into_iter()
        .map(|params| NamedRequest::new(method, params))
        .collect())
}

fn check_batch_size(actual: usize, limit: usize) -> ApiResult<()> {
    if actual > limit {
        warn!(limit, actual, "Bulk request rejected before sending");
        return Err(ApiError::BatchSizeExceeded { limit, actual });
    }
    Ok(())
}

// ============================================================================
// Create / update dispatch
// ============================================================================

/// Remote method pair for an operation with create-vs-update semantics
pub trait ChangeMethods {
    /// Method used for [`Change::Create`]
    const CREATE_METHOD: &'static str;
    /// Method used for [`Change::Update`]
    const UPDATE_METHOD: &'static str;

    /// Parameters shared by both methods
    fn change_params(&self) -> Params;
}

/// Whether an item creates a new record or updates an existing one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change<T> {
    /// Send with the create method
    Create(T),
    /// Send with the update method
    Update(T),
}

impl<T> Change<T> {
    /// Payload regardless of the tag
    pub fn inner(&self) -> &T {
        match self {
            Self::Create(v) | Self::Update(v) => v,
        }
    }

    /// Whether this is an update
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }
}

impl<T: ChangeMethods> Change<T> {
    /// Tag an item by whether its parameters contain `key`
    ///
    /// Only presence matters; the value, even an empty one, is not looked at.
    pub fn from_key_presence(item: T, key: &str) -> Self {
        if item.change_params().contains(key) {
            Self::Update(item)
        } else {
            Self::Create(item)
        }
    }
}

impl<T: ChangeMethods> Operation for Change<T> {
    fn method(&self) -> &str {
        match self {
            Self::Create(_) => T::CREATE_METHOD,
            Self::Update(_) => T::UPDATE_METHOD,
        }
    }

    fn params(&self) -> Params {
        self.inner().change_params()
    }
}

// ============================================================================
// Response reconciliation
// ============================================================================

/// Decoded bulk response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct BatchEnvelope<T> {
    /// Batch-level status
    pub status: Status,
    /// Item results in submission order
    #[serde(rename = "requests", default = "Vec::new", deserialize_with = "null_as_empty")]
    pub items: Vec<BatchItemResult<T>>,
}

/// One item of a bulk response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct BatchItemResult<T> {
    /// Item-level status
    pub status: BulkItemStatus,
    /// Item payload
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub records: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> BatchEnvelope<T> {
    /// Number of item results
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the response carried no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records of the item at `index`
    #[must_use]
    pub fn records(&self, index: usize) -> Option<&[T]> {
        self.items.get(index).map(|item| item.records.as_slice())
    }

    /// Records of every item, positionally matching the submitted operations
    #[must_use]
    pub fn into_records(self) -> Vec<Vec<T>> {
        self.items.into_iter().map(|item| item.records).collect()
    }

    /// All records concatenated in item order
    #[must_use]
    pub fn into_flat_records(self) -> Vec<T> {
        self.items.into_iter().flat_map(|item| item.records).collect()
    }

    /// Validate the batch status, then each item status in order
    ///
    /// A failed batch status is reported even when items are present, and
    /// items are not looked at in that case. Otherwise the earliest failing
    /// item is reported and later items are not inspected.
    pub fn check(&self) -> ApiResult<()> {
        check_statuses(&self.status, self.items.iter().map(|item| &item.status))
    }
}

fn check_statuses<'a>(
    batch: &Status,
    items: impl IntoIterator<Item = &'a BulkItemStatus>,
) -> ApiResult<()> {
    if !batch.is_ok() {
        warn!(
            request = %batch.request,
            error_code = batch.error_code,
            "Bulk request failed"
        );
        return Err(ApiError::Status {
            code: batch.error_code,
            request: batch.request.clone(),
            message: batch.message(),
        });
    }

    if let Some((index, item)) = items
        .into_iter()
        .enumerate()
        .find(|(_, item)| !item.is_ok())
    {
        warn!(
            index,
            request = %item.request(),
            error_code = item.status.error_code,
            "Bulk item failed"
        );
        return Err(ApiError::ItemStatus {
            index,
            code: item.status.error_code,
            request: item.request().to_string(),
            message: item.status.message(),
        });
    }

    Ok(())
}

/// Bulk response with item payloads left undecoded
#[derive(Deserialize)]
struct RawEnvelope {
    status: Status,
    #[serde(rename = "requests", default, deserialize_with = "null_as_empty")]
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    status: BulkItemStatus,
    #[serde(default)]
    records: Value,
}

/// Decode and validate a raw bulk response body
///
/// Statuses are checked before any item payload is decoded into `T`, so a
/// failed batch or item is reported as such even when its `records` carry
/// an error payload of another shape.
pub fn reconcile<T: DeserializeOwned>(body: &[u8]) -> ApiResult<BatchEnvelope<T>> {
    let target = std::any::type_name::<BatchEnvelope<T>>();

    let raw: RawEnvelope =
        serde_json::from_slice(body).map_err(|e| ApiError::decode(target, e, body))?;

    check_statuses(&raw.status, raw.items.iter().map(|item| &item.status))?;

    let items = raw
        .items
        .into_iter()
        .map(|item| -> ApiResult<BatchItemResult<T>> {
            let records = match item.records {
                Value::Null => Vec::new(),
                records => serde_json::from_value(records)
                    .map_err(|e| ApiError::decode(target, e, body))?,
            };
            Ok(BatchItemResult {
                status: item.status,
                records,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    debug!(items = items.len(), "Bulk response reconciled");
    Ok(BatchEnvelope {
        status: raw.status,
        items,
    })
}
