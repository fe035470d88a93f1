//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one group of API methods.
//!
//! | Module | API methods |
//! |--------|-------------|
//! | `suppliers` | `getSuppliers`, `saveSupplier`, `deleteSupplier` |
//! | `prices` | `getSupplierPriceLists`, `saveSupplierPriceList`, `getProductsInSupplierPriceList`, `addProductToSupplierPriceList`, `editProductInSupplierPriceList`, `deleteProductsFromSupplierPriceList` |
//! | `auth` | `verifyUser`, `switchUser`, `getSessionKeyUser`, `getSessionKeyInfo`, `getIdentityToken`, `getJWTToken`, `verifyIdentityToken` |
//! | `service_discovery` | `getServiceEndpoints` |

pub mod auth;
pub mod prices;
pub mod service_discovery;
pub mod suppliers;

pub use auth::AuthApi;
pub use prices::PricesApi;
pub use service_discovery::ServiceDiscoveryApi;
pub use suppliers::SuppliersApi;

use crate::params::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Custom attribute attached to a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    /// Attribute name
    #[serde(rename = "attributeName")]
    pub name: String,
    /// `text`, `int`, `double` or `date`
    #[serde(rename = "attributeType")]
    pub kind: String,
    /// Attribute value as sent by the API
    #[serde(rename = "attributeValue")]
    pub value: Value,
}

impl Attribute {
    /// Create an attribute
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Write attributes as numbered `attributeName{n}` / `attributeType{n}` /
/// `attributeValue{n}` parameters, starting at 1
pub(crate) fn insert_attributes(params: &mut Params, attributes: &[Attribute]) {
    for (i, attribute) in attributes.iter().enumerate() {
        let n = i + 1;
        params.insert(format!("attributeName{n}"), attribute.name.clone());
        params.insert(format!("attributeType{n}"), attribute.kind.clone());
        params.insert(format!("attributeValue{n}"), attribute.value.clone());
    }
}
