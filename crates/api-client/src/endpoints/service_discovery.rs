//! Service discovery endpoint
//!
//! `getServiceEndpoints` returns the base URLs of the account's other
//! services (PIM, WMS, reports and so on).

use crate::client::ErplyClient;
use crate::error::ApiResult;
use crate::params::Params;
use serde::{Deserialize, Serialize};

/// Service discovery API interface
#[derive(Clone)]
pub struct ServiceDiscoveryApi {
    client: ErplyClient,
}

impl ServiceDiscoveryApi {
    /// Create a new service discovery API interface
    pub(crate) fn new(client: ErplyClient) -> Self {
        Self { client }
    }

    /// Fetch service endpoints for the account
    pub async fn get_service_endpoints(&self) -> ApiResult<Option<ServiceEndpoints>> {
        let records: Option<Vec<ServiceEndpoints>> =
            self.client.call("getServiceEndpoints", &Params::new()).await?;
        Ok(records.and_then(|r| r.into_iter().next()))
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Base URLs of the account's services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub cafa: Endpoint,
    pub pim: Endpoint,
    pub wms: Endpoint,
    pub promotion: Endpoint,
    pub reports: Endpoint,
    pub json: Endpoint,
    pub assignments: Endpoint,
}

impl ServiceEndpoints {
    /// Endpoints paired with their service names, in a fixed order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &Endpoint); 7] {
        [
            ("cafa", &self.cafa),
            ("pim", &self.pim),
            ("wms", &self.wms),
            ("promotion", &self.promotion),
            ("reports", &self.reports),
            ("json", &self.json),
            ("assignments", &self.assignments),
        ]
    }
}

/// One service's base URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub url: String,
    pub documentation: String,
}
