//! Typed client for the Erply API
//!
//! Requests are form-encoded POSTs to `https://{clientCode}.erply.com/api/`.
//! Besides single calls, the API accepts bulk calls carrying many named
//! operations at once; this crate builds those batches and reconciles the
//! combined response back to one result per submitted operation.
//!
//! # Features
//!
//! - **Bulk batching**: ordered batches with an enforced size ceiling
//! - **Result reconciliation**: batch status first, then item statuses in order
//! - **Typed records**: suppliers, supplier price lists, sessions, service endpoints
//! - **Retry with exponential backoff**: for transport-level failures
//! - **Pluggable transport**: swap the HTTP layer for tests or proxies
//!
//! # Example
//!
//! ```rust,no_run
//! use erply_api_client::prelude::*;
//! use erply_api_client::endpoints::suppliers::SupplierFilter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ErplyClient::new()?;
//!
//!     let filters = [
//!         SupplierFilter::new().with_search("Acme"),
//!         SupplierFilter::new().with_id(12),
//!     ];
//!     let envelope = client.suppliers().get_suppliers_bulk(&filters, &Params::new()).await?;
//!     envelope.check()?;
//!
//!     for (i, item) in envelope.items.iter().enumerate() {
//!         println!("query {i}: {} suppliers", item.records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bulk;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod params;
pub mod retry;
pub mod status;
pub mod transport;

pub use bulk::{BatchEnvelope, BatchItemResult, Change, NamedRequest, Operation, MAX_BULK_REQUESTS};
pub use client::ErplyClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use params::Params;
pub use retry::RetryConfig;
pub use transport::{HttpTransport, Transport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bulk::{BatchEnvelope, Change, NamedRequest, Operation};
    pub use crate::client::ErplyClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{AuthApi, PricesApi, ServiceDiscoveryApi, SuppliersApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::params::Params;
    pub use crate::transport::Transport;
}
