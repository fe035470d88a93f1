//! Main API client implementation

use crate::bulk::{compose_batch, reconcile, BatchEnvelope, Operation};
use crate::config::ClientConfig;
use crate::endpoints::{AuthApi, PricesApi, ServiceDiscoveryApi, SuppliersApi};
use crate::error::{ApiError, ApiResult};
use crate::params::Params;
use crate::status::Response;
use crate::transport::{HttpTransport, Transport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Erply API client
///
/// Cheap to clone; clones share the configuration and the transport. The
/// client keeps no per-call state, so it can be used from many tasks at once.
#[derive(Clone)]
pub struct ErplyClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl ErplyClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration and the HTTP transport
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Maximum number of operations per bulk request
    #[must_use]
    pub fn max_bulk_requests(&self) -> usize {
        self.config.max_bulk_requests
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access supplier endpoints
    #[must_use]
    pub fn suppliers(&self) -> SuppliersApi {
        SuppliersApi::new(self.clone())
    }

    /// Access supplier price list endpoints
    #[must_use]
    pub fn prices(&self) -> PricesApi {
        PricesApi::new(self.clone())
    }

    /// Access authentication and session endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access service discovery endpoints
    #[must_use]
    pub fn service_discovery(&self) -> ServiceDiscoveryApi {
        ServiceDiscoveryApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    /// Send one operation and return its `records` payload
    ///
    /// Fails when the response does not decode or its status is not `ok`.
    #[instrument(skip(self, params))]
    pub async fn call<R: DeserializeOwned>(&self, method: &str, params: &Params) -> ApiResult<R> {
        let body = self.transport.send_request(method, params).await?;

        let response: Response = serde_json::from_slice(&body)
            .map_err(|e| ApiError::decode("Response", e, &body))?;

        if !response.status.is_ok() {
            warn!(
                request = %response.status.request,
                error_code = response.status.error_code,
                "Request failed"
            );
            return Err(ApiError::Status {
                code: response.status.error_code,
                request: response.status.request.clone(),
                message: response.status.message(),
            });
        }

        serde_json::from_value(response.records)
            .map_err(|e| ApiError::decode(std::any::type_name::<R>(), e, &body))
    }

    /// Send a typed operation and return all records
    pub async fn call_list<T: DeserializeOwned>(
        &self,
        op: &(impl Operation + Sync),
    ) -> ApiResult<Vec<T>> {
        let records: Option<Vec<T>> = self.call(op.method(), &op.params()).await?;
        Ok(records.unwrap_or_default())
    }

    /// Send a typed operation and return the first record, if any
    ///
    /// Zero records is a valid outcome and yields `None`.
    pub async fn call_first<T: DeserializeOwned>(
        &self,
        op: &(impl Operation + Sync),
    ) -> ApiResult<Option<T>> {
        Ok(self.call_list(op).await?.into_iter().next())
    }

    /// Send typed operations as one bulk request
    ///
    /// The batch ceiling is checked before anything is sent. On success the
    /// envelope holds one item per operation, in the order given.
    #[instrument(skip(self, items, shared), fields(items = items.len()))]
    pub async fn call_bulk<O, T>(
        &self,
        items: &[O],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<T>>
    where
        O: Operation + Sync,
        T: DeserializeOwned,
    {
        let requests = compose_batch(items, self.config.max_bulk_requests)?;
        let body = self.transport.send_request_bulk(&requests, shared).await?;
        let envelope = reconcile(&body)?;

        if envelope.len() != requests.len() {
            debug!(
                sent = requests.len(),
                received = envelope.len(),
                "Bulk response item count differs from request count"
            );
        }

        Ok(envelope)
    }
}
