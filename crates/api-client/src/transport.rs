//! Transport layer
//!
//! [`Transport`] is the only seam between the typed API and the network. It
//! returns raw response bodies; decoding and status checks happen above it.
//! [`HttpTransport`] is the production implementation on top of `reqwest`.

use crate::bulk::{wire_requests, NamedRequest};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::params::Params;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Sends requests to the remote service and returns raw response bodies
///
/// Implementations must be safe to share between tasks. Cancellation is
/// dropping the returned future.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a single operation
    async fn send_request(&self, method: &str, params: &Params) -> ApiResult<Vec<u8>>;

    /// Send a batch of operations in one call
    async fn send_request_bulk(
        &self,
        requests: &[NamedRequest],
        shared: &Params,
    ) -> ApiResult<Vec<u8>>;
}

/// HTTP transport posting form-encoded requests to the API endpoint
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
    config: ClientConfig,
    url: String,
}

impl HttpTransport {
    /// Create a transport from configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("erply-api-client/1.0"));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let url = config.endpoint_url();

        Ok(Self { inner, config, url })
    }

    /// URL requests are posted to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Authentication fields sent with every request
    fn auth_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("clientCode".to_string(), self.config.client_code.clone())];
        if let Some(ref key) = self.config.session_key {
            fields.push(("sessionKey".to_string(), key.clone()));
        }
        fields
    }

    /// Post a form with retry on transport failures
    async fn post_form(&self, form: &[(String, String)]) -> ApiResult<Vec<u8>> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let request_id = Uuid::new_v4().to_string();
            let start = Instant::now();
            let result = self.post_once(&request_id, form).await;
            let elapsed = start.elapsed();

            match result {
                Ok(body) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        bytes = body.len(),
                        "Request succeeded"
                    );
                    return Ok(body);
                }
                Err(e) if retry_config.should_retry(attempt + 1, &e) => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single POST without retry
    async fn post_once(&self, request_id: &str, form: &[(String, String)]) -> ApiResult<Vec<u8>> {
        let response = self
            .inner
            .post(&self.url)
            .header(X_REQUEST_ID, request_id)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout)
                } else {
                    ApiError::Request(e)
                }
            })?;

        read_body(response).await
    }
}

/// Return the body of a 2xx response, or the status and body as an error
async fn read_body(response: Response) -> ApiResult<Vec<u8>> {
    let status = response.status();

    if status.is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::api_response(status.as_u16(), message))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, params), fields(params = params.len()))]
    async fn send_request(&self, method: &str, params: &Params) -> ApiResult<Vec<u8>> {
        let mut form = vec![("request".to_string(), method.to_string())];
        form.extend(self.auth_fields());
        form.extend(params.to_form());

        self.post_form(&form).await
    }

    #[instrument(skip(self, requests, shared), fields(requests = requests.len()))]
    async fn send_request_bulk(
        &self,
        requests: &[NamedRequest],
        shared: &Params,
    ) -> ApiResult<Vec<u8>> {
        if requests.len() > self.config.max_bulk_requests {
            return Err(ApiError::BatchSizeExceeded {
                limit: self.config.max_bulk_requests,
                actual: requests.len(),
            });
        }

        let mut form = self.auth_fields();
        form.extend(shared.to_form());
        form.push(("requests".to_string(), wire_requests(requests).to_string()));

        self.post_form(&form).await
    }
}
