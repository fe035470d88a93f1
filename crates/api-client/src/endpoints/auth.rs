//! Authentication and session endpoints

use crate::client::ErplyClient;
use crate::error::ApiResult;
use crate::params::Params;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Authentication API interface
#[derive(Clone)]
pub struct AuthApi {
    client: ErplyClient,
}

impl AuthApi {
    /// Create a new authentication API interface
    pub(crate) fn new(client: ErplyClient) -> Self {
        Self { client }
    }

    /// Log in with a username and password
    ///
    /// `session_length` is the requested session lifetime in seconds.
    #[instrument(skip(self, password))]
    pub async fn verify_user(
        &self,
        username: &str,
        password: &str,
        session_length: u32,
    ) -> ApiResult<Option<SessionKeyUser>> {
        let params = Params::new()
            .with("username", username)
            .with("password", password)
            .with("sessionLength", session_length);
        self.first("verifyUser", &params).await
    }

    /// Switch the logged-in user by PIN
    #[instrument(skip(self, pin))]
    pub async fn switch_user(&self, pin: &str) -> ApiResult<Option<SessionKeyUser>> {
        let params = Params::new().with("pin", pin);
        self.first("switchUser", &params).await
    }

    /// User the current session key belongs to
    pub async fn get_session_key_user(&self) -> ApiResult<Option<SessionKeyUser>> {
        self.first("getSessionKeyUser", &Params::new()).await
    }

    /// Creation and expiry time of the current session key
    pub async fn get_session_key_info(&self) -> ApiResult<Option<SessionKeyInfo>> {
        self.first("getSessionKeyInfo", &Params::new()).await
    }

    /// Identity token for the current session
    pub async fn get_identity_token(&self) -> ApiResult<IdentityToken> {
        self.client.call("getIdentityToken", &Params::new()).await
    }

    /// JWT for the current session
    pub async fn get_jwt_token(&self) -> ApiResult<JwtToken> {
        self.client.call("getJWTToken", &Params::new()).await
    }

    /// Exchange an identity token for a session key
    #[instrument(skip(self, jwt))]
    pub async fn verify_identity_token(&self, jwt: &str) -> ApiResult<SessionInfo> {
        let params = Params::new().with("jwt", jwt);
        self.client.call("verifyIdentityToken", &params).await
    }

    async fn first<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &Params,
    ) -> ApiResult<Option<T>> {
        let records: Option<Vec<T>> = self.client.call(method, params).await?;
        Ok(records.and_then(|r| r.into_iter().next()))
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Logged-in user and session details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionKeyUser {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "employeeName")]
    pub employee_name: String,
    #[serde(rename = "employeeID")]
    pub employee_id: String,
    #[serde(rename = "groupID")]
    pub group_id: String,
    #[serde(rename = "groupName")]
    pub group_name: String,
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    #[serde(rename = "sessionKey")]
    pub session_key: String,
    /// Session lifetime in seconds
    #[serde(rename = "sessionLength")]
    pub session_length: i64,
    #[serde(rename = "loginUrl")]
    pub login_url: String,
    #[serde(rename = "berlinPOSVersion")]
    pub berlin_pos_version: String,
    #[serde(rename = "berlinPOSAssetsURL")]
    pub berlin_pos_assets_url: String,
    #[serde(rename = "epsiURL")]
    pub epsi_url: String,
    #[serde(rename = "identityToken")]
    pub identity_token: String,
    pub token: String,
}

/// Session key lifetime, as Unix timestamps in string form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionKeyInfo {
    #[serde(rename = "creationUnixTime")]
    pub creation_unix_time: String,
    #[serde(rename = "expireUnixTime")]
    pub expire_unix_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityToken {
    #[serde(rename = "identityToken")]
    pub jwt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtToken {
    pub token: String,
}

/// Session obtained from an identity token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    #[serde(rename = "sessionKey")]
    pub session_key: String,
}
