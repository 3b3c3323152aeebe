//! Credentials and bearer-token sessions for the remote optimizer.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{CloudError, Result};
use crate::transport::Transport;

pub const AUTHENTICATION_URL: &str = "https://authentication.swiftmobility.eu/authenticate";

/// Environment variable holding the access key.
pub const ACCESS_KEY_ENV: &str = "smc_api_key";

/// Environment variable holding the secret access key.
pub const SECRET_KEY_ENV: &str = "smc_api_secret";

/// A token is renewed when it expires within this many seconds.
pub const REFRESH_MARGIN_SECS: u64 = 30;

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read credentials from the named environment variables.
    pub fn from_env(access_var: &str, secret_var: &str) -> Result<Self> {
        let read = |var: &str| {
            std::env::var(var)
                .map_err(|_| CloudError::Unauthorized(format!("environment variable {var} is not set")))
        };
        Ok(Self::new(read(access_var)?, read(secret_var)?))
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

#[derive(Deserialize)]
struct TokenReply {
    #[serde(rename = "jwt-token")]
    jwt_token: String,
    exp: f64,
}

/// A bearer token together with its expiry time (seconds since the Unix
/// epoch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    expires_at: u64,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, expires_at: u64) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// True when the token has expired or expires within
    /// [`REFRESH_MARGIN_SECS`].
    pub fn needs_refresh(&self, now: u64) -> bool {
        now + REFRESH_MARGIN_SECS > self.expires_at
    }

    /// Obtain a new token from the authentication service.
    pub fn refresh<T: Transport + ?Sized>(
        transport: &T,
        credentials: &Credentials,
        auth_url: &str,
    ) -> Result<AuthSession> {
        debug!(auth_url, "updating authentication token");
        let body = json!({
            "accessKey": credentials.access_key,
            "secretAccessKey": credentials.secret_access_key,
            "accountType": "cloud-api",
        });
        let reply = transport.post_json(auth_url, None, &body).map_err(|e| {
            if transport.has_connection() {
                e
            } else {
                CloudError::NoConnection
            }
        })?;

        if reply.status != 200 {
            if !transport.has_connection() {
                return Err(CloudError::NoConnection);
            }
            return Err(match reply.status {
                401 => CloudError::Unauthorized(
                    "access was denied; check that the access key and secret are set correctly"
                        .into(),
                ),
                400 => CloudError::BadRequest(reply.body),
                status => CloudError::Unknown { status },
            });
        }

        let token: TokenReply = reply.json()?;
        debug!("authentication token updated");
        Ok(AuthSession::new(token.jwt_token, token.exp.max(0.0) as u64))
    }
}

/// Return `session` if it is still fresh at `now`, or a refreshed session.
pub fn ensure_fresh<T: Transport + ?Sized>(
    session: Option<&AuthSession>,
    transport: &T,
    credentials: &Credentials,
    auth_url: &str,
    now: u64,
) -> Result<AuthSession> {
    match session {
        Some(s) if !s.needs_refresh(now) => Ok(s.clone()),
        _ => AuthSession::refresh(transport, credentials, auth_url),
    }
}
