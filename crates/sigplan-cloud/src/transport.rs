//! HTTP transport abstraction.
//!
//! The [`Transport`] trait hides how JSON requests reach the remote service.
//! [`HttpTransport`] (feature `http`) is the production implementation;
//! tests drive the client with scripted in-memory transports.

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Status code and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Blocking JSON-over-HTTP transport.
pub trait Transport {
    /// POST `body` as JSON to `url`, optionally with a bearer token.
    fn post_json(&self, url: &str, bearer: Option<&str>, body: &serde_json::Value)
        -> Result<HttpReply>;

    /// Whether a working network connection is present.
    fn has_connection(&self) -> bool;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use std::net::{TcpStream, ToSocketAddrs};
    use std::time::Duration;

    use super::{HttpReply, Transport};
    use crate::error::{CloudError, Result};

    /// Hosts probed to tell a missing connection apart from a failing
    /// service; it is very unlikely that all of them are down.
    const PROBE_HOSTS: [&str; 2] = ["www.google.com:80", "www.amazon.com:80"];

    /// Transport backed by a blocking `reqwest` client.
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
        probe_timeout: Duration,
    }

    impl HttpTransport {
        pub fn new(timeout: Duration) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| CloudError::Transport(format!("failed to build HTTP client: {e}")))?;
            Ok(Self {
                client,
                probe_timeout: Duration::from_secs(2),
            })
        }
    }

    impl Transport for HttpTransport {
        fn post_json(
            &self,
            url: &str,
            bearer: Option<&str>,
            body: &serde_json::Value,
        ) -> Result<HttpReply> {
            let mut request = self.client.post(url).json(body);
            if let Some(token) = bearer {
                request = request.bearer_auth(token);
            }
            let response = request.send().map_err(|e| {
                if e.is_timeout() {
                    CloudError::Timeout
                } else {
                    CloudError::Transport(format!("request to {url} failed: {e}"))
                }
            })?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .unwrap_or_else(|_| "<empty response>".to_string());
            Ok(HttpReply { status, body })
        }

        fn has_connection(&self) -> bool {
            PROBE_HOSTS.iter().any(|host| {
                host.to_socket_addrs()
                    .ok()
                    .and_then(|mut addrs| addrs.next())
                    .is_some_and(|addr| TcpStream::connect_timeout(&addr, self.probe_timeout).is_ok())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_json() {
        let reply = HttpReply::new(200, r#"{"phase_diagram": []}"#);
        let value: serde_json::Value = reply.json().unwrap();
        assert!(value["phase_diagram"].is_array());
        assert!(HttpReply::new(200, "not json").json::<serde_json::Value>().is_err());
    }
}
