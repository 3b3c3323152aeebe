//! Client for the remote fixed-time schedule optimizer.
//!
//! The optimizer itself is a black box reached over HTTP. This crate builds
//! its requests, handles bearer-token authentication through an explicit
//! [`AuthSession`] value, and re-validates every returned schedule locally
//! with `sigplan-verify`.
//!
//! The production HTTP transport is behind the `http` feature.

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::{ensure_fresh, AuthSession, Credentials};
pub use client::{
    check_status, CloudClient, CloudConfig, OptimizationInput, OptimizationOutcome,
};
pub use error::{CloudError, Result};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{HttpReply, Transport};
