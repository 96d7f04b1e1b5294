//! Device Farm API interaction module
//!
//! This module provides the core functionality for talking to the AWS Device
//! Farm management API: the operation surface, request signing, the HTTP
//! client and paginated device pool scans.
//!
//! # Module Structure
//!
//! - [`api`] - `DeviceFarmApi` trait and request/response types
//! - [`auth`] - AWS credentials and Signature V4 signing
//! - [`client`] - HTTP-backed `DeviceFarmApi` implementation
//! - [`http`] - HTTP utilities for the JSON 1.1 protocol
//! - [`pools`] - Device pool listing and lookup
//!
//! # Example
//!
//! ```ignore
//! use crate::devicefarm::{client::DeviceFarmClient, pools};
//!
//! async fn example(config: &Config) -> anyhow::Result<()> {
//!     let client = DeviceFarmClient::new(config)?;
//!     let top = pools::find_top_devices_pool_arn(&client, "arn:aws:devicefarm:...").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod http;
pub mod pools;
