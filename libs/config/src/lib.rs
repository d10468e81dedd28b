//! # Tablestore Client Configuration
//!
//! Connection settings and protocol constants shared by the network and
//! client crates.
//!
//! ## Features
//!
//! - **Client Configuration**: endpoint, credentials, instance, timeouts,
//!   loaded from TOML with `TABLESTORE_*` environment overrides
//! - **Protocol Constants**: API version, `x-ots-*` header names, RPC paths
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tablestore_config::{protocol, ClientConfig};
//!
//! let config = ClientConfig::load(Some("tablestore.toml".as_ref())).unwrap();
//! assert_eq!(protocol::API_VERSION, "2015-12-31");
//! println!("{}{}", config.endpoint, protocol::paths::GET_ROW);
//! ```

pub mod client_config;
pub mod protocol;

// Re-export commonly used types
pub use client_config::{load_config, ClientConfig};
pub use protocol::*;
