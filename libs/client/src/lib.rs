//! # Tablestore Client
//!
//! ## Purpose
//!
//! Typed single-row reads against a Tablestore instance. [`TablestoreClient`]
//! validates a [`GetRowRequest`], encodes its key as PlainBuffer and the
//! request as a protobuf envelope, signs and posts it, then rebuilds the row
//! from the response.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types ──► libs/codec ──► libs/network ──► [client]
//!                     ▲               ▲              │
//!                     └── libs/config ┘              ▼
//!                                              ots-get-row (CLI)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tablestore_client::{ClientConfig, GetRowRequest, PrimaryKeyItem, TablestoreClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load(None)?;
//! let client = TablestoreClient::new(&config)?;
//!
//! let request = GetRowRequest::new("orgs", vec![PrimaryKeyItem::new("org_id", "5e2c3790")])
//!     .max_versions(10);
//! if let Some(row) = client.get_row(&request).await?.row {
//!     println!("{} attributes", row.attributes.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::TablestoreClient;
pub use error::{ClientError, ClientResult};

pub use tablestore_config::{load_config, ClientConfig};
pub use tablestore_network::{HttpTransport, Transport, TransportResponse};
pub use tablestore_types::{
    Attribute, ColumnValue, ConsumedCapacity, GetRowRequest, GetRowResponse, PrimaryKeyItem,
    PrimaryKeyValue, Row, TimeRange, ValidationError,
};
