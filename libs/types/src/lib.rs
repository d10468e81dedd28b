//! # Tablestore Types
//!
//! Typed data model for the Tablestore single-row read.
//!
//! ## Design Philosophy
//!
//! - **Sum types for cells**: a cell's variant tag and its value travel together
//!   as one enum, so a `STRING` tag can never carry an integer
//! - **Position-specific value sets**: primary key cells and attribute cells
//!   have separate value enums with exactly the variants legal in that position
//! - **Validation at the boundary**: requests are checked here, before any
//!   encoding or network traffic
//!
//! ## Quick Start
//!
//! ```rust
//! use tablestore_types::{GetRowRequest, PrimaryKeyItem, TimeRange};
//!
//! let request = GetRowRequest::new("orgs", vec![PrimaryKeyItem::new("org_id", "5e2c3790")])
//!     .columns(["name", "user_id"])
//!     .time_range(TimeRange::between(1726037335570, 1726130911180));
//!
//! assert!(request.validate().is_ok());
//! ```
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec → libs/network → libs/client
//!     ↑             ↓              ↓             ↓
//! Pure Data    PlainBuffer +   Signing +     GetRow
//! Structures   Protobuf        Transport     Orchestration
//! ```

pub mod error;
pub mod request;
pub mod row;
pub mod value;

pub use error::{ValidationError, ValidationResult};
pub use request::{
    ConsumedCapacity, GetRowRequest, GetRowResponse, TimeRange, DEFAULT_MAX_VERSIONS,
    MAX_VERSIONS_LIMIT,
};
pub use row::{Attribute, PrimaryKeyItem, Row};
pub use value::{ColumnValue, PrimaryKeyValue, VariantType};
