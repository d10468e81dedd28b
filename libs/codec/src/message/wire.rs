//! Protobuf envelopes of the `ots` package
//!
//! Hand-declared prost messages mirroring `protocol/ots_internal_api.proto`.
//! Only the fields this client reads or writes are declared; the schema
//! registry still knows the full message layout.

use super::WireMessage;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Error {
    #[prost(string, optional, tag = "1")]
    pub code: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub message: Option<String>,
}

impl WireMessage for Error {
    const NAME: &'static str = "ots.Error";
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CapacityUnit {
    #[prost(int32, optional, tag = "1")]
    pub read: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub write: Option<i32>,
}

impl WireMessage for CapacityUnit {
    const NAME: &'static str = "ots.CapacityUnit";
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConsumedCapacity {
    #[prost(message, optional, tag = "1")]
    pub capacity_unit: Option<CapacityUnit>,
}

impl WireMessage for ConsumedCapacity {
    const NAME: &'static str = "ots.ConsumedCapacity";
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TimeRange {
    #[prost(int64, optional, tag = "1")]
    pub start_time: Option<i64>,
    #[prost(int64, optional, tag = "2")]
    pub end_time: Option<i64>,
    #[prost(int64, optional, tag = "3")]
    pub specific_time: Option<i64>,
}

impl WireMessage for TimeRange {
    const NAME: &'static str = "ots.TimeRange";
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetRowRequest {
    #[prost(string, required, tag = "1")]
    pub table_name: String,
    /// PlainBuffer holding one key-only row
    #[prost(bytes = "vec", required, tag = "2")]
    pub primary_key: Vec<u8>,
    #[prost(string, repeated, tag = "3")]
    pub columns_to_get: Vec<String>,
    #[prost(message, optional, tag = "4")]
    pub time_range: Option<TimeRange>,
    #[prost(int32, optional, tag = "5")]
    pub max_versions: Option<i32>,
    #[prost(string, optional, tag = "8")]
    pub start_column: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub end_column: Option<String>,
    #[prost(bytes = "vec", optional, tag = "10")]
    pub token: Option<Vec<u8>>,
}

impl WireMessage for GetRowRequest {
    const NAME: &'static str = "ots.GetRowRequest";
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetRowResponse {
    #[prost(message, optional, tag = "1")]
    pub consumed: Option<ConsumedCapacity>,
    /// PlainBuffer holding zero or one row; `None` or empty when no row exists
    #[prost(bytes = "vec", optional, tag = "2")]
    pub row: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub next_token: Option<Vec<u8>>,
}

impl WireMessage for GetRowResponse {
    const NAME: &'static str = "ots.GetRowResponse";
}
