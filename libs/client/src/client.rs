//! # Tablestore Client - Row Read Orchestration
//!
//! ## Purpose
//!
//! Drives one `GetRow` call end to end:
//!
//! ```text
//! GetRowRequest ─validate─► encode key (PlainBuffer) ─► wire::GetRowRequest
//!        ─encode (ots.GetRowRequest)─► RpcChannel (sign + POST /GetRow)
//!        ─decode (ots.GetRowResponse)─► decode row (PlainBuffer) ─► GetRowResponse
//! ```
//!
//! Validation happens before any encoding, so a malformed request never
//! reaches the network. The client holds no per-call state and can be shared
//! behind an `Arc`; the schema registry inside its codec is loaded on first
//! use and reused by every later call.

use crate::error::{ClientError, ClientResult};
use std::sync::Arc;
use tablestore_codec::{decode_rows, encode_primary_key, wire, MessageCodec, SchemaRegistry};
use tablestore_config::{paths, ClientConfig};
use tablestore_network::{HttpTransport, RequestSigner, RpcChannel, Transport};
use tablestore_types::{
    ConsumedCapacity, GetRowRequest, GetRowResponse, Row, TimeRange, ValidationError,
    MAX_VERSIONS_LIMIT,
};
use tracing::{debug, info, instrument};

/// Client bound to one Tablestore instance
#[derive(Debug, Clone)]
pub struct TablestoreClient {
    codec: MessageCodec,
    channel: RpcChannel,
}

impl TablestoreClient {
    /// Build a client over HTTP from validated configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client over a caller-supplied transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let registry = match &config.schema_dir {
            Some(dir) => SchemaRegistry::from_dir(dir.clone()),
            None => SchemaRegistry::embedded(),
        };
        let codec = MessageCodec::new(Arc::new(registry));
        let channel = RpcChannel::new(RequestSigner::from_config(config), transport, codec.clone())
            .with_timeout(config.request_timeout());

        info!(
            endpoint = %config.endpoint,
            instance = %config.instance_name,
            "Tablestore client ready"
        );

        Self {
            codec,
            channel,
        }
    }

    /// Read one row by primary key
    ///
    /// Returns `row: None` when the server has no row for the key. When the
    /// request sets neither `max_versions` nor `time_range`, only the newest
    /// version of each column is requested.
    #[instrument(skip(self, request), fields(table = %request.table_name))]
    pub async fn get_row(&self, request: &GetRowRequest) -> ClientResult<GetRowResponse> {
        request.validate()?;

        let envelope = to_wire_request(request)?;
        let body = self.codec.encode(&envelope)?;
        debug!(
            key_bytes = envelope.primary_key.len(),
            body_bytes = body.len(),
            max_versions = ?envelope.max_versions,
            "Encoded GetRow request"
        );

        let response = self.channel.call(paths::GET_ROW, body).await?;
        let envelope = self.codec.decode::<wire::GetRowResponse>(&response)?;
        from_wire_response(envelope)
    }
}

/// Map a validated request onto its protobuf envelope
fn to_wire_request(request: &GetRowRequest) -> ClientResult<wire::GetRowRequest> {
    let max_versions = request
        .effective_max_versions()
        .map(i32::try_from)
        .transpose()
        .map_err(|_| {
            ClientError::Validation(ValidationError::InvalidMaxVersions {
                value: request.max_versions.unwrap_or_default(),
                max: MAX_VERSIONS_LIMIT,
            })
        })?;

    Ok(wire::GetRowRequest {
        table_name: request.table_name.clone(),
        primary_key: encode_primary_key(&request.primary_key),
        columns_to_get: request.columns_to_get.clone(),
        time_range: request.time_range.map(wire_time_range),
        max_versions,
        start_column: request.start_column.clone(),
        end_column: request.end_column.clone(),
        token: request.token.clone(),
    })
}

fn wire_time_range(range: TimeRange) -> wire::TimeRange {
    wire::TimeRange {
        start_time: range.start_time,
        end_time: range.end_time,
        specific_time: range.specific_time,
    }
}

/// Turn a decoded envelope into the typed response
fn from_wire_response(envelope: wire::GetRowResponse) -> ClientResult<GetRowResponse> {
    let consumed = envelope
        .consumed
        .and_then(|c| c.capacity_unit)
        .map(|unit| ConsumedCapacity {
            read: unit.read,
            write: unit.write,
        })
        .unwrap_or_default();

    let row = first_row(envelope.row.as_deref().unwrap_or_default())?;
    match &row {
        Some(row) => debug!(
            key_cells = row.primary_key.len(),
            attributes = row.attributes.len(),
            "Row found"
        ),
        None => debug!("Row not found"),
    }

    Ok(GetRowResponse {
        consumed,
        row,
        next_token: envelope.next_token,
    })
}

fn first_row(bytes: &[u8]) -> ClientResult<Option<Row>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let rows = decode_rows(bytes)?;
    Ok(rows.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablestore_codec::encode_rows;
    use tablestore_types::{Attribute, PrimaryKeyItem};

    fn request() -> GetRowRequest {
        GetRowRequest::new("orgs", vec![PrimaryKeyItem::new("org_id", "5e2c3790")])
    }

    #[test]
    fn test_default_versions_injected() {
        let envelope = to_wire_request(&request()).unwrap();
        assert_eq!(envelope.max_versions, Some(1));
        assert!(envelope.time_range.is_none());
    }

    #[test]
    fn test_explicit_versions_kept() {
        let envelope = to_wire_request(&request().max_versions(10)).unwrap();
        assert_eq!(envelope.max_versions, Some(10));
    }

    #[test]
    fn test_time_range_suppresses_default() {
        let envelope =
            to_wire_request(&request().time_range(TimeRange::between(1_000, 2_000))).unwrap();
        assert_eq!(envelope.max_versions, None);
        assert_eq!(
            envelope.time_range,
            Some(wire::TimeRange {
                start_time: Some(1_000),
                end_time: Some(2_000),
                specific_time: None,
            })
        );
    }

    #[test]
    fn test_key_and_window_mapping() {
        let req = request()
            .columns(["name", "plan"])
            .column_window(Some("a".into()), Some("m".into()))
            .token(vec![7, 7]);
        let envelope = to_wire_request(&req).unwrap();

        assert_eq!(envelope.table_name, "orgs");
        assert_eq!(envelope.primary_key, encode_primary_key(&req.primary_key));
        assert_eq!(envelope.columns_to_get, vec!["name", "plan"]);
        assert_eq!(envelope.start_column.as_deref(), Some("a"));
        assert_eq!(envelope.end_column.as_deref(), Some("m"));
        assert_eq!(envelope.token, Some(vec![7, 7]));
    }

    #[test]
    fn test_empty_row_is_absent() {
        let response = from_wire_response(wire::GetRowResponse {
            consumed: None,
            row: None,
            next_token: None,
        })
        .unwrap();
        assert!(!response.exists());
        assert_eq!(response.consumed, ConsumedCapacity::default());
    }

    #[test]
    fn test_row_and_capacity_mapped() {
        let row = Row::new(
            vec![PrimaryKeyItem::new("org_id", "5e2c3790")],
            vec![Attribute::new("name", "Acme").with_timestamp(1_700_000_000_000)],
        );
        let response = from_wire_response(wire::GetRowResponse {
            consumed: Some(wire::ConsumedCapacity {
                capacity_unit: Some(wire::CapacityUnit {
                    read: Some(1),
                    write: Some(0),
                }),
            }),
            row: Some(encode_rows(std::slice::from_ref(&row))),
            next_token: Some(vec![1]),
        })
        .unwrap();

        assert_eq!(response.row, Some(row));
        assert_eq!(response.consumed.read, Some(1));
        assert_eq!(response.consumed.write, Some(0));
        assert_eq!(response.next_token, Some(vec![1]));
    }

    #[test]
    fn test_corrupt_row_is_decode_error() {
        let err = from_wire_response(wire::GetRowResponse {
            consumed: None,
            row: Some(vec![0x75, 0, 0, 0, 0x09]),
            next_token: None,
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
