//! # GetRow Scenario Tests
//!
//! End-to-end reads through [`TablestoreClient`] over an in-memory transport
//! that records every request and answers with a scripted envelope.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tablestore_client::{
    Attribute, ClientConfig, ClientError, GetRowRequest, PrimaryKeyItem, Row, TablestoreClient,
    TimeRange, Transport, TransportResponse, ValidationError,
};
use tablestore_codec::{encode_primary_key, encode_rows, wire, MessageCodec};
use tablestore_network::RequestHeaders;

/// Recorded request: path, decoded envelope, headers
type Recorded = (String, wire::GetRowRequest, RequestHeaders);

struct RecordingTransport {
    status: u16,
    body: Vec<u8>,
    calls: Mutex<Vec<Recorded>>,
}

impl RecordingTransport {
    fn new(status: u16, body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        path: &str,
        body: Bytes,
        headers: &RequestHeaders,
    ) -> tablestore_network::Result<TransportResponse> {
        let envelope = MessageCodec::default()
            .decode::<wire::GetRowRequest>(&body)
            .unwrap();
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), envelope, headers.clone()));
        Ok(TransportResponse {
            status: self.status,
            request_id: Some("0005f1c6-test".into()),
            body: Bytes::from(self.body.clone()),
        })
    }
}

fn config() -> ClientConfig {
    ClientConfig::new(
        "https://demo.cn-hangzhou.ots.aliyuncs.com",
        "LTAI-test",
        "secret",
        "demo",
    )
}

fn client(transport: Arc<RecordingTransport>) -> TablestoreClient {
    TablestoreClient::with_transport(&config(), transport)
}

fn org_key() -> Vec<PrimaryKeyItem> {
    vec![PrimaryKeyItem::new("org_id", "5e2c3790")]
}

fn response_envelope(row: Vec<u8>) -> Vec<u8> {
    MessageCodec::default()
        .encode(&wire::GetRowResponse {
            consumed: Some(wire::ConsumedCapacity {
                capacity_unit: Some(wire::CapacityUnit {
                    read: Some(1),
                    write: None,
                }),
            }),
            row: Some(row),
            next_token: None,
        })
        .unwrap()
}

fn error_envelope(code: &str, message: &str) -> Vec<u8> {
    MessageCodec::default()
        .encode(&wire::Error {
            code: Some(code.into()),
            message: Some(message.into()),
        })
        .unwrap()
}

#[tokio::test]
async fn test_read_existing_row() {
    let stored = Row::new(
        org_key(),
        vec![Attribute::new("name", "Acme").with_timestamp(1_700_000_000_000)],
    );
    let transport = RecordingTransport::new(200, response_envelope(encode_rows(&[stored.clone()])));
    let request = GetRowRequest::new("orgs", org_key()).max_versions(10);

    let response = client(transport.clone()).get_row(&request).await.unwrap();

    assert_eq!(response.row, Some(stored));
    assert_eq!(response.consumed.read, Some(1));
    assert_eq!(response.consumed.write, None);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (path, sent, headers) = &calls[0];
    assert_eq!(path, "/GetRow");
    assert_eq!(sent.table_name, "orgs");
    assert_eq!(sent.max_versions, Some(10));
    assert_eq!(sent.primary_key, encode_primary_key(&org_key()));
    assert_eq!(headers["x-ots-apiversion"], "2015-12-31");
    assert_eq!(headers["x-ots-accesskeyid"], "LTAI-test");
    assert_eq!(headers["x-ots-instancename"], "demo");
    assert!(headers.contains_key("x-ots-signature"));
    assert!(!headers.contains_key("x-ots-ststoken"));
}

#[tokio::test]
async fn test_missing_row_is_absent() {
    let transport = RecordingTransport::new(200, response_envelope(Vec::new()));
    let response = client(transport)
        .get_row(&GetRowRequest::new("orgs", org_key()))
        .await
        .unwrap();

    assert!(response.row.is_none());
    assert!(!response.exists());
}

#[tokio::test]
async fn test_response_without_row_field() {
    // consumed { capacity_unit { read: 1 } } and nothing else
    let transport = RecordingTransport::new(200, vec![0x0A, 4, 0x0A, 2, 0x08, 1]);
    let response = client(transport)
        .get_row(&GetRowRequest::new("orgs", org_key()))
        .await
        .unwrap();

    assert!(response.row.is_none());
    assert_eq!(response.consumed.read, Some(1));
}

#[tokio::test]
async fn test_default_max_versions() {
    let transport = RecordingTransport::new(200, response_envelope(Vec::new()));
    let client = client(transport.clone());

    client
        .get_row(&GetRowRequest::new("orgs", org_key()))
        .await
        .unwrap();
    client
        .get_row(&GetRowRequest::new("orgs", org_key()).time_range(TimeRange::specific(42)))
        .await
        .unwrap();
    client
        .get_row(
            &GetRowRequest::new("orgs", org_key())
                .time_range(TimeRange::between(0, 100))
                .max_versions(3),
        )
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls[0].1.max_versions, Some(1));
    assert_eq!(calls[1].1.max_versions, None);
    assert_eq!(
        calls[1].1.time_range.as_ref().and_then(|r| r.specific_time),
        Some(42)
    );
    assert_eq!(calls[2].1.max_versions, Some(3));
}

#[tokio::test]
async fn test_access_denied() {
    let transport = RecordingTransport::new(403, error_envelope("OTSAuthFailed", "access denied"));
    let err = client(transport)
        .get_row(&GetRowRequest::new("orgs", org_key()))
        .await
        .unwrap_err();

    match err {
        ClientError::Remote {
            status,
            code,
            message,
            request_id,
        } => {
            assert_eq!(status, 403);
            assert_eq!(code, "OTSAuthFailed");
            assert_eq!(message, "access denied");
            assert_eq!(request_id.as_deref(), Some("0005f1c6-test"));
        }
        other => panic!("Expected Remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_access_denied_without_error_code() {
    let mut body = vec![0x12, 13];
    body.extend_from_slice(b"access denied");
    let transport = RecordingTransport::new(403, body);
    let err = client(transport)
        .get_row(&GetRowRequest::new("orgs", org_key()))
        .await
        .unwrap_err();

    match err {
        ClientError::Remote {
            status,
            code,
            message,
            ..
        } => {
            assert_eq!(status, 403);
            assert!(code.is_empty());
            assert_eq!(message, "access denied");
        }
        other => panic!("Expected Remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_requests_never_sent() {
    let transport = RecordingTransport::new(200, response_envelope(Vec::new()));
    let client = client(transport.clone());

    let empty_key = client
        .get_row(&GetRowRequest::new("orgs", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        empty_key,
        ClientError::Validation(ValidationError::EmptyPrimaryKey)
    ));

    let ambiguous = client
        .get_row(&GetRowRequest::new("orgs", org_key()).time_range(TimeRange {
            start_time: Some(0),
            end_time: Some(100),
            specific_time: Some(50),
        }))
        .await
        .unwrap_err();
    assert!(matches!(
        ambiguous,
        ClientError::Validation(ValidationError::AmbiguousTimeRange)
    ));

    let zero_versions = client
        .get_row(&GetRowRequest::new("orgs", org_key()).max_versions(0))
        .await
        .unwrap_err();
    assert!(matches!(
        zero_versions,
        ClientError::Validation(ValidationError::InvalidMaxVersions { value: 0, .. })
    ));

    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_response_envelope() {
    let transport = RecordingTransport::new(200, vec![0xff, 0xff, 0xff]);
    let err = client(transport)
        .get_row(&GetRowRequest::new("orgs", org_key()))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_shared_client_concurrent_reads() {
    let stored = Row::new(org_key(), vec![Attribute::new("plan", 3i64)]);
    let transport = RecordingTransport::new(200, response_envelope(encode_rows(&[stored.clone()])));
    let client = Arc::new(client(transport.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .get_row(&GetRowRequest::new("orgs", org_key()))
                    .await
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().row.as_ref(), Some(&stored));
    }
    assert_eq!(transport.calls().len(), 8);
}
