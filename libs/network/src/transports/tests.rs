//! HTTP Transport Tests
//!
//! Uses real loopback connections, no mocks: a minimal HTTP/1.1 responder on
//! a `TcpListener` captures what the transport puts on the wire.

use super::*;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Request line + headers, and the body
type CapturedRequest = (String, Vec<u8>);

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .map(|(_, value)| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);

            let mut body = buf[end + 4..].to_vec();
            while body.len() < content_length {
                let n = stream.read(&mut chunk).await.unwrap();
                body.extend_from_slice(&chunk[..n]);
            }
            return (head, body);
        }
    }
}

/// Answer one request with the given status and body
async fn spawn_server(status: u16, body: &'static [u8]) -> (SocketAddr, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut stream).await;

        let head = format!(
            "HTTP/1.1 {status} Status\r\n\
             content-type: application/x-protobuf\r\n\
             x-ots-requestid: req-0001\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(body).await.unwrap();
        stream.shutdown().await.ok();
        captured
    });

    (addr, handle)
}

/// Accept one connection and never answer
async fn spawn_silent_server() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });
    (addr, handle)
}

fn transport(addr: SocketAddr, request_timeout: Duration) -> HttpTransport {
    HttpTransport::new(
        format!("http://{addr}/"),
        request_timeout,
        Duration::from_secs(2),
    )
    .unwrap()
}

fn headers() -> RequestHeaders {
    let mut headers = RequestHeaders::new();
    headers.insert("x-ots-date".into(), "2024-09-11T06:48:55.570Z".into());
    headers.insert("x-ots-signature".into(), "c2lnbmF0dXJl".into());
    headers
}

mod http_round_trip {
    use super::*;

    #[tokio::test]
    async fn test_posts_body_and_headers() {
        let (addr, server) = spawn_server(200, b"response-bytes").await;
        let transport = transport(addr, Duration::from_secs(5));

        let response = transport
            .send("/GetRow", Bytes::from_static(b"\x0a\x04orgs"), &headers())
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.request_id.as_deref(), Some("req-0001"));
        assert_eq!(&response.body[..], b"response-bytes");

        let (head, body) = server.await.unwrap();
        assert!(head.starts_with("POST /GetRow HTTP/1.1"), "{head}");
        assert!(head.contains("x-ots-signature: c2lnbmF0dXJl"));
        assert!(head.contains("x-ots-date: 2024-09-11T06:48:55.570Z"));
        assert_eq!(body, b"\x0a\x04orgs");
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let (addr, server) = spawn_server(403, b"\x0a\x0dOTSAuthFailed").await;
        let transport = transport(addr, Duration::from_secs(5));

        let response = transport
            .send("/GetRow", Bytes::new(), &headers())
            .await
            .unwrap();

        assert_eq!(response.status, 403);
        assert!(!response.is_success());
        assert_eq!(&response.body[..], b"\x0a\x0dOTSAuthFailed");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_metrics_track_round_trips() {
        let (addr, server) = spawn_server(200, b"abc").await;
        let transport = transport(addr, Duration::from_secs(5));

        transport
            .send("/GetRow", Bytes::from_static(b"12345"), &headers())
            .await
            .unwrap();
        server.await.unwrap();

        let metrics = transport.metrics();
        assert_eq!(metrics.requests, 1);
        assert_eq!(metrics.bytes_sent, 5);
        assert_eq!(metrics.bytes_received, 3);
        assert_eq!(metrics.errors, 0);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport(addr, Duration::from_secs(5));
        let err = transport
            .send("/GetRow", Bytes::new(), &headers())
            .await
            .unwrap_err();

        assert!(err.is_transient(), "unexpected error: {err:?}");
        assert_eq!(transport.metrics().errors, 1);
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let (addr, _server) = spawn_silent_server().await;
        let transport = transport(addr, Duration::from_millis(200));

        let err = transport
            .send("/GetRow", Bytes::new(), &headers())
            .await
            .unwrap_err();

        assert!(
            matches!(err, TransportError::Timeout { timeout_ms: 200, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_caller_deadline() {
        let (addr, _server) = spawn_silent_server().await;
        let transport = transport(addr, Duration::from_secs(30));

        let started = Instant::now();
        let err = transport
            .send_timeout("/GetRow", Bytes::new(), &headers(), Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Timeout { timeout_ms: 100, .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
