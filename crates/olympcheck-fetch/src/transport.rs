//! Outbound HTTP, behind a trait so the fan-out can run against a mock.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Host unreachable or connection refused. Non-HTTP transports report
    /// their own connection failures here too.
    #[error("connection failed: {0}")]
    Connect(String),
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// A GET-only HTTP client.
///
/// Implementations are shared by every concurrent per-year lookup, so they
/// must be usable through `&self`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, giving up after `timeout`. Any HTTP status is a successful
    /// response; only network failures and timeouts are errors.
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] over a pooled `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("olympcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Use an existing client (and its connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Http(err)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError> {
        debug!(url = %url, "GET");
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| classify(e, timeout))?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::Router;
    use axum::routing::get;

    use super::*;

    async fn serve() -> SocketAddr {
        let app = Router::new()
            .route("/codes.js", get(|| async { "var diplomaCodes = [];" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn returns_status_and_body() {
        let addr = serve().await;
        let transport = HttpTransport::new().unwrap();
        let resp = transport
            .get(&format!("http://{addr}/codes.js"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, b"var diplomaCodes = [];");
    }

    #[tokio::test]
    async fn not_found_is_a_response() {
        let addr = serve().await;
        let transport = HttpTransport::new().unwrap();
        let resp = transport
            .get(&format!("http://{addr}/missing"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let addr = serve().await;
        let transport = HttpTransport::new().unwrap();
        let err = transport
            .get(&format!("http://{addr}/slow"), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .get(&format!("http://{addr}/codes.js"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)));
        assert!(err.to_string().starts_with("connection failed"));
    }
}
