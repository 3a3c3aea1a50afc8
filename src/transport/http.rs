//! reqwest based transport.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::client::query::{request_url, SolrQuery, USER_AGENT as CLIENT_USER_AGENT};
use crate::client::server::SolrServer;
use crate::config::TimeoutConfig;
use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};

/// HTTP transport backed by a pooled `reqwest::Client`.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    request_timeout: Duration,
    closed: AtomicBool,
}

impl HttpTransport {
    /// Create a transport with its own connection pool.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        let request_timeout = Duration::from_secs(timeouts.request_secs);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(request_timeout)
            .build()?;

        Ok(Self::with_client(client, request_timeout))
    }

    /// Wrap an existing client. The User-Agent is still set per request.
    pub fn with_client(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
            closed: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.request_timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Http(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        server: &SolrServer,
        query: &SolrQuery,
        writer_type: &str,
    ) -> Result<RawResponse, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let url = request_url(server, query, writer_type);
        tracing::debug!(url = %url, "Sending request");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            url,
            body: body.to_vec(),
        })
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!("HTTP transport closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let transport = HttpTransport::new(&TimeoutConfig::default()).unwrap();
        transport.close();
        transport.close();
        assert!(transport.is_closed());

        let server = SolrServer::new("http://127.0.0.1:1/solr").unwrap();
        let err = transport
            .send(&server, &SolrQuery::new("*:*"), "json")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(&TimeoutConfig::default()).unwrap();
        let server = SolrServer::new(&format!("http://{}/solr", addr)).unwrap();
        let err = transport
            .send(&server, &SolrQuery::new("*:*"), "json")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "{err:?}");
    }
}
