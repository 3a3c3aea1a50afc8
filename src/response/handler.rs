//! Response validation and decoding.
//!
//! # Responsibilities
//! - Reject responses whose MIME type does not match the codec
//! - Extract the server's reason from error envelopes
//! - Decode successful bodies and record latency
//!
//! # Design Decisions
//! - MIME comparison uses the essence only (`type/subtype`), case-insensitive
//! - The MIME check runs before any body is decoded
//! - Every failure here counts as a remote exception

use std::sync::Arc;
use std::time::Instant;

use crate::error::{SolrError, SolrResult};
use crate::observability::Metrics;
use crate::response::codec::{QueryResponse, ResponseCodec};
use crate::transport::RawResponse;

const DEFAULT_CHARSET: &str = "UTF-8";

/// `type/subtype` in lower case, parameters removed.
pub fn mime_essence(content_type: &str) -> String {
    match content_type.trim().parse::<mime::Mime>() {
        Ok(m) => m.essence_str().to_ascii_lowercase(),
        Err(_) => content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase(),
    }
}

/// `charset` parameter of a content type, if any.
pub fn charset(content_type: &str) -> Option<String> {
    content_type
        .trim()
        .parse::<mime::Mime>()
        .ok()
        .and_then(|m| m.get_param(mime::CHARSET).map(|c| c.as_str().to_string()))
}

/// Validates and decodes raw responses with the configured codec.
#[derive(Debug, Clone)]
pub struct ResponseHandler {
    codec: Arc<dyn ResponseCodec>,
    metrics: Arc<dyn Metrics>,
}

impl ResponseHandler {
    pub fn new(codec: Arc<dyn ResponseCodec>, metrics: Arc<dyn Metrics>) -> Self {
        Self { codec, metrics }
    }

    pub fn codec(&self) -> &dyn ResponseCodec {
        self.codec.as_ref()
    }

    /// Validate then decode; `started` is when the attempt began.
    pub fn handle(&self, raw: &RawResponse, started: Instant) -> SolrResult<QueryResponse> {
        let result = self.validate(raw).and_then(|()| self.decode(raw));
        match &result {
            Ok(_) => self.metrics.request_time(started.elapsed()),
            Err(e) => {
                tracing::debug!(url = %raw.url, status = raw.status, error = %e, "Invalid response");
                self.metrics.count_remote_exception();
            }
        }
        result
    }

    /// Check content type and error statuses.
    pub fn validate(&self, raw: &RawResponse) -> SolrResult<()> {
        let expected = mime_essence(self.codec.content_type());
        let actual = raw.content_type.as_deref().map(mime_essence).unwrap_or_default();
        if expected != actual {
            return Err(SolrError::MimeMismatch { expected, actual });
        }

        if raw.status >= 400 {
            let reason = self
                .codec
                .decode(&raw.body, &self.charset_of(raw))
                .ok()
                .and_then(|r| r.error_message().map(str::to_string))
                .unwrap_or_else(|| fallback_reason(raw));
            return Err(SolrError::remote(raw.status, reason));
        }

        Ok(())
    }

    /// Decode the body; anything but a 200 is an error.
    pub fn decode(&self, raw: &RawResponse) -> SolrResult<QueryResponse> {
        let response = self
            .codec
            .decode(&raw.body, &self.charset_of(raw))
            .map_err(|e| SolrError::remote(raw.status, e.to_string()))?;

        if raw.status != 200 {
            let reason = response
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback_reason(raw));
            return Err(SolrError::remote(raw.status, reason));
        }

        Ok(response)
    }

    fn charset_of(&self, raw: &RawResponse) -> String {
        raw.content_type
            .as_deref()
            .and_then(charset)
            .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
    }
}

fn fallback_reason(raw: &RawResponse) -> String {
    format!("{}\n\nrequest: {}", raw.status_text, raw.url)
}
