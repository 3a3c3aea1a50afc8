//! Response body codecs.

use serde_json::Value;
use std::fmt;

use crate::error::CodecError;

/// Decoded search response.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    body: Value,
}

impl QueryResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// `responseHeader.status`.
    pub fn status(&self) -> Option<i64> {
        self.body.pointer("/responseHeader/status").and_then(Value::as_i64)
    }

    /// `responseHeader.QTime` in milliseconds.
    pub fn qtime(&self) -> Option<i64> {
        self.body.pointer("/responseHeader/QTime").and_then(Value::as_i64)
    }

    /// `response.numFound`.
    pub fn num_found(&self) -> Option<u64> {
        self.body.pointer("/response/numFound").and_then(Value::as_u64)
    }

    /// `response.docs`, empty when absent.
    pub fn documents(&self) -> &[Value] {
        self.body
            .pointer("/response/docs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `error.msg` from an error envelope.
    pub fn error_message(&self) -> Option<&str> {
        self.body.pointer("/error/msg").and_then(Value::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Turns a response body into a [`QueryResponse`].
pub trait ResponseCodec: Send + Sync + fmt::Debug {
    /// Value sent as the `wt` request parameter.
    fn writer_type(&self) -> &str;

    /// MIME type the server answers with for this writer type.
    fn content_type(&self) -> &str;

    /// Decode `body`, encoded in `charset`.
    fn decode(&self, body: &[u8], charset: &str) -> Result<QueryResponse, CodecError>;
}

/// `wt=json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl ResponseCodec for JsonCodec {
    fn writer_type(&self) -> &str {
        "json"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn decode(&self, body: &[u8], charset: &str) -> Result<QueryResponse, CodecError> {
        if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("utf8") {
            return Err(CodecError::UnsupportedCharset(charset.to_string()));
        }
        let body: Value = serde_json::from_slice(body)?;
        Ok(QueryResponse::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let body = br#"{
            "responseHeader": {"status": 0, "QTime": 3},
            "response": {"numFound": 2, "start": 0, "docs": [{"id": "1"}, {"id": "2"}]}
        }"#;
        let resp = JsonCodec.decode(body, "UTF-8").unwrap();
        assert_eq!(resp.status(), Some(0));
        assert_eq!(resp.qtime(), Some(3));
        assert_eq!(resp.num_found(), Some(2));
        assert_eq!(resp.documents()[1], json!({"id": "2"}));
        assert_eq!(resp.error_message(), None);
    }

    #[test]
    fn test_error_envelope() {
        let resp = JsonCodec.decode(br#"{"error":{"msg":"down","code":503}}"#, "utf-8").unwrap();
        assert_eq!(resp.error_message(), Some("down"));
        assert!(resp.documents().is_empty());
    }

    #[test]
    fn test_malformed_and_charset() {
        assert!(matches!(
            JsonCodec.decode(b"<html>", "utf-8"),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            JsonCodec.decode(b"{}", "ISO-8859-1"),
            Err(CodecError::UnsupportedCharset(_))
        ));
    }
}
