//! Server descriptor.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Rejected server address.
#[derive(Debug, Error)]
#[error("invalid server address '{address}': {source}")]
pub struct ServerAddressError {
    pub address: String,
    #[source]
    pub source: url::ParseError,
}

/// A single Solr server, identified by its base URL.
///
/// The base URL is normalized once: query string and fragment are dropped
/// and trailing slashes are stripped, so `http://solr:8983/solr/` and
/// `http://solr:8983/solr` describe the same server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolrServer {
    base_url: String,
}

impl SolrServer {
    /// Parse and normalize a server address.
    pub fn new(address: &str) -> Result<Self, ServerAddressError> {
        let mut url = Url::parse(address.trim()).map_err(|source| ServerAddressError {
            address: address.to_string(),
            source,
        })?;
        url.set_query(None);
        url.set_fragment(None);

        let base_url = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { base_url })
    }

    /// The normalized base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FromStr for SolrServer {
    type Err = ServerAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SolrServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}
