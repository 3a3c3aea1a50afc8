//! Query parameters and request URL construction.

use url::form_urlencoded;

use crate::client::server::SolrServer;

/// Request handler used when the query does not name one.
pub const DEFAULT_PATH: &str = "/select";

/// Response format version requested from the server.
pub const PROTOCOL_VERSION: &str = "2.2";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("solr-async-client/", env!("CARGO_PKG_VERSION"));

/// A search request: an ordered, multi-valued list of parameters plus an
/// optional request handler path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolrQuery {
    params: Vec<(String, String)>,
    request_handler: Option<String>,
}

impl SolrQuery {
    /// Create a query for the given `q` parameter.
    pub fn new(q: impl Into<String>) -> Self {
        Self::default().set("q", q)
    }

    /// Replace all values of `name` with `value`.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.params.retain(|(k, _)| *k != name);
        self.params.push((name, value.into()));
        self
    }

    /// Append a value for `name`, keeping existing ones.
    pub fn add(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn rows(self, rows: u32) -> Self {
        self.set("rows", rows.to_string())
    }

    pub fn start(self, start: u32) -> Self {
        self.set("start", start.to_string())
    }

    /// Fields to return (`fl`).
    pub fn fields(self, fields: &[&str]) -> Self {
        self.set("fl", fields.join(","))
    }

    /// Add a filter query (`fq`).
    pub fn filter_query(self, fq: impl Into<String>) -> Self {
        self.add("fq", fq)
    }

    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.set("sort", sort)
    }

    /// Route the query to a specific request handler.
    ///
    /// Only values starting with `/` are used as a path; anything else
    /// falls back to [`DEFAULT_PATH`].
    pub fn request_handler(mut self, handler: impl Into<String>) -> Self {
        self.request_handler = Some(handler.into());
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn handler(&self) -> Option<&str> {
        self.request_handler.as_deref()
    }

    /// Path the request is sent to.
    pub fn path(&self) -> &str {
        match self.request_handler.as_deref() {
            Some(h) if h.starts_with('/') => h,
            _ => DEFAULT_PATH,
        }
    }
}

/// Build `<base_url><path>?<params>` for one attempt against `server`.
///
/// `wt` and `version` always come from the client; values the query
/// carries for them are dropped.
pub fn request_url(server: &SolrServer, query: &SolrQuery, writer_type: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in query.params() {
        if k == "wt" || k == "version" {
            continue;
        }
        serializer.append_pair(k, v);
    }
    serializer.append_pair("wt", writer_type);
    serializer.append_pair("version", PROTOCOL_VERSION);

    format!("{}{}?{}", server.base_url(), query.path(), serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let server = SolrServer::new("http://solr:8983/solr").unwrap();
        let url = request_url(&server, &SolrQuery::new("*:*"), "json");
        assert_eq!(url, "http://solr:8983/solr/select?q=*%3A*&wt=json&version=2.2");
    }

    #[test]
    fn test_trailing_slash_produces_identical_url() {
        let a = SolrServer::new("http://solr:8983/solr/").unwrap();
        let b = SolrServer::new("http://solr:8983/solr").unwrap();
        let q = SolrQuery::new("title:rust").rows(5);
        assert_eq!(request_url(&a, &q, "json"), request_url(&b, &q, "json"));
    }

    #[test]
    fn test_handler_path() {
        let server = SolrServer::new("http://solr:8983/solr").unwrap();
        let q = SolrQuery::new("x").request_handler("/suggest");
        assert!(request_url(&server, &q, "json").starts_with("http://solr:8983/solr/suggest?"));

        // Not a path, ignored.
        let q = SolrQuery::new("x").request_handler("dismax");
        assert_eq!(q.path(), DEFAULT_PATH);
    }

    #[test]
    fn test_space_encoded_as_plus() {
        let server = SolrServer::new("http://solr:8983/solr").unwrap();
        let q = SolrQuery::new("hello world");
        let url = request_url(&server, &q, "json");
        assert!(url.contains("q=hello+world"), "{url}");
    }

    #[test]
    fn test_client_controls_writer_type_and_version() {
        let server = SolrServer::new("http://solr:8983/solr").unwrap();
        let q = SolrQuery::new("x").set("wt", "xml").set("version", "1.0").rows(3);
        let url = request_url(&server, &q, "json");
        assert_eq!(url, "http://solr:8983/solr/select?q=x&rows=3&wt=json&version=2.2");
        assert_eq!(url.matches("wt=").count(), 1);
    }

    #[test]
    fn test_set_replaces_add_appends() {
        let q = SolrQuery::new("a")
            .set("q", "b")
            .filter_query("type:book")
            .filter_query("year:2020");
        assert_eq!(q.get("q"), Some("b"));
        let fqs: Vec<_> = q.params().iter().filter(|(k, _)| k == "fq").collect();
        assert_eq!(fqs.len(), 2);
    }
}
