//! Outgoing request description: [`RequestParam`] and [`RequestContext`].

use std::collections::HashMap;

use bytes::Bytes;

use crate::endpoint::Endpoint;
use crate::method::Method;

/// Query parameters, headers, cookies, and body of one registry call.
///
/// ```rust
/// use registry_rest::RequestParam;
///
/// let param = RequestParam::new()
///     .with_query("appId=default")
///     .with_header("x-request-id", "42")
///     .with_cookie("session", "abc")
///     .with_body(br#"{"serviceName":"orders"}"#.to_vec());
/// assert_eq!(param.query_string(), "appId=default");
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestParam {
    query: String,
    query_pairs: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    cookies: HashMap<String, String>,
    body: Option<Bytes>,
}

impl RequestParam {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-encoded query string (no leading `?`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Appends a structured query pair. The value is percent-encoded when the
    /// query string is rendered; the key is taken as-is.
    pub fn add_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_pairs.push((key.into(), value.into()));
        self
    }

    /// Adds a caller header. Caller headers win over every default and
    /// auth-provider header with the same (case-insensitive) name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The full query string: the pre-encoded part followed by the structured
    /// pairs, joined by `&`. Empty when neither was supplied.
    pub fn query_string(&self) -> String {
        let pairs = self.query_pairs.iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)));

        std::iter::once(self.query.clone())
            .filter(|q| !q.is_empty())
            .chain(pairs)
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn cookies(&self) -> &HashMap<String, String> { &self.cookies }
    pub fn body(&self) -> Option<&Bytes> { self.body.as_ref() }

    /// Case-insensitive caller header lookup. The last value set wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Everything needed to perform one call. Immutable once built.
#[derive(Clone, Debug)]
pub struct RequestContext {
    method: Method,
    endpoint: Option<Endpoint>,
    uri: String,
    param: RequestParam,
}

impl RequestContext {
    /// `endpoint` may be absent; dispatching such a context fails without
    /// any network I/O.
    pub fn new(
        method: Method,
        endpoint: impl Into<Option<Endpoint>>,
        uri: impl Into<String>,
        param: RequestParam,
    ) -> Self {
        Self { method, endpoint: endpoint.into(), uri: uri.into(), param }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn endpoint(&self) -> Option<&Endpoint> { self.endpoint.as_ref() }
    pub fn uri(&self) -> &str { &self.uri }
    pub fn param(&self) -> &RequestParam { &self.param }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_joins_raw_and_structured_parts() {
        let param = RequestParam::new()
            .with_query("appId=default")
            .add_query_param("serviceName", "order service")
            .add_query_param("version", "1.0.0");
        assert_eq!(
            param.query_string(),
            "appId=default&serviceName=order%20service&version=1.0.0"
        );
    }

    #[test]
    fn query_string_is_empty_without_params() {
        assert_eq!(RequestParam::new().query_string(), "");
        assert_eq!(
            RequestParam::new().add_query_param("a", "1").query_string(),
            "a=1"
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let param = RequestParam::new()
            .with_header("X-Token", "old")
            .with_header("x-token", "new");
        assert_eq!(param.header("X-TOKEN"), Some("new"));
        assert_eq!(param.header("missing"), None);
    }

    #[test]
    fn context_accepts_absent_endpoint() {
        let ctx = RequestContext::new(Method::Get, None::<Endpoint>, "/registry/v3/microservices", RequestParam::new());
        assert!(ctx.endpoint().is_none());

        let ctx = RequestContext::new(
            Method::Put,
            Endpoint::new("127.0.0.1", 30100),
            "/registry/v3/heartbeats",
            RequestParam::new(),
        );
        assert_eq!(ctx.endpoint().map(Endpoint::port), Some(30100));
        assert_eq!(ctx.method(), Method::Put);
    }
}
