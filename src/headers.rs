//! Outgoing header set and URL composition.
//!
//! Precedence, lowest to highest:
//!
//! | Layer | Source |
//! |---|---|
//! | defaults | `content-type`, `user-agent`, `x-domain-name` |
//! | auth | every registered [`AuthHeaderProvider`](crate::AuthHeaderProvider) |
//! | caller | [`RequestParam`] headers |
//! | cookie | [`RequestParam`] cookies, folded into one `cookie` header |
//!
//! Each layer overwrites same-named headers (case-insensitive) of the layers
//! before it.

use std::collections::HashMap;

use http::header::{CONTENT_TYPE, COOKIE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::auth::AuthProviders;
use crate::error::Error;
use crate::request::RequestParam;

/// Tenant header read by the registry.
pub const TENANT_NAME: &str = "x-domain-name";

/// `User-Agent` sent with every request.
pub const CLIENT_IDENTIFIER: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const JSON: &str = "application/json";

/// Built-in defaults merged with every auth provider's headers.
pub fn default_headers(tenant: &str, auth: &AuthProviders) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_IDENTIFIER));
    headers.insert(HeaderName::from_static(TENANT_NAME), value(TENANT_NAME, tenant)?);

    for (name, val) in auth.collect() {
        put(&mut headers, &name, &val)?;
    }
    Ok(headers)
}

/// Full outgoing header set for one request.
pub(crate) fn assemble(
    tenant: &str,
    auth: &AuthProviders,
    param: &RequestParam,
) -> Result<HeaderMap, Error> {
    let mut headers = default_headers(tenant, auth)?;

    for (name, val) in param.headers() {
        put(&mut headers, name, val)?;
    }

    if let Some(cookie) = cookie_header(param.cookies()) {
        headers.insert(COOKIE, value("cookie", &cookie)?);
    }
    Ok(headers)
}

/// Folds cookies into a single `Cookie` value: `k1=v1; k2=v2; `.
/// The trailing separator is kept. `None` when there are no cookies.
pub(crate) fn cookie_header(cookies: &HashMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(cookies.iter().map(|(k, v)| format!("{k}={v}; ")).collect())
}

/// Appends `query` to `uri`, with `&` if the URI already has a query and `?`
/// otherwise.
pub(crate) fn compose_url(uri: &str, query: &str) -> String {
    if query.is_empty() {
        return uri.to_owned();
    }
    let sep = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{sep}{query}")
}

fn put(headers: &mut HeaderMap, name: &str, val: &str) -> Result<(), Error> {
    let name = HeaderName::try_from(name).map_err(|_| Error::InvalidHeader(name.to_owned()))?;
    let val = value(name.as_str(), val)?;
    headers.insert(name, val);
    Ok(())
}

fn value(name: &str, val: &str) -> Result<HeaderValue, Error> {
    HeaderValue::try_from(val).map_err(|_| Error::InvalidHeader(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_with(pairs: &'static [(&'static str, &'static str)]) -> AuthProviders {
        let mut auth = AuthProviders::new();
        auth.register(move || {
            pairs.iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<HashMap<_, _>>()
        });
        auth
    }

    #[test]
    fn url_gets_question_mark_without_existing_query() {
        assert_eq!(compose_url("/v1/foo", "a=1"), "/v1/foo?a=1");
    }

    #[test]
    fn url_gets_ampersand_with_existing_query() {
        assert_eq!(compose_url("/v1/foo?x=2", "a=1"), "/v1/foo?x=2&a=1");
    }

    #[test]
    fn url_is_untouched_by_empty_query() {
        assert_eq!(compose_url("/v1/foo?x=2", ""), "/v1/foo?x=2");
    }

    #[test]
    fn cookie_header_contains_every_pair() {
        let cookies = HashMap::from([
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "2".to_owned()),
        ]);
        let header = cookie_header(&cookies).unwrap();
        assert!(header.contains("a=1; "));
        assert!(header.contains("b=2; "));
        assert_eq!(header.len(), "a=1; b=2; ".len());
    }

    #[test]
    fn no_cookies_no_header() {
        assert_eq!(cookie_header(&HashMap::new()), None);
    }

    #[test]
    fn defaults_are_always_present() {
        let headers = assemble("tenant-a", &AuthProviders::new(), &RequestParam::new()).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[USER_AGENT], CLIENT_IDENTIFIER);
        assert_eq!(headers[TENANT_NAME], "tenant-a");
        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn auth_headers_override_defaults() {
        let auth = auth_with(&[("X-Domain-Name", "from-auth"), ("x-auth-token", "t")]);
        let headers = assemble("tenant-a", &auth, &RequestParam::new()).unwrap();
        assert_eq!(headers.get_all(TENANT_NAME).iter().count(), 1);
        assert_eq!(headers[TENANT_NAME], "from-auth");
        assert_eq!(headers["x-auth-token"], "t");
    }

    #[test]
    fn caller_headers_take_final_precedence() {
        let auth = auth_with(&[("x-auth-token", "from-auth")]);
        let param = RequestParam::new()
            .with_header("Content-Type", "text/plain")
            .with_header("X-Auth-Token", "from-caller");

        let headers = assemble("tenant-a", &auth, &param).unwrap();
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers["x-auth-token"], "from-caller");
    }

    #[test]
    fn cookies_become_one_header() {
        let param = RequestParam::new().with_cookie("session", "abc");
        let headers = assemble("t", &AuthProviders::new(), &param).unwrap();
        assert_eq!(headers[COOKIE], "session=abc; ");
    }

    #[test]
    fn invalid_header_is_an_error() {
        let param = RequestParam::new().with_header("bad header", "x");
        let err = assemble("t", &AuthProviders::new(), &param).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(name) if name == "bad header"));

        let param = RequestParam::new().with_header("x-ok", "line\nbreak");
        assert!(assemble("t", &AuthProviders::new(), &param).is_err());
    }
}
