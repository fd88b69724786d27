//! Pluggable authentication headers.
//!
//! Providers are registered once at startup into an [`AuthProviders`]
//! registry, which is then handed to the [`Dispatcher`](crate::Dispatcher).
//! Every provider is asked for headers on every request.
//!
//! ```rust
//! use std::collections::HashMap;
//! use registry_rest::AuthProviders;
//!
//! let mut auth = AuthProviders::new();
//! auth.register(|| HashMap::from([("x-auth-token".to_owned(), "secret".to_owned())]));
//! assert_eq!(auth.collect()["x-auth-token"], "secret");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

/// A contributor of authentication headers.
///
/// Implementations must be cheap and callable concurrently from any worker;
/// they are invoked once per request and must not assume they run before or
/// after any other provider.
pub trait AuthHeaderProvider: Send + Sync + 'static {
    fn auth_headers(&self) -> HashMap<String, String>;
}

impl<F> AuthHeaderProvider for F
where
    F: Fn() -> HashMap<String, String> + Send + Sync + 'static,
{
    fn auth_headers(&self) -> HashMap<String, String> {
        self()
    }
}

/// Registry of every [`AuthHeaderProvider`] known to the process.
#[derive(Clone, Default)]
pub struct AuthProviders {
    providers: Vec<Arc<dyn AuthHeaderProvider>>,
}

impl AuthProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: impl AuthHeaderProvider) -> &mut Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn len(&self) -> usize { self.providers.len() }
    pub fn is_empty(&self) -> bool { self.providers.is_empty() }

    /// Invokes every provider and merges the results. On a key collision the
    /// provider invoked later wins; invocation order is unspecified.
    pub fn collect(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        for provider in &self.providers {
            headers.extend(provider.auth_headers());
        }
        headers
    }
}

impl std::fmt::Debug for AuthProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProviders")
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Static(&'static str, &'static str);

    impl AuthHeaderProvider for Static {
        fn auth_headers(&self) -> HashMap<String, String> {
            HashMap::from([(self.0.to_owned(), self.1.to_owned())])
        }
    }

    #[test]
    fn empty_registry_yields_no_headers() {
        let auth = AuthProviders::new();
        assert!(auth.is_empty());
        assert!(auth.collect().is_empty());
    }

    #[test]
    fn distinct_keys_are_all_kept() {
        let mut auth = AuthProviders::new();
        auth.register(Static("x-auth-token", "t"))
            .register(Static("x-project", "p"));

        let headers = auth.collect();
        assert_eq!(auth.len(), 2);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-auth-token"], "t");
        assert_eq!(headers["x-project"], "p");
    }

    #[test]
    fn colliding_keys_keep_exactly_one_value() {
        let mut auth = AuthProviders::new();
        auth.register(Static("x-auth-token", "first"))
            .register(Static("x-auth-token", "second"));

        let headers = auth.collect();
        assert_eq!(headers.len(), 1);
        assert!(["first", "second"].contains(&headers["x-auth-token"].as_str()));
    }
}
