//! Settings the dispatcher reads on every call.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;

/// Environment variable holding the request timeout in milliseconds.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "REGISTRY_REQUEST_TIMEOUT_MS";

/// Environment variable holding the tenant sent as `x-domain-name`.
pub const ENV_TENANT_NAME: &str = "REGISTRY_TENANT_NAME";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);
const DEFAULT_TENANT_NAME: &str = "default";

/// Source of the request timeout and tenant name.
///
/// Queried once per dispatch, so a dynamic implementation sees its changes
/// picked up by the next request.
pub trait ConfigSource: Send + Sync + 'static {
    fn request_timeout(&self) -> Duration;
    fn tenant_name(&self) -> String;
}

/// Static configuration.
///
/// ```rust
/// use std::time::Duration;
/// use registry_rest::{Config, ConfigSource};
///
/// let config = Config::new()
///     .with_request_timeout(Duration::from_secs(5))
///     .with_tenant_name("shop");
/// assert_eq!(config.tenant_name(), "shop");
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    request_timeout: Duration,
    tenant_name: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            tenant_name: DEFAULT_TENANT_NAME.to_owned(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_tenant_name(mut self, tenant: impl Into<String>) -> Self {
        self.tenant_name = tenant.into();
        self
    }

    /// Reads [`ENV_REQUEST_TIMEOUT_MS`] and [`ENV_TENANT_NAME`]; unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::new();

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_REQUEST_TIMEOUT_MS}: `{raw}` is not a number of milliseconds"))
            })?;
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(tenant) = lookup(ENV_TENANT_NAME) {
            config.tenant_name = tenant;
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self { Self::new() }
}

impl ConfigSource for Config {
    fn request_timeout(&self) -> Duration { self.request_timeout }
    fn tenant_name(&self) -> String { self.tenant_name.clone() }
}

/// Lets a caller keep a handle on a dynamic source after handing it over.
impl<C: ConfigSource + ?Sized> ConfigSource for Arc<C> {
    fn request_timeout(&self) -> Duration { (**self).request_timeout() }
    fn tenant_name(&self) -> String { (**self).tenant_name() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.tenant_name(), "default");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            (ENV_REQUEST_TIMEOUT_MS, "1500"),
            (ENV_TENANT_NAME, "shop"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.tenant_name(), "shop");
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_MS, "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(ENV_REQUEST_TIMEOUT_MS));
    }
}
