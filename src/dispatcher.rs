//! Request dispatch.
//!
//! # Lifecycle of one call
//!
//! ```text
//! get / post / put / delete
//!        ↓ RequestContext::new
//! dispatch ── no endpoint ──→ continuation(failure)      (synchronous, no I/O)
//!        ↓ pool.client().run_on_context(job)            (returns immediately)
//! job on the context worker:
//!   compose url, assemble headers, attach body
//!   transport.send(req) under the configured timeout
//!        ↓
//! continuation(success)  or  log + continuation(failure)
//! ```
//!
//! Missing address, transport error, and timeout all end the same way: a
//! [`RestResponse`] without a response. The cause only shows up in the log.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use tracing::{error, trace};

use crate::auth::AuthProviders;
use crate::config::ConfigSource;
use crate::continuation::BoxedContinuation;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::headers;
use crate::method::Method;
use crate::pool::ClientPool;
use crate::request::{RequestContext, RequestParam};
use crate::response::{ResponseBody, RestResponse};
use crate::transport::{OutboundRequest, Transport};

/// Sends registry requests and delivers each result to a continuation.
///
/// Cheap to clone; clones share the pool, configuration, and auth providers.
///
/// ```rust,no_run
/// use registry_rest::{AuthProviders, ClientPool, Config, Dispatcher, Endpoint, RequestParam};
///
/// # #[tokio::main] async fn main() {
/// let dispatcher = Dispatcher::new(ClientPool::http(4), Config::new(), AuthProviders::new());
///
/// dispatcher.get(
///     Endpoint::new("127.0.0.1", 30100),
///     "/registry/v3/microservices",
///     RequestParam::new().with_query("appId=default"),
///     |resp| println!("status: {:?}", resp.status()),
/// );
/// # }
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    pool: ClientPool,
    config: Arc<dyn ConfigSource>,
    auth: Arc<AuthProviders>,
}

impl Dispatcher {
    pub fn new(pool: ClientPool, config: impl ConfigSource, auth: AuthProviders) -> Self {
        Self { pool, config: Arc::new(config), auth: Arc::new(auth) }
    }

    pub fn get(
        &self,
        endpoint: impl Into<Option<Endpoint>>,
        uri: impl Into<String>,
        param: RequestParam,
        on_response: impl FnOnce(RestResponse) + Send + 'static,
    ) {
        self.dispatch(RequestContext::new(Method::Get, endpoint, uri, param), on_response);
    }

    pub fn post(
        &self,
        endpoint: impl Into<Option<Endpoint>>,
        uri: impl Into<String>,
        param: RequestParam,
        on_response: impl FnOnce(RestResponse) + Send + 'static,
    ) {
        self.dispatch(RequestContext::new(Method::Post, endpoint, uri, param), on_response);
    }

    pub fn put(
        &self,
        endpoint: impl Into<Option<Endpoint>>,
        uri: impl Into<String>,
        param: RequestParam,
        on_response: impl FnOnce(RestResponse) + Send + 'static,
    ) {
        self.dispatch(RequestContext::new(Method::Put, endpoint, uri, param), on_response);
    }

    pub fn delete(
        &self,
        endpoint: impl Into<Option<Endpoint>>,
        uri: impl Into<String>,
        param: RequestParam,
        on_response: impl FnOnce(RestResponse) + Send + 'static,
    ) {
        self.dispatch(RequestContext::new(Method::Delete, endpoint, uri, param), on_response);
    }

    /// Sends `ctx` and invokes `on_response` exactly once with the outcome.
    ///
    /// Returns without waiting for the network. A context without an
    /// endpoint fails before this returns; everything else completes later on
    /// a pool context.
    pub fn dispatch(&self, ctx: RequestContext, on_response: impl FnOnce(RestResponse) + Send + 'static) {
        let on_response: BoxedContinuation = Box::new(on_response);

        let Some(endpoint) = ctx.endpoint().cloned() else {
            error!(method = %ctx.method(), uri = ctx.uri(), "{}", Error::AddressMissing);
            on_response(RestResponse::failure(ctx));
            return;
        };

        let config = Arc::clone(&self.config);
        let auth = Arc::clone(&self.auth);
        let client = self.pool.client();
        trace!(method = %ctx.method(), uri = ctx.uri(), context = client.context_id(), "submitting request");

        client.run_on_context(move |transport| async move {
            let url = headers::compose_url(ctx.uri(), &ctx.param().query_string());

            match execute(transport.as_ref(), config.as_ref(), &auth, &ctx, &endpoint, &url).await {
                Ok(resp) => on_response(RestResponse::success(ctx, resp)),
                Err(e) => {
                    error!(method = %ctx.method(), %url, %endpoint, "request failed: {e}");
                    on_response(RestResponse::failure(ctx));
                }
            }
        });
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pool", &self.pool)
            .field("auth", &self.auth)
            .finish()
    }
}

async fn execute(
    transport: &dyn Transport,
    config: &dyn ConfigSource,
    auth: &AuthProviders,
    ctx: &RequestContext,
    endpoint: &Endpoint,
    url: &str,
) -> Result<http::Response<ResponseBody>, Error> {
    let req = build_request(ctx, endpoint, url, &config.tenant_name(), auth)?;

    let timeout = config.request_timeout();
    match tokio::time::timeout(timeout, transport.send(req)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Timeout(timeout)),
    }
}

/// Builds the outbound request. `url` is the path plus composed query string.
fn build_request(
    ctx: &RequestContext,
    endpoint: &Endpoint,
    url: &str,
    tenant: &str,
    auth: &AuthProviders,
) -> Result<OutboundRequest, Error> {
    let headers = headers::assemble(tenant, auth, ctx.param())?;

    // GET never carries a body, whatever the caller supplied.
    let body = match ctx.param().body() {
        Some(body) if !ctx.method().is_read_only() && !body.is_empty() => body.clone(),
        _ => Bytes::new(),
    };

    let mut req = http::Request::builder()
        .method(http::Method::from(ctx.method()))
        .uri(format!("http://{endpoint}{url}"))
        .body(Full::new(body))
        .map_err(|e| Error::Transport(e.into()))?;
    *req.headers_mut() = headers;
    Ok(req)
}
