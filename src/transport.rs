//! The network seam.
//!
//! [`Transport`] is the single operation the dispatcher needs from the
//! outside world: send one fully-built request, get one response back.
//! [`HttpTransport`] implements it on hyper-util's pooled client, which owns
//! connection reuse and DNS. Tests substitute their own implementations.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::BoxError;
use crate::response::ResponseBody;

/// A heap-allocated, type-erased future, sendable across worker tasks.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Outgoing request as handed to a [`Transport`].
pub type OutboundRequest = http::Request<Full<Bytes>>;

/// Sends fully-assembled requests.
///
/// The request URI is absolute (`http://host:port/path?query`). Timeouts are
/// enforced by the caller; implementations should not add their own.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, req: OutboundRequest) -> BoxFuture<Result<http::Response<ResponseBody>, BoxError>>;
}

/// [`Transport`] backed by hyper-util's pooled HTTP/1.1 client.
///
/// Cloning is cheap and every clone shares the same connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self { Self::new() }
}

impl Transport for HttpTransport {
    fn send(&self, req: OutboundRequest) -> BoxFuture<Result<http::Response<ResponseBody>, BoxError>> {
        let fut = self.client.request(req);
        Box::pin(async move {
            let resp = fut.await?;
            Ok::<_, BoxError>(resp.map(BodyExt::boxed_unsync))
        })
    }
}
