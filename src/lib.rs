//! # registry-rest
//!
//! The asynchronous request dispatcher a service-registry client uses to talk
//! to its registry endpoint.
//!
//! ## The contract
//!
//! You describe a call: method, endpoint, path, query, headers, cookies,
//! body. The [`Dispatcher`] adds the default and authentication headers,
//! sends it through a pooled HTTP client under a fixed timeout, and hands
//! exactly one [`RestResponse`] to your continuation.
//!
//! What the dispatcher intentionally leaves to others:
//!
//! - **Retries and circuit breaking** — the registry client above decides
//! - **Connection reuse, DNS, TLS** — the [`Transport`]
//! - **Response parsing** — the continuation gets the raw response
//!
//! A failed call, whatever the cause, arrives as a [`RestResponse`] without
//! a response. The cause is logged through `tracing`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use registry_rest::{AuthProviders, ClientPool, Config, Dispatcher, Endpoint, RequestParam};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut auth = AuthProviders::new();
//!     auth.register(|| HashMap::from([("x-auth-token".to_owned(), "secret".to_owned())]));
//!
//!     let dispatcher = Dispatcher::new(ClientPool::http(4), Config::from_env().unwrap(), auth);
//!
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     dispatcher.put(
//!         Endpoint::new("127.0.0.1", 30100),
//!         "/registry/v3/microservices/svc-1/instances/inst-1/heartbeat",
//!         RequestParam::new(),
//!         move |resp| { let _ = tx.send(resp.status()); },
//!     );
//!     println!("heartbeat: {:?}", rx.await.unwrap());
//! }
//! ```

mod auth;
mod config;
mod continuation;
mod dispatcher;
mod endpoint;
mod error;
mod method;
mod pool;
mod request;
mod response;
mod transport;

pub mod headers;

pub use auth::{AuthHeaderProvider, AuthProviders};
pub use config::{Config, ConfigSource, ENV_REQUEST_TIMEOUT_MS, ENV_TENANT_NAME};
pub use dispatcher::Dispatcher;
pub use endpoint::Endpoint;
pub use error::{BoxError, Error};
pub use method::Method;
pub use pool::{ClientPool, PooledClient};
pub use request::{RequestContext, RequestParam};
pub use response::{ResponseBody, RestResponse, full};
pub use transport::{BoxFuture, HttpTransport, OutboundRequest, Transport};
