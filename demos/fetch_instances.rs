//! Minimal registry-rest example — look up the instances of one service.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example fetch_instances -- 127.0.0.1:30100 <service-id>
//!
//! Tenant and timeout come from REGISTRY_TENANT_NAME and
//! REGISTRY_REQUEST_TIMEOUT_MS.

use std::collections::HashMap;

use http_body_util::BodyExt;
use registry_rest::{AuthProviders, ClientPool, Config, Dispatcher, Endpoint, RequestParam};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let endpoint: Endpoint = args
        .next()
        .unwrap_or_else(|| "127.0.0.1:30100".to_owned())
        .parse()
        .expect("endpoint must be host:port");
    let service_id = args.next().unwrap_or_else(|| "default".to_owned());

    let mut auth = AuthProviders::new();
    if let Ok(token) = std::env::var("REGISTRY_AUTH_TOKEN") {
        auth.register(move || HashMap::from([("x-auth-token".to_owned(), token.clone())]));
    }

    let config = Config::from_env().expect("invalid registry configuration");
    let dispatcher = Dispatcher::new(ClientPool::http(2), config, auth);

    let (tx, rx) = oneshot::channel();
    dispatcher.get(
        endpoint,
        format!("/registry/v3/microservices/{service_id}/instances"),
        RequestParam::new().add_query_param("tags", "version:1.0"),
        move |resp| {
            let _ = tx.send(resp.into_response());
        },
    );

    // Body reading is the caller's job; the dispatcher only hands the response over.
    match rx.await.expect("dispatcher dropped the continuation") {
        Some(resp) => {
            let status = resp.status();
            let body = resp.into_body().collect().await.expect("read body").to_bytes();
            println!("{status}: {}", String::from_utf8_lossy(&body));
        }
        None => eprintln!("request failed, see log"),
    }
}
