//! Context-bound execution over per-context transports.
//!
//! # Execution contexts
//!
//! A [`ClientPool`] owns a fixed set of worker tasks. Each worker is one
//! execution context: it receives jobs over its own channel and polls every
//! job it accepted from inside its own task, so the request futures
//! submitted to a context are driven by one consistent worker.
//!
//! The worker lifecycle:
//! 1. Accept jobs and push them into the in-flight set, polling them as they
//!    make progress. A job that panics is logged and dropped; the others on
//!    the same context keep running.
//! 2. When every sender (the pool and all outstanding [`PooledClient`]s) is
//!    dropped, stop accepting.
//! 3. Let every in-flight job run to completion, then exit.
//!
//! [`ClientPool::http`] gives every context its own [`HttpTransport`], and
//! with it its own connection pool. hyper still drives each socket from a
//! connection task spawned on the runtime, so the worker owns the request
//! futures, not the sockets.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::transport::{BoxFuture, HttpTransport, Transport};

/// A unit of work bound to a context: given the transport, produce the I/O future.
type Job = Box<dyn FnOnce(Arc<dyn Transport>) -> BoxFuture<()> + Send + 'static>;

struct Context {
    tx: mpsc::UnboundedSender<Job>,
    transport: Arc<dyn Transport>,
}

/// Round-robin pool of execution contexts.
///
/// Cloning is cheap; clones hand out clients for the same contexts.
#[derive(Clone)]
pub struct ClientPool {
    contexts: Arc<[Context]>,
    next: Arc<AtomicUsize>,
}

impl ClientPool {
    /// Spawns `workers` contexts (at least one) that all share `transport`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(transport: impl Transport, workers: usize) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(transport);
        Self::spawn(workers, || Arc::clone(&transport))
    }

    /// Spawns `workers` contexts (at least one), each with its own transport
    /// built by `factory`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn per_context<T: Transport>(workers: usize, factory: impl Fn() -> T) -> Self {
        Self::spawn(workers, || Arc::new(factory()) as Arc<dyn Transport>)
    }

    /// One [`HttpTransport`] per context.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn http(workers: usize) -> Self {
        Self::per_context(workers, HttpTransport::new)
    }

    fn spawn(workers: usize, transport: impl Fn() -> Arc<dyn Transport>) -> Self {
        let contexts: Arc<[Context]> = (0..workers.max(1))
            .map(|id| {
                let (tx, rx) = mpsc::unbounded_channel();
                let transport = transport();
                tokio::spawn(run_context(id, Arc::clone(&transport), rx));
                Context { tx, transport }
            })
            .collect();

        Self { contexts, next: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn len(&self) -> usize { self.contexts.len() }

    /// Always `false`: a pool has at least one context.
    pub fn is_empty(&self) -> bool { self.contexts.is_empty() }

    /// Hands out a client bound to the next context, round-robin.
    ///
    /// Take a fresh client per call rather than keeping one around.
    pub fn client(&self) -> PooledClient {
        let id = self.next.fetch_add(1, Ordering::Relaxed) % self.contexts.len();
        let context = &self.contexts[id];
        PooledClient {
            id,
            tx: context.tx.clone(),
            transport: Arc::clone(&context.transport),
        }
    }
}

impl std::fmt::Debug for ClientPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientPool")
            .field("contexts", &self.contexts.len())
            .finish()
    }
}

/// A client bound to one execution context of a [`ClientPool`].
pub struct PooledClient {
    id: usize,
    tx: mpsc::UnboundedSender<Job>,
    transport: Arc<dyn Transport>,
}

impl PooledClient {
    /// Index of the context this client is bound to.
    pub fn context_id(&self) -> usize { self.id }

    /// Runs `work` on this client's context. Returns immediately.
    ///
    /// If the context worker is gone (its runtime is shutting down), the work
    /// is spawned directly on the current runtime instead, so it still runs.
    pub fn run_on_context<F, Fut>(&self, work: F)
    where
        F: FnOnce(Arc<dyn Transport>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let job: Job = Box::new(move |transport: Arc<dyn Transport>| -> BoxFuture<()> {
            Box::pin(work(transport))
        });

        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            warn!(context = self.id, "context worker is gone, running job off-context");
            tokio::spawn(job(Arc::clone(&self.transport)));
        }
    }
}

/// One execution context: polls every accepted job until the channel closes
/// and the in-flight set is empty.
async fn run_context(id: usize, transport: Arc<dyn Transport>, mut rx: mpsc::UnboundedReceiver<Job>) {
    debug!(context = id, "context worker started");

    let mut in_flight: FuturesUnordered<BoxFuture<()>> = FuturesUnordered::new();

    loop {
        tokio::select! {
            // Accept before polling so a burst of submissions is picked up
            // without waiting for slow in-flight requests.
            biased;

            job = rx.recv() => match job {
                Some(job) => in_flight.push(isolate(id, job(Arc::clone(&transport)))),
                None => break,
            },

            Some(()) = in_flight.next(), if !in_flight.is_empty() => {}
        }
    }

    while in_flight.next().await.is_some() {}

    debug!(context = id, "context worker stopped");
}

/// Confines a panic to the job that raised it.
fn isolate(context: usize, job: BoxFuture<()>) -> BoxFuture<()> {
    Box::pin(AssertUnwindSafe(job).catch_unwind().map(move |res| {
        if let Err(panic) = res {
            error!(context, "job panicked: {}", panic_message(panic.as_ref()));
        }
    }))
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
