//! Continuation type erasure.
//!
//! # How continuations are carried
//!
//! A dispatch job travels from the calling task to a pool worker, so the
//! caller's closure has to be stored behind a single, sendable type:
//!
//! ```text
//! |resp| { … }                               ← caller writes this
//!        ↓ dispatcher.get(…, on_response)    impl FnOnce(RestResponse) + Send
//! Box::new(on_response)
//!        ↓  BoxedContinuation = Box<dyn FnOnce(RestResponse) + Send>
//! continuation(result)  on the worker        ← consumed by value
//! ```
//!
//! The public methods take `impl FnOnce(RestResponse)` directly rather than a
//! trait of their own, so the compiler can infer the closure's argument type
//! at the call site.
//!
//! Because the box is `FnOnce` and is moved into the call, a continuation
//! can run at most once. The dispatcher has exactly one call site per
//! outcome, and the outcomes are exclusive, so it runs exactly once.

use crate::response::RestResponse;

/// A heap-allocated continuation, owned by whichever task will complete the call.
pub(crate) type BoxedContinuation = Box<dyn FnOnce(RestResponse) + Send + 'static>;
