//! Terminal result of a dispatch.
//!
//! A [`RestResponse`] always carries the [`RequestContext`] it answers. The
//! live response is present on success and absent on every kind of failure.
//! Reading the body and interpreting the status is the caller's job.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};

use crate::request::RequestContext;

/// Body type of every response handed to a continuation.
///
/// The hyper transport streams `Incoming` through it; test transports can
/// build one from bytes with [`full`].
pub type ResponseBody = UnsyncBoxBody<Bytes, hyper::Error>;

/// Wraps in-memory bytes as a [`ResponseBody`].
pub fn full(body: impl Into<Bytes>) -> ResponseBody {
    Full::new(body.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// The originating request paired with an optional live response.
pub struct RestResponse {
    context: RequestContext,
    response: Option<http::Response<ResponseBody>>,
}

impl RestResponse {
    pub(crate) fn success(context: RequestContext, response: http::Response<ResponseBody>) -> Self {
        Self { context, response: Some(response) }
    }

    pub(crate) fn failure(context: RequestContext) -> Self {
        Self { context, response: None }
    }

    pub fn context(&self) -> &RequestContext { &self.context }

    pub fn response(&self) -> Option<&http::Response<ResponseBody>> {
        self.response.as_ref()
    }

    /// `true` when a response arrived, whatever its status code.
    pub fn is_success(&self) -> bool {
        self.response.is_some()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(http::Response::status)
    }

    pub fn into_response(self) -> Option<http::Response<ResponseBody>> {
        self.response
    }

    pub fn into_parts(self) -> (RequestContext, Option<http::Response<ResponseBody>>) {
        (self.context, self.response)
    }
}

impl std::fmt::Debug for RestResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestResponse")
            .field("context", &self.context)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Endpoint, Method, RequestParam};

    fn ctx() -> RequestContext {
        RequestContext::new(Method::Get, None::<Endpoint>, "/", RequestParam::new())
    }

    #[test]
    fn failure_has_no_response() {
        let resp = RestResponse::failure(ctx());
        assert!(!resp.is_success());
        assert_eq!(resp.status(), None);
        assert!(resp.into_response().is_none());
    }

    #[tokio::test]
    async fn success_exposes_status_and_body() {
        let raw = http::Response::builder()
            .status(StatusCode::CREATED)
            .body(full("{}"))
            .unwrap();
        let resp = RestResponse::success(ctx(), raw);
        assert_eq!(resp.status(), Some(StatusCode::CREATED));

        let body = resp.into_response().unwrap().into_body().collect().await.unwrap();
        assert_eq!(body.to_bytes(), Bytes::from_static(b"{}"));
    }
}
