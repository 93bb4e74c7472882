use std::rc::Rc;

use serde::Serialize;

use crate::{
    api::output::fail_with,
    common::{
        data::{ErrorBody, HttpRequest, ResponseBody, ResponseOptions},
        error::Error,
    },
    registry::{PendingRequest, RequestRegistry, Resolution},
};

/// A handle to one pending request, as returned by
/// [HttpTestingController::expect_one](crate::HttpTestingController::expect_one) and
/// [HttpTestingController::match_requests](crate::HttpTestingController::match_requests).
///
/// A request can be resolved exactly once: either with [TestRequest::flush] (or one of its
/// variants) or with [TestRequest::error]. The issuing client's callback runs before the
/// resolving call returns.
///
/// # Example
/// ```
/// use httpflush::{ResponseOptions, TestingModule};
///
/// let module = TestingModule::new();
/// module.client().get("/data").subscribe_response(
///     |_| panic!("expected an error"),
///     |err| {
///         assert_eq!(err.status, 404);
///         assert_eq!(err.error.as_text().unwrap(), "deliberate 404 error");
///     },
/// );
///
/// module.controller().expect_one("/data").flush_with(
///     "deliberate 404 error",
///     ResponseOptions::new().status(404).status_text("Not Found"),
/// );
/// ```
pub struct TestRequest {
    registry: Rc<RequestRegistry>,
    pending: Rc<PendingRequest>,
}

impl TestRequest {
    pub(crate) fn new(registry: Rc<RequestRegistry>, pending: Rc<PendingRequest>) -> Self {
        Self { registry, pending }
    }

    /// The request as the client issued it.
    pub fn request(&self) -> &HttpRequest {
        self.pending.request()
    }

    pub fn id(&self) -> usize {
        self.pending.id()
    }

    pub fn is_resolved(&self) -> bool {
        self.pending.is_resolved()
    }

    pub fn resolution(&self) -> Resolution {
        self.pending.resolution()
    }

    /// Resolves the request with status 200 and the given body.
    ///
    /// # Panics
    /// Panics if the request was already resolved.
    pub fn flush(&self, body: impl Into<ResponseBody>) {
        if let Err(err) = self.try_flush(body) {
            fail_with(&err)
        }
    }

    pub fn try_flush(&self, body: impl Into<ResponseBody>) -> Result<(), Error> {
        self.try_flush_with(body, ResponseOptions::new())
    }

    /// Resolves the request with the given body and status metadata. A status outside of
    /// `200..300` resolves it as an error carrying the body, like a real server would.
    ///
    /// # Panics
    /// Panics if the request was already resolved or the status is not a valid HTTP status.
    pub fn flush_with(&self, body: impl Into<ResponseBody>, options: ResponseOptions) {
        if let Err(err) = self.try_flush_with(body, options) {
            fail_with(&err)
        }
    }

    pub fn try_flush_with(
        &self,
        body: impl Into<ResponseBody>,
        options: ResponseOptions,
    ) -> Result<(), Error> {
        let body = body.into();

        if options.is_success() {
            return self.registry.resolve_success(&self.pending, body, &options);
        }

        // Status 0 would be read as a transport failure.
        if options.status == 0 {
            self.pending.ensure_pending()?;
            return Err(Error::InvalidResponse(
                "cannot flush with status 0, use error() to simulate network failures"
                    .to_string(),
            ));
        }

        self.registry
            .resolve_error(&self.pending, ErrorBody::Body(body), &options)
    }

    /// Serializes `value` to JSON and flushes it with status 200.
    ///
    /// # Panics
    /// Panics if the request was already resolved or `value` cannot be serialized.
    pub fn flush_json<T: Serialize>(&self, value: &T) {
        let result = ResponseBody::json(value).and_then(|body| self.try_flush(body));
        if let Err(err) = result {
            fail_with(&err)
        }
    }

    /// Resolves the request with a transport level failure. Pass [ResponseOptions::network]
    /// for the usual status `0`, or another non-success status to attach one.
    ///
    /// # Example
    /// ```
    /// use httpflush::{NetworkError, ResponseOptions, TestingModule};
    ///
    /// let module = TestingModule::new();
    /// module.client().get("/data").subscribe_response(
    ///     |_| panic!("expected an error"),
    ///     |err| {
    ///         assert_eq!(err.status, 0);
    ///         assert!(err.error.is_network());
    ///     },
    /// );
    ///
    /// module
    ///     .controller()
    ///     .expect_one("/data")
    ///     .error(NetworkError::new("Network error"), ResponseOptions::network());
    /// ```
    ///
    /// # Panics
    /// Panics if the request was already resolved.
    pub fn error<E>(&self, error: E, options: ResponseOptions)
    where
        E: std::error::Error + 'static,
    {
        if let Err(err) = self.try_error(error, options) {
            fail_with(&err)
        }
    }

    pub fn try_error<E>(&self, error: E, options: ResponseOptions) -> Result<(), Error>
    where
        E: std::error::Error + 'static,
    {
        self.registry
            .resolve_error(&self.pending, ErrorBody::Network(Rc::new(error)), &options)
    }
}

impl std::fmt::Debug for TestRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRequest")
            .field("pending", &self.pending)
            .finish()
    }
}
