use std::rc::Rc;

use crate::{
    api::{output::fail_with, request::TestRequest},
    common::{data::RequestSummary, error::Error},
    registry::{RequestMatcher, RequestRegistry},
};

/// The test-facing side of the testing backend. It finds pending requests so the test can
/// resolve them, and checks that none were left open.
///
/// # Example
/// ```
/// use httpflush::{RequestMatcher, TestingModule};
/// use serde_json::json;
///
/// let module = TestingModule::new();
/// let client = module.client();
/// let controller = module.controller();
///
/// client
///     .get("/data")
///     .header("Authorization", "my-auth-token")
///     .subscribe(|data: serde_json::Value| assert_eq!(data["name"], "Test Data"), |_| {});
///
/// let req = controller.expect_one(RequestMatcher::predicate(|r| r.has_header("Authorization")));
/// assert_eq!(req.request().method(), "GET");
/// req.flush(json!({ "name": "Test Data" }));
///
/// controller.verify();
/// ```
#[derive(Clone)]
pub struct HttpTestingController {
    registry: Rc<RequestRegistry>,
}

impl HttpTestingController {
    pub(crate) fn new(registry: Rc<RequestRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the single pending request that matches.
    ///
    /// # Panics
    /// Panics if no request or more than one request matches. The message lists the pending
    /// requests and, where possible, the one closest to the matcher.
    pub fn expect_one(&self, matcher: impl Into<RequestMatcher>) -> TestRequest {
        match self.try_expect_one(matcher) {
            Ok(req) => req,
            Err(err) => fail_with(&err),
        }
    }

    pub fn try_expect_one(
        &self,
        matcher: impl Into<RequestMatcher>,
    ) -> Result<TestRequest, Error> {
        let pending = self.registry.find_one(&matcher.into())?;
        Ok(TestRequest::new(self.registry.clone(), pending))
    }

    /// Returns every pending request that matches, in the order they were issued.
    pub fn match_requests(&self, matcher: impl Into<RequestMatcher>) -> Matches {
        let registry = self.registry.clone();
        let requests: Vec<TestRequest> = self
            .registry
            .find_all(&matcher.into())
            .map(|pending| TestRequest::new(registry.clone(), pending))
            .collect();

        Matches {
            inner: requests.into_iter(),
        }
    }

    /// # Panics
    /// Panics if any pending request matches.
    pub fn expect_none(&self, matcher: impl Into<RequestMatcher>) {
        if let Err(err) = self.try_expect_none(matcher) {
            fail_with(&err)
        }
    }

    pub fn try_expect_none(&self, matcher: impl Into<RequestMatcher>) -> Result<(), Error> {
        self.registry.find_none(&matcher.into())
    }

    /// The verification checkpoint.
    ///
    /// # Panics
    /// Panics if there are unresolved requests. The message lists them.
    pub fn verify(&self) {
        if let Err(err) = self.try_verify() {
            fail_with(&err)
        }
    }

    pub fn try_verify(&self) -> Result<(), Error> {
        self.registry.verify_empty()
    }

    /// Requests that are still waiting to be resolved.
    pub fn pending_requests(&self) -> Vec<RequestSummary> {
        self.registry.pending()
    }
}

/// The requests selected by [HttpTestingController::match_requests]. It is consumed once and
/// cannot be restarted.
#[derive(Debug)]
pub struct Matches {
    inner: std::vec::IntoIter<TestRequest>,
}

impl Iterator for Matches {
    type Item = TestRequest;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Matches {}
