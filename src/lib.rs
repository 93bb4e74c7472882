//! `httpflush` lets you test code that issues HTTP calls without a server and without a
//! network. It contains two major components:
//!
//! * an **HTTP client** ([HttpClient]) that code under test uses to issue calls. Instead of
//!   sending them, it records them as pending requests, and
//! * a **testing controller** ([HttpTestingController]) that the test uses to find pending
//!   requests, answer them with mock responses or errors, and check that nothing was left
//!   unanswered.
//!
//! Both come from a [TestingModule], which owns the request registry for one test.
//!
//! Everything is synchronous and single-threaded. Issuing a call returns immediately. When
//! the test flushes a response, the caller's callback runs before `flush` returns.
//!
//! # Getting Started
//! ```rust
//! use httpflush::prelude::*;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data {
//!     name: String,
//! }
//!
//! let module = TestingModule::new();
//! let client = module.client();
//! let controller = module.controller();
//!
//! // Code under test issues a call.
//! client.get("/data").subscribe(
//!     |data: Data| assert_eq!(data, Data { name: "Test Data".into() }),
//!     |err| panic!("unexpected error: {}", err),
//! );
//!
//! // The test finds the request and answers it.
//! let req = controller.expect_one("/data");
//! assert_eq!(req.request().method(), Method::GET);
//! req.flush(json!({ "name": "Test Data" }));
//!
//! // Finally, assert that there are no outstanding requests.
//! controller.verify();
//! ```
//!
//! # Finding requests
//! [HttpTestingController::expect_one] fails the test unless exactly one pending request
//! matches. [HttpTestingController::match_requests] returns all matching requests in the
//! order they were issued. [HttpTestingController::expect_none] fails if any request
//! matches. A matcher is either a URL string (compared against the URL including query
//! parameters), a method and URL, a regular expression or a predicate (see [RequestMatcher]).
//!
//! # Resolving requests
//! Every pending request is resolved exactly once. [TestRequest::flush] answers with
//! status 200. [TestRequest::flush_with] sets status, status text and headers; a status
//! outside of `200..300` reaches the caller's error callback. [TestRequest::error] simulates a
//! transport failure such as a dropped connection. Resolving a request a second time fails.
//!
//! # Verification
//! [HttpTestingController::verify] fails if requests are still unresolved. A
//! [TestingModule] also verifies when it is dropped, unless disabled through
//! [TestingConfig] or the `HTTPFLUSH_VERIFY_ON_DROP` environment variable.
//!
//! # Failing loudly
//! The panicking methods describe the problem in detail: the pending requests in a table
//! and, when a URL matcher found nothing, the closest pending request with a diff. Each of
//! them has a `try_` counterpart that returns an [Error] instead.
//!
//! # Debugging
//! `httpflush` logs through `tracing`. Events are forwarded to the `log` crate, so a logger
//! such as `env_logger` initialized with `RUST_LOG=httpflush=debug` shows every recorded and
//! resolved request.
pub use api::{
    output::render_error, HttpClient, HttpTestingController, Matches, RequestBuilder,
    TestRequest, TestingModule,
};
pub use common::{
    data::{
        ClosestMatch, ErrorBody, HttpErrorResponse, HttpRequest, HttpResponse, NetworkError,
        RequestBody, RequestSummary, ResponseBody, ResponseOptions, ResponseType,
    },
    error::Error,
};
pub use config::TestingConfig;
pub use http::Method;
pub use regex::Regex;
pub use registry::{PendingRequest, RequestMatcher, RequestRegistry, Resolution};

mod api;
mod common;
mod config;
mod registry;

pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        HttpErrorResponse, HttpTestingController, Method, NetworkError, RequestMatcher,
        ResponseBody, ResponseOptions, ResponseType, TestRequest, TestingConfig, TestingModule,
    };
}
