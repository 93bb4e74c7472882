use thiserror::Error;

use crate::common::data::{ClosestMatch, RequestSummary};

/// Errors raised by the request registry and the testing controller.
///
/// All of them indicate a broken test rather than a condition to recover from. The panicking
/// controller methods render them with [render_error](crate::render_error).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("expected one matching request for criteria \"{matcher}\", found none")]
    NoMatch {
        matcher: String,
        pending: Vec<RequestSummary>,
        closest: Option<ClosestMatch>,
    },
    #[error(
        "expected one matching request for criteria \"{matcher}\", found {} requests",
        .requests.len()
    )]
    AmbiguousMatch {
        matcher: String,
        requests: Vec<RequestSummary>,
    },
    #[error("cannot resolve {request} (request #{}): it has already been resolved", .request.id)]
    AlreadyResolved { request: RequestSummary },
    #[error("expected no open requests, found {}", .requests.len())]
    UnresolvedRequests { requests: Vec<RequestSummary> },
    #[error(
        "expected zero matching requests for criteria \"{matcher}\", found {}",
        .requests.len()
    )]
    UnexpectedMatch {
        matcher: String,
        requests: Vec<RequestSummary>,
    },
    #[error("invalid mock response: {0}")]
    InvalidResponse(String),
}
