use std::{cell::RefCell, rc::Rc};

use crate::{
    common::{
        data::{
            ClosestMatch, ErrorBody, HttpErrorResponse, HttpRequest, HttpResponse, RequestSummary,
            ResponseBody, ResponseOptions,
        },
        error::Error,
    },
    config::TestingConfig,
    registry::{
        matchers::RequestMatcher,
        pending::{Continuation, PendingRequest, Resolution},
    },
};

pub(crate) struct RegistryState {
    next_request_id: usize,
    pending: Vec<Rc<PendingRequest>>,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            next_request_id: 0,
            pending: Vec::new(),
        }
    }
}

/// The ordered collection of requests that were issued but not yet resolved.
///
/// A registry lives for exactly one test. It is shared between the client that records
/// requests and the controller that resolves them.
pub struct RequestRegistry {
    state: RefCell<RegistryState>,
    config: TestingConfig,
}

impl RequestRegistry {
    pub fn new(config: TestingConfig) -> Self {
        Self {
            state: RefCell::new(RegistryState::new()),
            config,
        }
    }

    pub fn config(&self) -> &TestingConfig {
        &self.config
    }

    /// Appends a request. Nothing else happens until test code resolves it.
    pub(crate) fn record(
        &self,
        request: HttpRequest,
        continuation: Continuation,
    ) -> Rc<PendingRequest> {
        let mut state = self.state.borrow_mut();

        let id = state.next_request_id;
        state.next_request_id += 1;

        tracing::debug!(
            "Recording request with id={}: {} {}",
            id,
            request.method(),
            request.url_with_params()
        );

        let pending = Rc::new(PendingRequest::new(id, request, continuation));
        state.pending.push(pending.clone());

        pending
    }

    /// Returns the single pending request the matcher selects.
    pub fn find_one(&self, matcher: &RequestMatcher) -> Result<Rc<PendingRequest>, Error> {
        let mut found = self.find_all(matcher);

        match found.len() {
            1 => found.next().ok_or_else(|| self.no_match(matcher)),
            0 => Err(self.no_match(matcher)),
            _ => Err(Error::AmbiguousMatch {
                matcher: matcher.to_string(),
                requests: found.map(|p| p.summary()).collect(),
            }),
        }
    }

    /// Returns every pending request the matcher selects, in recording order.
    pub fn find_all(&self, matcher: &RequestMatcher) -> std::vec::IntoIter<Rc<PendingRequest>> {
        tracing::trace!("Matching pending requests against: {}", matcher);

        let found: Vec<Rc<PendingRequest>> = self
            .state
            .borrow()
            .pending
            .iter()
            .filter(|p| matcher.matches(p.request()))
            .cloned()
            .collect();

        found.into_iter()
    }

    /// Fails if any pending request matches.
    pub fn find_none(&self, matcher: &RequestMatcher) -> Result<(), Error> {
        let found: Vec<RequestSummary> = self.find_all(matcher).map(|p| p.summary()).collect();

        if found.is_empty() {
            return Ok(());
        }

        Err(Error::UnexpectedMatch {
            matcher: matcher.to_string(),
            requests: found,
        })
    }

    /// Resolves a request with a success response and runs its continuation.
    pub fn resolve_success(
        &self,
        pending: &PendingRequest,
        body: ResponseBody,
        options: &ResponseOptions,
    ) -> Result<(), Error> {
        pending.ensure_pending()?;

        if !options.is_success() {
            return Err(Error::InvalidResponse(format!(
                "status {} is not a success status",
                options.status
            )));
        }
        let status_text = options.resolve_status_text(false)?;

        let continuation = pending.claim(Resolution::Succeeded)?;
        self.remove(pending.id());

        tracing::debug!(
            "Resolving request with id={} with status {}",
            pending.id(),
            options.status
        );

        continuation(Ok(HttpResponse {
            url: pending.request().url_with_params(),
            status: options.status,
            status_text,
            headers: options.headers.clone(),
            body,
        }));

        Ok(())
    }

    /// Resolves a request with an error and runs its continuation.
    ///
    /// `options` carries status code and text. Transport failures use status `0`.
    pub fn resolve_error(
        &self,
        pending: &PendingRequest,
        error: ErrorBody,
        options: &ResponseOptions,
    ) -> Result<(), Error> {
        pending.ensure_pending()?;

        if options.is_success() {
            return Err(Error::InvalidResponse(format!(
                "status {} is a success status and cannot carry an error",
                options.status
            )));
        }
        let status_text = options.resolve_status_text(true)?;

        let continuation = pending.claim(Resolution::Failed)?;
        self.remove(pending.id());

        tracing::debug!(
            "Failing request with id={} with status {}",
            pending.id(),
            options.status
        );

        continuation(Err(HttpErrorResponse {
            url: pending.request().url_with_params(),
            status: options.status,
            status_text,
            headers: options.headers.clone(),
            error,
        }));

        Ok(())
    }

    /// Fails with a list of every request that is still open.
    pub fn verify_empty(&self) -> Result<(), Error> {
        let requests = self.pending();

        if requests.is_empty() {
            return Ok(());
        }

        Err(Error::UnresolvedRequests { requests })
    }

    pub fn pending(&self) -> Vec<RequestSummary> {
        self.state
            .borrow()
            .pending
            .iter()
            .map(|p| p.summary())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: usize) {
        self.state.borrow_mut().pending.retain(|p| p.id() != id);
    }

    fn no_match(&self, matcher: &RequestMatcher) -> Error {
        let state = self.state.borrow();

        let closest = if self.config.closest_match_hint {
            closest_match(&state.pending, matcher)
        } else {
            None
        };

        Error::NoMatch {
            matcher: matcher.to_string(),
            pending: state.pending.iter().map(|p| p.summary()).collect(),
            closest,
        }
    }
}

fn closest_match(
    pending: &[Rc<PendingRequest>],
    matcher: &RequestMatcher,
) -> Option<ClosestMatch> {
    let expected = matcher.expected_url()?;

    // Ties go to the earliest recorded request.
    let (distance, best) = pending
        .iter()
        .filter_map(|p| matcher.distance(p.request()).map(|d| (d, p)))
        .min_by_key(|(d, p)| (*d, p.id()))?;

    Some(ClosestMatch {
        request: best.summary(),
        expected,
        distance,
    })
}
