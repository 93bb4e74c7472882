use std::{
    cell::{Cell, RefCell},
    fmt,
};

use crate::common::{
    data::{HttpErrorResponse, HttpRequest, HttpResponse, RequestSummary},
    error::Error,
};

/// The callback the issuing client registered for a request. It is invoked exactly once, with
/// either the flushed response or the simulated error.
pub(crate) type Continuation = Box<dyn FnOnce(Result<HttpResponse, HttpErrorResponse>)>;

/// State of the single-shot resolution slot of a [PendingRequest].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Pending,
    Succeeded,
    Failed,
}

/// A recorded request together with its resolution slot.
pub struct PendingRequest {
    id: usize,
    request: HttpRequest,
    resolution: Cell<Resolution>,
    continuation: RefCell<Option<Continuation>>,
}

impl PendingRequest {
    pub(crate) fn new(id: usize, request: HttpRequest, continuation: Continuation) -> Self {
        Self {
            id,
            request,
            resolution: Cell::new(Resolution::Pending),
            continuation: RefCell::new(Some(continuation)),
        }
    }

    /// Registry-wide sequence number, assigned in recording order.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.get() != Resolution::Pending
    }

    pub(crate) fn summary(&self) -> RequestSummary {
        self.request.summary(self.id)
    }

    pub(crate) fn ensure_pending(&self) -> Result<(), Error> {
        if self.is_resolved() {
            return Err(Error::AlreadyResolved {
                request: self.summary(),
            });
        }
        Ok(())
    }

    /// Moves the slot to `outcome` and hands out the continuation. Fails if the slot was
    /// already taken.
    pub(crate) fn claim(&self, outcome: Resolution) -> Result<Continuation, Error> {
        self.ensure_pending()?;

        let continuation = self
            .continuation
            .borrow_mut()
            .take()
            .ok_or_else(|| Error::AlreadyResolved {
                request: self.summary(),
            })?;

        self.resolution.set(outcome);
        Ok(continuation)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("request", &self.request)
            .field("resolution", &self.resolution.get())
            .finish()
    }
}
