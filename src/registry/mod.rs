pub mod matchers;
pub(crate) mod pending;
pub(crate) mod state;

pub use matchers::RequestMatcher;
pub use pending::{PendingRequest, Resolution};
pub use state::RequestRegistry;
