use std::rc::Rc;

use crate::{
    api::{client::HttpClient, controller::HttpTestingController, output::render_error},
    config::TestingConfig,
    registry::RequestRegistry,
};

/// Owns the request registry for one test and hands out a client and a controller that
/// share it.
///
/// Unless [TestingConfig::verify_on_drop] is turned off, dropping the module runs the
/// verification checkpoint and panics if requests were left unresolved. The check is skipped
/// while the thread is already panicking, so a failed assertion is not masked by a second
/// panic.
///
/// # Example
/// ```
/// use httpflush::TestingModule;
///
/// let module = TestingModule::new();
/// let client = module.client();
/// let controller = module.controller();
///
/// for _ in 0..3 {
///     client.get("/data").subscribe(|items: Vec<String>| assert!(items.len() <= 1), |_| {});
/// }
///
/// let requests: Vec<_> = controller.match_requests("/data").collect();
/// assert_eq!(requests.len(), 3);
///
/// requests[0].flush(serde_json::json!([]));
/// requests[1].flush(serde_json::json!(["bob"]));
/// requests[2].flush(serde_json::json!(["carol"]));
/// ```
pub struct TestingModule {
    registry: Rc<RequestRegistry>,
}

impl TestingModule {
    /// Creates a module configured from the environment (see [TestingConfig::from_env]).
    pub fn new() -> Self {
        Self::with_config(TestingConfig::from_env())
    }

    pub fn with_config(config: TestingConfig) -> Self {
        tracing::trace!("Creating testing module with {:?}", config);
        Self {
            registry: Rc::new(RequestRegistry::new(config)),
        }
    }

    pub fn client(&self) -> HttpClient {
        HttpClient::new(self.registry.clone())
    }

    pub fn controller(&self) -> HttpTestingController {
        HttpTestingController::new(self.registry.clone())
    }

    pub fn config(&self) -> &TestingConfig {
        self.registry.config()
    }
}

impl Default for TestingModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestingModule {
    fn drop(&mut self) {
        if !self.registry.config().verify_on_drop || std::thread::panicking() {
            return;
        }

        if let Err(err) = self.registry.verify_empty() {
            tracing::warn!("Testing module dropped with unresolved requests: {}", err);
            panic!("{}", render_error(&err));
        }
    }
}
