use crate::common::util::read_bool_env;

/// Environment variable that controls [TestingConfig::verify_on_drop].
pub const VERIFY_ON_DROP_ENV: &str = "HTTPFLUSH_VERIFY_ON_DROP";
/// Environment variable that controls [TestingConfig::closest_match_hint].
pub const CLOSEST_MATCH_ENV: &str = "HTTPFLUSH_CLOSEST_MATCH";

/// Settings for a [TestingModule](crate::TestingModule).
///
/// # Example
/// ```
/// use httpflush::{TestingConfig, TestingModule};
///
/// let config = TestingConfig::default().verify_on_drop(false);
/// let module = TestingModule::with_config(config);
/// assert!(!module.config().verify_on_drop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestingConfig {
    /// Run the verification checkpoint when the module is dropped. Defaults to `true`.
    pub verify_on_drop: bool,
    /// Report the closest pending request when a matcher finds nothing. Defaults to `true`.
    pub closest_match_hint: bool,
}

impl Default for TestingConfig {
    fn default() -> Self {
        Self {
            verify_on_drop: true,
            closest_match_hint: true,
        }
    }
}

impl TestingConfig {
    /// Builds a config from the defaults, overridden by `HTTPFLUSH_VERIFY_ON_DROP` and
    /// `HTTPFLUSH_CLOSEST_MATCH` where they are set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            verify_on_drop: read_bool_env(VERIFY_ON_DROP_ENV, defaults.verify_on_drop),
            closest_match_hint: read_bool_env(CLOSEST_MATCH_ENV, defaults.closest_match_hint),
        }
    }

    pub fn verify_on_drop(mut self, enabled: bool) -> Self {
        self.verify_on_drop = enabled;
        self
    }

    pub fn closest_match_hint(mut self, enabled: bool) -> Self {
        self.closest_match_hint = enabled;
        self
    }
}
