//! Per-execution context handed to every resolver.
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

/// Caller supplied context for one execution.
///
/// The engine only reads [`Context::verbose`]; `extensions` is opaque data for resolvers,
/// such as the authenticated user or a tenant id. A context is immutable once built and
/// cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct Context {
    verbose: bool,
    extensions: Arc<Map<String, Value>>,
}

#[buildstructor::buildstructor]
impl Context {
    /// Create a context.
    #[builder(visibility = "pub")]
    fn new(verbose: Option<bool>, extensions: Map<String, Value>) -> Self {
        Self {
            verbose: verbose.unwrap_or_default(),
            extensions: Arc::new(extensions),
        }
    }

    /// Whether diagnostic traces are emitted for this execution.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Get a caller supplied value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// All caller supplied values.
    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }
}
