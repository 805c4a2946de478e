//! Resolves declarative entity queries with caller supplied resolvers.
//!
//! A [`QueryDocument`] names, per operation, the entities to fetch and the relations to resolve
//! on each of them. [`execute`] walks the document, calls the matching [`Resolver`]s and
//! [`NestedResolver`]s from a [`ResolverRegistry`], and assembles one object shaped like the
//! query:
//!
//! ```ignore
//! let query = QueryDocument::try_from(json!({
//!     "get": { "user": { "args": { "id": 1 }, "resolve": { "posts": true } } }
//! }))?;
//! let resolvers = ResolverRegistry::new().operation(
//!     "get",
//!     OperationResolver::new().entity(
//!         "user",
//!         EntityResolver::new(resolver_fn(|args, _| async move {
//!             Ok(json!({ "id": args["id"], "name": "Ann" }))
//!         }))
//!         .nested("posts", nested_resolver_fn(|_, _, _| async { Ok(json!([{ "id": 10 }])) })),
//!     ),
//! );
//! let output = execute(&query, &resolvers, &Context::default()).await?;
//! // { "user": { "id": 1, "name": "Ann", "posts": [{ "id": 10 }] } }
//! ```
#![warn(unreachable_pub)]

mod configuration;
mod context;
mod error;
mod execution;
mod query;
mod registry;
mod trace;

pub use configuration::Configuration;
pub use configuration::ConfigurationError;
pub use configuration::RootResolution;
pub use context::Context;
pub use error::ExecutionError;
pub use execution::execute;
pub use execution::Executor;
pub use query::EntityQuery;
pub use query::Operation;
pub use query::QueryDocument;
pub use registry::nested_resolver_fn;
pub use registry::resolver_fn;
pub use registry::EntityResolver;
pub use registry::NestedResolver;
pub use registry::NestedResolverFn;
pub use registry::OperationResolver;
pub use registry::Resolver;
pub use registry::ResolverFn;
pub use registry::ResolverRegistry;
pub use tower::BoxError;

/// A JSON object.
pub type Object = serde_json::Map<String, serde_json::Value>;
