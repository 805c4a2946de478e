//! Resolver registration.
//!
//! A [`ResolverRegistry`] maps an operation name to an [`OperationResolver`], which maps entity
//! type names to [`EntityResolver`]s. An entity resolver fetches the entity itself and may carry
//! [`NestedResolver`]s, keyed by relation name, for the entities related to it.
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tower::BoxError;

use crate::Context;

/// Fetches a top level entity, or a list of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve the entity for `args`.
    async fn invoke(&self, args: Value, context: &Context) -> Result<Value, BoxError>;
}

/// Fetches the entities related to an already resolved parent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NestedResolver: Send + Sync {
    /// Resolve the relation of `parent` for `args`.
    async fn invoke(
        &self,
        parent: &Value,
        args: Value,
        context: &Context,
    ) -> Result<Value, BoxError>;
}

/// The resolver for one entity type, and the resolvers of its relations.
#[derive(Clone)]
pub struct EntityResolver {
    resolver: Arc<dyn Resolver>,
    nested: HashMap<String, Arc<dyn NestedResolver>>,
}

/// The entity resolvers of one operation, by entity type name.
#[derive(Clone, Default)]
pub struct OperationResolver {
    entities: HashMap<String, EntityResolver>,
}

/// Operation resolvers by operation name.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    operations: HashMap<String, OperationResolver>,
}

impl EntityResolver {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            nested: HashMap::new(),
        }
    }

    /// Register the resolver for the relation `name`.
    pub fn nested(mut self, name: impl Into<String>, resolver: Arc<dyn NestedResolver>) -> Self {
        self.nested.insert(name.into(), resolver);
        self
    }

    pub(crate) fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }

    pub(crate) fn get_nested(&self, name: &str) -> Option<&dyn NestedResolver> {
        self.nested.get(name).map(|resolver| resolver.as_ref())
    }
}

impl OperationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the resolver for the entity type `name`.
    pub fn entity(mut self, name: impl Into<String>, resolver: EntityResolver) -> Self {
        self.entities.insert(name.into(), resolver);
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<&EntityResolver> {
        self.entities.get(name)
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the resolvers of the operation `name`.
    pub fn operation(mut self, name: impl Into<String>, resolver: OperationResolver) -> Self {
        self.operations.insert(name.into(), resolver);
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<&OperationResolver> {
        self.operations.get(name)
    }
}

impl fmt::Debug for EntityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nested: Vec<_> = self.nested.keys().collect();
        nested.sort();
        f.debug_struct("EntityResolver")
            .field("nested", &nested)
            .finish()
    }
}

impl fmt::Debug for OperationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entities.iter()).finish()
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.operations.iter()).finish()
    }
}

/// A [`Resolver`] backed by an async function.
pub struct ResolverFn<F>(F);

/// A [`NestedResolver`] backed by an async function.
pub struct NestedResolverFn<F>(F);

/// Build a resolver from an async function of `(args, context)`.
pub fn resolver_fn<F, Fut>(f: F) -> Arc<dyn Resolver>
where
    F: Fn(Value, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    Arc::new(ResolverFn(f))
}

/// Build a nested resolver from an async function of `(parent, args, context)`.
pub fn nested_resolver_fn<F, Fut>(f: F) -> Arc<dyn NestedResolver>
where
    F: Fn(Value, Value, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    Arc::new(NestedResolverFn(f))
}

#[async_trait]
impl<F, Fut> Resolver for ResolverFn<F>
where
    F: Fn(Value, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    async fn invoke(&self, args: Value, context: &Context) -> Result<Value, BoxError> {
        (self.0)(args, context.clone()).await
    }
}

#[async_trait]
impl<F, Fut> NestedResolver for NestedResolverFn<F>
where
    F: Fn(Value, Value, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    async fn invoke(
        &self,
        parent: &Value,
        args: Value,
        context: &Context,
    ) -> Result<Value, BoxError> {
        (self.0)(parent.clone(), args, context.clone()).await
    }
}
