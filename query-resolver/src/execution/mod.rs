//! Executes a query document against a resolver registry.
//!
//! Execution walks the document top down: every operation is matched with its
//! [`OperationResolver`], every entity of the operation is resolved by the root stage, and the
//! nested stage then attaches the declared relations, recursively, to what the root stage
//! returned.
mod nested;
mod root;

use futures::future::try_join_all;
use tracing::Instrument;

use crate::configuration::Configuration;
use crate::configuration::RootResolution;
use crate::error::ExecutionError;
use crate::query::Operation;
use crate::query::QueryDocument;
use crate::registry::OperationResolver;
use crate::registry::ResolverRegistry;
use crate::trace::trace;
use crate::Context;
use crate::Object;

pub(crate) const OPERATION_SPAN_NAME: &str = "resolve_operation";
pub(crate) const ENTITY_SPAN_NAME: &str = "resolve_entity";
pub(crate) const RELATION_SPAN_NAME: &str = "resolve_relation";

/// Execute `query` with the default [`Configuration`].
///
/// See [`Executor::execute`].
pub async fn execute(
    query: &QueryDocument,
    resolvers: &ResolverRegistry,
    context: &Context,
) -> Result<Object, ExecutionError> {
    Executor::default().execute(query, resolvers, context).await
}

/// Resolves query documents.
///
/// An executor holds no state between executions and can be shared freely.
#[derive(Clone, Debug, Default)]
pub struct Executor {
    configuration: Configuration,
}

// holds the arguments that do not change while an operation is resolved
pub(crate) struct ExecutionParameters<'a> {
    pub(crate) operation: &'a str,
    pub(crate) resolvers: &'a OperationResolver,
    pub(crate) context: &'a Context,
}

impl Executor {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }

    /// Resolve every entity of every operation of `query` and return them by query key.
    ///
    /// Entities returned by resolvers are owned by the output; attaching relations never touches
    /// data the resolvers keep. Any failure, including a resolver failure, fails the whole
    /// execution: there are no partial results.
    pub async fn execute(
        &self,
        query: &QueryDocument,
        resolvers: &ResolverRegistry,
        context: &Context,
    ) -> Result<Object, ExecutionError> {
        if query.is_empty() {
            return Err(ExecutionError::EmptyQuery);
        }

        // every operation must be registered before any resolver runs
        let operations = query
            .operations()
            .map(|(name, operation)| {
                resolvers
                    .get(name)
                    .map(|resolvers| (name, operation, resolvers))
                    .ok_or_else(|| ExecutionError::unknown_operation(name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut output = Object::new();
        for (name, operation, operation_resolvers) in operations {
            trace!(context, 0, "operation '{}'", name);
            let parameters = ExecutionParameters {
                operation: name,
                resolvers: operation_resolvers,
                context,
            };
            self.execute_operation(&parameters, operation, &mut output)
                .instrument(tracing::info_span!(
                    OPERATION_SPAN_NAME,
                    "operation.name" = name,
                    "otel.kind" = "INTERNAL"
                ))
                .await?;
        }
        Ok(output)
    }

    async fn execute_operation(
        &self,
        parameters: &ExecutionParameters<'_>,
        operation: &Operation,
        output: &mut Object,
    ) -> Result<(), ExecutionError> {
        match self.configuration.root_resolution() {
            RootResolution::Sequential => {
                for (key, query) in operation.entities() {
                    let value = root::resolve_entity(parameters, key, query).await?;
                    output.insert(key.to_string(), value);
                }
            }
            RootResolution::Concurrent => {
                let values = try_join_all(
                    operation
                        .entities()
                        .map(|(key, query)| root::resolve_entity(parameters, key, query)),
                )
                .await?;
                for ((key, _), value) in operation.entities().zip(values) {
                    output.insert(key.to_string(), value);
                }
            }
        }
        Ok(())
    }
}
