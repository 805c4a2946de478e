use futures::future::try_join_all;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::Instrument;

use super::ExecutionParameters;
use super::RELATION_SPAN_NAME;
use crate::error::value_kind;
use crate::error::ExecutionError;
use crate::query::EntityQuery;
use crate::registry::NestedResolver;
use crate::trace::trace;

/// Attach every relation declared by `query` to `parent`, produced by the resolver `parent_name`.
///
/// An array parent has the relations attached to each of its elements. Relations are resolved
/// one after the other, the elements of an array concurrently.
pub(super) fn resolve_relations<'a>(
    parameters: &'a ExecutionParameters<'a>,
    parent: &'a mut Value,
    parent_name: &'a str,
    query: &'a EntityQuery,
    depth: usize,
) -> BoxFuture<'a, Result<(), ExecutionError>> {
    Box::pin(async move {
        for (relation, nested_query) in query.relations() {
            resolve_relation(
                parameters,
                &mut *parent,
                parent_name,
                relation,
                nested_query,
                depth,
            )
            .instrument(tracing::info_span!(
                RELATION_SPAN_NAME,
                "relation.name" = relation,
                "relation.parent" = parent_name,
                "otel.kind" = "INTERNAL"
            ))
            .await?;
        }
        Ok(())
    })
}

async fn resolve_relation(
    parameters: &ExecutionParameters<'_>,
    parent: &mut Value,
    parent_name: &str,
    relation: &str,
    query: &EntityQuery,
    depth: usize,
) -> Result<(), ExecutionError> {
    let parents: Vec<&mut Value> = match parent {
        Value::Array(elements) => elements.iter_mut().collect(),
        single => vec![single],
    };
    if parents.is_empty() {
        trace!(parameters.context, depth, "no parent for '{}'", relation);
        return Ok(());
    }

    let parent_resolver = parameters.resolvers.get(parent_name).ok_or_else(|| {
        ExecutionError::MissingParentResolver {
            operation: parameters.operation.to_string(),
            resolver: parent_name.to_string(),
        }
    })?;
    let resolver_name = query.lookup_name(relation);
    let nested_resolver = parent_resolver.get_nested(resolver_name).ok_or_else(|| {
        ExecutionError::missing_nested_resolver(
            parameters.operation,
            relation,
            resolver_name,
            parent_name,
        )
    })?;

    trace!(
        parameters.context,
        depth,
        "resolving '{}' with nested resolver '{}' of '{}' for {} parent(s)",
        relation,
        resolver_name,
        parent_name,
        parents.len()
    );
    let relation = Relation {
        name: relation,
        resolver_name,
        parent_name,
        resolver: nested_resolver,
        query,
        depth,
    };
    try_join_all(
        parents
            .into_iter()
            .map(|parent| relation.attach(parameters, parent)),
    )
    .await?;
    Ok(())
}

/// One relation being attached to a batch of parents.
struct Relation<'a> {
    name: &'a str,
    resolver_name: &'a str,
    parent_name: &'a str,
    resolver: &'a dyn NestedResolver,
    query: &'a EntityQuery,
    depth: usize,
}

impl Relation<'_> {
    /// Resolve the relation for `parent` and store it under the relation name.
    ///
    /// A `null` parent is resolved like any other but has nowhere to store the result, and stays
    /// `null`.
    async fn attach(
        &self,
        parameters: &ExecutionParameters<'_>,
        parent: &mut Value,
    ) -> Result<(), ExecutionError> {
        let mut related = self
            .resolver
            .invoke(parent, self.query.args_or_default(), parameters.context)
            .await
            .map_err(ExecutionError::Resolver)?;

        if self.query.has_relations() {
            resolve_relations(
                parameters,
                &mut related,
                self.resolver_name,
                self.query,
                self.depth + 1,
            )
            .await?;
        }

        match parent {
            Value::Object(fields) => {
                fields.insert(self.name.to_string(), related);
                Ok(())
            }
            Value::Null => Ok(()),
            other => Err(ExecutionError::NonObjectParent {
                operation: parameters.operation.to_string(),
                relation: self.name.to_string(),
                parent: self.parent_name.to_string(),
                kind: value_kind(other),
            }),
        }
    }
}
