use serde_json::Value;
use tracing::Instrument;

use super::nested;
use super::ExecutionParameters;
use super::ENTITY_SPAN_NAME;
use crate::error::ExecutionError;
use crate::query::EntityQuery;
use crate::trace::trace;

/// Resolve the entity queried under `key`, relations included.
///
/// The resolver is looked up under the query's `from` name if it has one, the output always
/// uses `key`.
pub(super) async fn resolve_entity(
    parameters: &ExecutionParameters<'_>,
    key: &str,
    query: &EntityQuery,
) -> Result<Value, ExecutionError> {
    let resolver_name = query.lookup_name(key);
    let entity_resolver = parameters.resolvers.get(resolver_name).ok_or_else(|| {
        ExecutionError::missing_resolver(parameters.operation, key, resolver_name)
    })?;

    async {
        trace!(
            parameters.context,
            1,
            "resolving '{}' with resolver '{}'",
            key,
            resolver_name
        );
        let mut entity = entity_resolver
            .resolver()
            .invoke(query.args_or_default(), parameters.context)
            .await
            .map_err(ExecutionError::Resolver)?;
        tracing::trace!("resolver '{}' returned {}", resolver_name, entity);

        nested::resolve_relations(parameters, &mut entity, resolver_name, query, 2).await?;
        Ok(entity)
    }
    .instrument(tracing::info_span!(
        ENTITY_SPAN_NAME,
        "entity.key" = key,
        "entity.resolver" = resolver_name,
        "otel.kind" = "INTERNAL"
    ))
    .await
}
