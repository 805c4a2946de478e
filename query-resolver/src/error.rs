//! Execution errors.
use displaydoc::Display;
use serde_json::Value;
use thiserror::Error;
use tower::BoxError;

/// Error types for query execution.
///
/// Every variant except [`ExecutionError::Resolver`] is raised by the engine itself, before the
/// resolver of the offending node is invoked. Resolver failures are passed through untouched.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum ExecutionError {
    /// the query document must contain at least one operation
    EmptyQuery,

    /// operation '{operation}' must be an object of entity queries, found {kind}
    MalformedOperation {
        /// The operation name.
        operation: String,
        /// The kind of value found instead.
        kind: &'static str,
    },

    /// operation '{operation}' is missing the entity query for '{key}'
    MissingEntityQuery {
        /// The operation name.
        operation: String,
        /// The query key without a query.
        key: String,
    },

    /// entity query '{key}' of operation '{operation}' must be an object, found {kind}
    MalformedEntityQuery {
        /// The operation name.
        operation: String,
        /// The query key.
        key: String,
        /// The kind of value found instead.
        kind: &'static str,
    },

    /// nested query '{relation}' of operation '{operation}' must be an object, found {kind}
    MalformedNestedQuery {
        /// The operation name.
        operation: String,
        /// The relation name.
        relation: String,
        /// The kind of value found instead.
        kind: &'static str,
    },

    /// no resolver registered for operation '{operation}'{remediation}
    UnknownOperation {
        /// The operation without a resolver.
        operation: String,
        /// Canonical description of the expected registration.
        remediation: String,
    },

    /// no resolver '{resolver}' registered for '{key}' in operation '{operation}'{remediation}
    MissingResolver {
        /// The operation name.
        operation: String,
        /// The query key being resolved.
        key: String,
        /// The name the resolver was looked up with.
        resolver: String,
        /// Canonical description of the expected registration.
        remediation: String,
    },

    /// resolver '{resolver}' is not registered in operation '{operation}' but has nested relations to resolve
    MissingParentResolver {
        /// The operation name.
        operation: String,
        /// The parent resolver name.
        resolver: String,
    },

    /// no nested resolver '{resolver}' registered under resolver '{parent}' for relation '{relation}' in operation '{operation}'{remediation}
    MissingNestedResolver {
        /// The operation name.
        operation: String,
        /// The relation declared by the query.
        relation: String,
        /// The name the nested resolver was looked up with.
        resolver: String,
        /// The resolver whose nested map was consulted.
        parent: String,
        /// Canonical description of the expected registration.
        remediation: String,
    },

    /// query '{key}' of operation '{operation}' has unknown field '{field}', expected `from`, `args` or `resolve`
    UnknownQueryField {
        /// The operation name.
        operation: String,
        /// The query key or relation name.
        key: String,
        /// The unrecognized field.
        field: String,
    },

    /// cannot attach relation '{relation}' of operation '{operation}' to {kind} returned by resolver '{parent}'
    NonObjectParent {
        /// The operation name.
        operation: String,
        /// The relation being attached.
        relation: String,
        /// The resolver that produced the parent.
        parent: String,
        /// The kind of the parent value.
        kind: &'static str,
    },

    /// {0}
    Resolver(#[source] BoxError),
}

impl ExecutionError {
    /// A stable, machine readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutionError::EmptyQuery => "EMPTY_QUERY",
            ExecutionError::MalformedOperation { .. } => "MALFORMED_OPERATION",
            ExecutionError::MissingEntityQuery { .. } => "MISSING_ENTITY_QUERY",
            ExecutionError::MalformedEntityQuery { .. } => "MALFORMED_ENTITY_QUERY",
            ExecutionError::MalformedNestedQuery { .. } => "MALFORMED_NESTED_QUERY",
            ExecutionError::UnknownQueryField { .. } => "UNKNOWN_QUERY_FIELD",
            ExecutionError::UnknownOperation { .. } => "UNKNOWN_OPERATION",
            ExecutionError::MissingResolver { .. } => "MISSING_RESOLVER",
            ExecutionError::MissingParentResolver { .. } => "MISSING_PARENT_RESOLVER",
            ExecutionError::MissingNestedResolver { .. } => "MISSING_NESTED_RESOLVER",
            ExecutionError::NonObjectParent { .. } => "NON_OBJECT_PARENT",
            ExecutionError::Resolver(_) => "RESOLVER_FAILED",
        }
    }

    /// Returns the original resolver failure, if this error came from a resolver.
    pub fn into_resolver_error(self) -> Option<BoxError> {
        match self {
            ExecutionError::Resolver(error) => Some(error),
            _ => None,
        }
    }

    pub(crate) fn unknown_operation(operation: &str) -> Self {
        ExecutionError::UnknownOperation {
            operation: operation.to_string(),
            remediation: remediation::operation(operation),
        }
    }

    pub(crate) fn missing_resolver(operation: &str, key: &str, resolver: &str) -> Self {
        ExecutionError::MissingResolver {
            operation: operation.to_string(),
            key: key.to_string(),
            resolver: resolver.to_string(),
            remediation: remediation::entity(operation, resolver),
        }
    }

    pub(crate) fn missing_nested_resolver(
        operation: &str,
        relation: &str,
        resolver: &str,
        parent: &str,
    ) -> Self {
        ExecutionError::MissingNestedResolver {
            operation: operation.to_string(),
            relation: relation.to_string(),
            resolver: resolver.to_string(),
            parent: parent.to_string(),
            remediation: remediation::nested(operation, parent, resolver),
        }
    }
}

/// The name of a JSON value's kind, as used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// The remediation messages show the registration the caller is expected to write.
mod remediation {
    pub(super) fn operation(operation: &str) -> String {
        format!(
            r#".

The resolver registry needs an entry for the operation, keyed by entity type name:

    ResolverRegistry::new().operation(
        "{operation}",
        OperationResolver::new()
            .entity("<entity>", EntityResolver::new(resolver_fn(|args, context| async move {{ .. }}))),
    )"#
        )
    }

    pub(super) fn entity(operation: &str, resolver: &str) -> String {
        format!(
            r#".

Each entity of an operation needs a resolver invoked with (args, context):

    OperationResolver::new()
        .entity("{resolver}", EntityResolver::new(resolver_fn(|args, context| async move {{ .. }})))

registered under operation "{operation}"."#
        )
    }

    pub(super) fn nested(operation: &str, parent: &str, resolver: &str) -> String {
        format!(
            r#".

Nested relations are resolved by the parent's resolver, invoked with (parent, args, context):

    EntityResolver::new(..)
        .nested("{resolver}", nested_resolver_fn(|parent, args, context| async move {{ .. }}))

registered as "{parent}" under operation "{operation}"."#
        )
    }
}
