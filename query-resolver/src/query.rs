//! The query document model and its validation.
//!
//! A query document names, per operation, the entities to fetch and the relations to resolve on
//! them:
//!
//! ```json
//! {
//!   "get": {
//!     "me": { "from": "account", "args": { "id": 1 }, "resolve": { "posts": true } }
//!   }
//! }
//! ```
//!
//! Documents coming from the outside are checked once, when converted from JSON, so the
//! execution stages only ever see well formed queries.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::value_kind;
use crate::error::ExecutionError;

/// A query document: operations by name, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct QueryDocument {
    operations: IndexMap<String, Operation>,
}

/// The entity queries of one operation, by query key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Operation {
    entities: IndexMap<String, EntityQuery>,
}

/// What to fetch for one query key, and which relations to resolve on the result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityQuery {
    from: Option<String>,
    args: Option<Value>,
    relations: IndexMap<String, EntityQuery>,
}

impl QueryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation.
    pub fn operation(mut self, name: impl Into<String>, operation: Operation) -> Self {
        self.operations.insert(name.into(), operation);
        self
    }

    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.operations
            .iter()
            .map(|(name, operation)| (name.as_str(), operation))
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity query under `key`, the name its result will appear under.
    pub fn entity(mut self, key: impl Into<String>, query: EntityQuery) -> Self {
        self.entities.insert(key.into(), query);
        self
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, &EntityQuery)> {
        self.entities
            .iter()
            .map(|(key, query)| (key.as_str(), query))
    }
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look the resolver up under `name` instead of the query key or relation name.
    pub fn from(mut self, name: impl Into<String>) -> Self {
        self.from = Some(name.into());
        self
    }

    /// Arguments handed verbatim to the resolver.
    pub fn args(mut self, args: Value) -> Self {
        self.args = Some(args);
        self
    }

    /// Resolve the relation `name` on the fetched entity.
    pub fn relation(mut self, name: impl Into<String>, query: EntityQuery) -> Self {
        self.relations.insert(name.into(), query);
        self
    }

    /// The resolver name: `from` if given, `key` otherwise.
    pub fn lookup_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.from.as_deref().unwrap_or(key)
    }

    /// The resolver arguments, an empty object when none were given.
    pub fn args_or_default(&self) -> Value {
        self.args
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &EntityQuery)> {
        self.relations
            .iter()
            .map(|(name, query)| (name.as_str(), query))
    }

    pub fn has_relations(&self) -> bool {
        !self.relations.is_empty()
    }
}

impl TryFrom<Value> for QueryDocument {
    type Error = ExecutionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let operations = match value {
            Value::Object(operations) if !operations.is_empty() => operations,
            _ => return Err(ExecutionError::EmptyQuery),
        };
        let mut document = QueryDocument::new();
        for (name, operation) in operations {
            let operation = parse_operation(&name, operation)?;
            document.operations.insert(name, operation);
        }
        Ok(document)
    }
}

fn parse_operation(name: &str, value: Value) -> Result<Operation, ExecutionError> {
    let entities = match value {
        Value::Object(entities) => entities,
        other => {
            return Err(ExecutionError::MalformedOperation {
                operation: name.to_string(),
                kind: value_kind(&other),
            })
        }
    };
    let mut operation = Operation::new();
    for (key, query) in entities {
        if query.is_null() {
            return Err(ExecutionError::MissingEntityQuery {
                operation: name.to_string(),
                key,
            });
        }
        let query = parse_entity_query(name, &key, query, &|kind| {
            ExecutionError::MalformedEntityQuery {
                operation: name.to_string(),
                key: key.clone(),
                kind,
            }
        })?;
        operation.entities.insert(key, query);
    }
    Ok(operation)
}

fn parse_entity_query(
    operation: &str,
    key: &str,
    value: Value,
    malformed: &dyn Fn(&'static str) -> ExecutionError,
) -> Result<EntityQuery, ExecutionError> {
    let mut fields = match value {
        // `true` is shorthand for an empty query: `"resolve": { "posts": true }`
        Value::Bool(true) => return Ok(EntityQuery::new()),
        Value::Object(fields) => fields,
        other => return Err(malformed(value_kind(&other))),
    };
    let from = match fields.remove("from") {
        None | Some(Value::Null) => None,
        Some(Value::String(from)) => Some(from),
        Some(other) => return Err(malformed(value_kind(&other))),
    };
    let args = fields.remove("args").filter(|args| !args.is_null());
    let relations = match fields.remove("resolve") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(relations)) => relations,
        Some(other) => return Err(malformed(value_kind(&other))),
    };
    if let Some(field) = fields.keys().next() {
        return Err(ExecutionError::UnknownQueryField {
            operation: operation.to_string(),
            key: key.to_string(),
            field: field.clone(),
        });
    }

    let mut query = EntityQuery {
        from,
        args,
        relations: IndexMap::with_capacity(relations.len()),
    };
    for (relation, nested) in relations {
        let nested = parse_entity_query(operation, &relation, nested, &|kind| {
            ExecutionError::MalformedNestedQuery {
                operation: operation.to_string(),
                relation: relation.clone(),
                kind,
            }
        })?;
        query.relations.insert(relation, nested);
    }
    Ok(query)
}
