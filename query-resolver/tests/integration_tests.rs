use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use query_resolver::execute;
use query_resolver::nested_resolver_fn;
use query_resolver::resolver_fn;
use query_resolver::Context;
use query_resolver::EntityResolver;
use query_resolver::ExecutionError;
use query_resolver::OperationResolver;
use query_resolver::QueryDocument;
use query_resolver::ResolverRegistry;
use serde_json::json;
use serde_json::Value;

fn user_resolver() -> EntityResolver {
    EntityResolver::new(resolver_fn(|args, _| async move {
        Ok(json!({ "id": args["id"], "name": "Ann" }))
    }))
}

async fn run(query: Value, resolvers: &ResolverRegistry) -> Result<Value, ExecutionError> {
    let query = QueryDocument::try_from(query)?;
    let output = execute(&query, resolvers, &Context::default()).await?;
    Ok(Value::Object(output))
}

#[tokio::test]
async fn single_entity() {
    let resolvers = ResolverRegistry::new()
        .operation("get", OperationResolver::new().entity("user", user_resolver()));

    let output = run(json!({ "get": { "user": { "args": { "id": 1 } } } }), &resolvers)
        .await
        .unwrap();
    assert_eq!(output, json!({ "user": { "id": 1, "name": "Ann" } }));
}

#[tokio::test]
async fn nested_relation() {
    let resolvers = ResolverRegistry::new().operation(
        "get",
        OperationResolver::new().entity(
            "user",
            user_resolver().nested(
                "posts",
                nested_resolver_fn(|_, _, _| async { Ok(json!([{ "id": 10 }])) }),
            ),
        ),
    );

    let output = run(
        json!({ "get": { "user": { "args": { "id": 1 }, "resolve": { "posts": true } } } }),
        &resolvers,
    )
    .await
    .unwrap();
    insta::assert_json_snapshot!(output, @r###"
    {
      "user": {
        "id": 1,
        "name": "Ann",
        "posts": [
          {
            "id": 10
          }
        ]
      }
    }
    "###);
}

#[tokio::test]
async fn aliased_entity() {
    let looked_up = Arc::new(AtomicUsize::new(0));
    let counter = looked_up.clone();
    let resolvers = ResolverRegistry::new().operation(
        "get",
        OperationResolver::new().entity(
            "account",
            EntityResolver::new(resolver_fn(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(json!({ "id": 5 })) }
            })),
        ),
    );

    let output = run(json!({ "get": { "me": { "from": "account" } } }), &resolvers)
        .await
        .unwrap();
    assert_eq!(output, json!({ "me": { "id": 5 } }));
    assert_eq!(looked_up.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn array_entities_keep_their_order_and_relations() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let resolvers = ResolverRegistry::new().operation(
        "get",
        OperationResolver::new().entity(
            "users",
            EntityResolver::new(resolver_fn(|_, _| async {
                Ok(json!([{ "id": 1 }, { "id": 2 }]))
            }))
            .nested(
                "roles",
                nested_resolver_fn(move |parent, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async move {
                        Ok(match parent["id"].as_u64() {
                            Some(2) => json!(["admin"]),
                            _ => json!([]),
                        })
                    }
                }),
            ),
        ),
    );

    let output = run(
        json!({ "get": { "users": { "resolve": { "roles": true } } } }),
        &resolvers,
    )
    .await
    .unwrap();
    assert_eq!(
        output,
        json!({ "users": [{ "id": 1, "roles": [] }, { "id": 2, "roles": ["admin"] }] })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_operation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let resolvers = ResolverRegistry::new().operation(
        "get",
        OperationResolver::new().entity(
            "user",
            EntityResolver::new(resolver_fn(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(json!({})) }
            })),
        ),
    );

    let error = run(
        json!({ "delete": { "user": { "args": { "id": 1 } } } }),
        &resolvers,
    )
    .await
    .unwrap_err();
    let message = error.to_string();
    assert!(message.contains("delete"));
    assert!(message.contains("resolver"));
    assert!(matches!(error, ExecutionError::UnknownOperation { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_nested_resolver() {
    let resolvers = ResolverRegistry::new()
        .operation("get", OperationResolver::new().entity("user", user_resolver()));

    let error = run(
        json!({ "get": { "user": { "args": { "id": 1 }, "resolve": { "posts": true } } } }),
        &resolvers,
    )
    .await
    .unwrap_err();
    insta::assert_snapshot!(error.to_string(), @r###"
    no nested resolver 'posts' registered under resolver 'user' for relation 'posts' in operation 'get'.

    Nested relations are resolved by the parent's resolver, invoked with (parent, args, context):

        EntityResolver::new(..)
            .nested("posts", nested_resolver_fn(|parent, args, context| async move { .. }))

    registered as "user" under operation "get".
    "###);
}

#[tokio::test]
async fn missing_entity_resolver() {
    let resolvers = ResolverRegistry::new()
        .operation("get", OperationResolver::new().entity("user", user_resolver()));

    let error = run(json!({ "get": { "me": { "from": "account" } } }), &resolvers)
        .await
        .unwrap_err();
    insta::assert_snapshot!(error.to_string(), @r###"
    no resolver 'account' registered for 'me' in operation 'get'.

    Each entity of an operation needs a resolver invoked with (args, context):

        OperationResolver::new()
            .entity("account", EntityResolver::new(resolver_fn(|args, context| async move { .. })))

    registered under operation "get".
    "###);
}

#[tokio::test]
async fn executions_are_repeatable() {
    let resolvers = ResolverRegistry::new().operation(
        "get",
        OperationResolver::new().entity(
            "user",
            user_resolver().nested(
                "friends",
                nested_resolver_fn(|parent, args, _| async move {
                    Ok(json!([{ "of": parent["id"], "first": args["first"] }]))
                }),
            ),
        ),
    );
    let query = json!({ "get": {
        "user": { "args": { "id": 3 }, "resolve": { "friends": { "args": { "first": 2 } } } }
    } });

    let first = run(query.clone(), &resolvers).await.unwrap();
    let second = run(query, &resolvers).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["user"]["friends"], json!([{ "of": 3, "first": 2 }]));
}

#[tokio::test]
async fn malformed_documents_fail_before_resolution() {
    let resolvers = ResolverRegistry::new()
        .operation("get", OperationResolver::new().entity("user", user_resolver()));

    let error = run(json!({ "get": { "user": 42 } }), &resolvers)
        .await
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "entity query 'user' of operation 'get' must be an object, found number"
    );
}
