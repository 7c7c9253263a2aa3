#![allow(dead_code)]

use relcache_core::schema::{create_model, create_table, FieldPrimitive, Model, TableOptions};
use relcache_core::stmt::{Record, Resolved, Value, Where};
use relcache_core::{get, normalize, Cache};
use serde_json::json;

/// `user` has one `token` and many `posts`; a `post` has one `author` and many
/// `comments`; a `comment` has one `author`. `token` is keyed by its `user`.
pub fn blog_model() -> Model {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut user = create_table(
        "user",
        [
            ("id", FieldPrimitive::Number),
            ("username", FieldPrimitive::String),
            ("email", FieldPrimitive::String),
        ],
        TableOptions::default(),
    );
    let mut token = create_table(
        "token",
        [("token", FieldPrimitive::String)],
        TableOptions {
            primary_key: Some("user".to_string()),
        },
    );
    let mut post = create_table(
        "post",
        [("id", FieldPrimitive::Number), ("title", FieldPrimitive::String)],
        TableOptions::default(),
    );
    let mut comment = create_table(
        "comment",
        [("id", FieldPrimitive::Number), ("body", FieldPrimitive::String)],
        TableOptions::default(),
    );

    user.has_one(&token).unwrap().has_many_as(&post, "posts").unwrap();
    token.has_one(&user).unwrap();
    post.has_one_as(&user, "author")
        .unwrap()
        .has_many_as(&comment, "comments")
        .unwrap();
    comment.has_one_as(&user, "author").unwrap();

    create_model([&user, &token, &post, &comment]).unwrap()
}

/// Two users, three posts and two comments.
pub fn blog() -> (Model, Cache) {
    let model = blog_model();
    let cache = Cache::new(&model);

    let cache = normalize(
        &model,
        &cache,
        "user",
        &json!([
            {
                "id": 1,
                "username": "ada",
                "email": "a@x",
                "token": { "user": 1, "token": "t1" },
                "posts": [10, 11],
            },
            { "id": 2, "username": "bob", "email": "b@x", "posts": [12] },
        ]),
    )
    .unwrap();

    let cache = normalize(
        &model,
        &cache,
        "post",
        &json!([
            {
                "id": 10,
                "title": "hello",
                "author": 1,
                "comments": [
                    { "id": 100, "body": "nice", "author": 2 },
                    { "id": 101, "body": "thanks", "author": 1 },
                ],
            },
            { "id": 11, "title": "again", "author": { "id": 1, "username": "ada" } },
            { "id": 12, "title": "bob's", "author": 2, "comments": [] },
        ]),
    )
    .unwrap();

    (model, cache)
}

/// `n` users with one post each; every other user comments once on every
/// post, so each user is reachable from every other one.
pub fn crowded_blog(n: i64) -> (Model, Cache) {
    let model = blog_model();
    let cache = Cache::new(&model);

    let users: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "id": i,
                "username": format!("user{i}"),
                "email": format!("{i}@x"),
                "posts": [100 + i],
            })
        })
        .collect();
    let cache = normalize(&model, &cache, "user", &Value::Array(users)).unwrap();

    let posts: Vec<Value> = (1..=n)
        .map(|i| {
            let comments: Vec<Value> = (1..=n)
                .filter(|j| *j != i)
                .map(|j| json!({ "id": i * 1000 + j, "body": "hi", "author": j }))
                .collect();
            json!({ "id": 100 + i, "title": format!("post{i}"), "author": i, "comments": comments })
        })
        .collect();
    let cache = normalize(&model, &cache, "post", &Value::Array(posts)).unwrap();

    (model, cache)
}

/// Number of JSON objects anywhere inside `value`, `value` included.
pub fn count_objects(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(count_objects).sum::<usize>(),
        Value::Array(items) => items.iter().map(count_objects).sum(),
        _ => 0,
    }
}

pub fn filter(value: Value) -> Where {
    Where::try_from(value).unwrap()
}

pub fn get_one(model: &Model, cache: &Cache, table: &str, filter: impl Into<Where>) -> Record {
    match get(model, cache, table, &filter.into(), None).unwrap() {
        Some(Resolved::One(record)) => record,
        other => panic!("expected a single record; got {other:?}"),
    }
}

pub fn get_many(model: &Model, cache: &Cache, table: &str, filter: impl Into<Where>) -> Vec<Record> {
    match get(model, cache, table, &filter.into(), None).unwrap() {
        Some(Resolved::Many(records)) => records,
        other => panic!("expected a list; got {other:?}"),
    }
}

pub fn ids(records: &[Record]) -> Vec<Value> {
    records.iter().map(|record| record["id"].clone()).collect()
}
