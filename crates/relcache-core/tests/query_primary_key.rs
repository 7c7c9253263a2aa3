mod support;

use pretty_assertions::assert_eq;
use relcache_core::stmt::{Value, WhereClause};
use relcache_core::{get, Cache};
use serde_json::json;
use std_util::prelude::*;
use support::*;

#[test]
fn lookup_expands_every_relation() {
    let (model, cache) = blog();

    let bob = get_one(&model, &cache, "user", filter(json!({ "id": 2 })));

    assert_eq!(
        Value::Object(bob),
        json!({
            "id": 2,
            "username": "bob",
            "email": "b@x",
            "posts": [
                // `author` points back at the user being resolved.
                { "id": 12, "title": "bob's", "author": 2, "comments": [] },
            ],
        })
    );
}

#[test]
fn missing_key_is_none() {
    let (model, cache) = blog();

    let found = assert_ok!(get(&model, &cache, "user", &filter(json!({ "id": 99 })), None));
    assert_none!(found);
}

#[test]
fn keys_compare_by_type() {
    let (model, cache) = blog();

    let found = assert_ok!(get(&model, &cache, "user", &filter(json!({ "id": "2" })), None));
    assert_none!(found);
}

#[test]
fn null_key_is_none() {
    let (model, cache) = blog();

    let found = assert_ok!(get(&model, &cache, "user", &filter(json!({ "id": null })), None));
    assert_none!(found);
}

#[test]
fn stale_conditions_are_ignored_when_keyed() {
    let (model, cache) = blog();

    let bob = get_one(
        &model,
        &cache,
        "user",
        filter(json!({ "id": 2, "username": "someone else" })),
    );
    assert_eq!(bob["username"], "bob");
}

#[test]
fn lookup_on_empty_cache_is_none() {
    let model = blog_model();
    let cache = Cache::new(&model);

    let found = assert_ok!(get(&model, &cache, "post", &WhereClause::new().eq("id", 10).into(), None));
    assert_none!(found);
}

#[test]
fn relation_shaped_key() {
    let (model, cache) = blog();

    let token = get_one(&model, &cache, "token", filter(json!({ "user": { "id": 1 } })));

    assert_eq!(token["token"], "t1");
    assert_eq!(token["user"]["username"], "ada");
    // The user's own `token` field refers back to the token being resolved.
    assert_eq!(token["user"]["token"], 1);
}

#[test]
fn relation_shaped_key_as_scalar() {
    let (model, cache) = blog();

    let token = get_one(&model, &cache, "token", filter(json!({ "user": 1 })));

    assert_eq!(token["token"], "t1");
    assert_eq!(token["user"]["email"], "a@x");
}

#[test]
fn unknown_table_is_a_query_error() {
    let (model, cache) = blog();

    let err = assert_err!(get(&model, &cache, "nope", &filter(json!({ "id": 1 })), None));
    assert!(err.is_invalid_query(), "{err}");
    assert!(err.to_string().contains("`nope`"));
}
