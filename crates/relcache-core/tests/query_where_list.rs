mod support;

use pretty_assertions::assert_eq;
use relcache_core::get;
use relcache_core::stmt::{join, Where, WhereClause};
use serde_json::json;
use std_util::prelude::*;
use support::*;

#[test]
fn duplicates_are_dropped() {
    let (model, cache) = blog();

    let users = get_many(
        &model,
        &cache,
        "user",
        filter(json!([{ "id": 1 }, { "id": 1 }, { "id": 2 }])),
    );

    assert_eq!(ids(&users), [json!(1), json!(2)]);
}

#[test]
fn first_duplicate_wins() {
    let (model, cache) = blog();

    let posts = get_many(
        &model,
        &cache,
        "post",
        filter(json!([
            { "id": 10, "comments": [{ "id": 101 }] },
            { "id": 10 },
        ])),
    );

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["comments"].as_array().unwrap().len(), 1);
}

#[test]
fn missing_records_are_skipped() {
    let (model, cache) = blog();

    let users = get_many(&model, &cache, "user", filter(json!([{ "id": 99 }, { "id": 2 }])));

    assert_eq!(ids(&users), [json!(2)]);
}

#[test]
fn relation_shaped_keys_are_compared_by_resolved_key() {
    let (model, cache) = blog();

    let tokens = get_many(
        &model,
        &cache,
        "token",
        filter(json!([{ "user": { "id": 1 } }, { "user": 1 }])),
    );

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["token"], "t1");
}

#[test]
fn empty_list_is_an_empty_result() {
    let (model, cache) = blog();

    let users = get_many(&model, &cache, "user", Where::List(vec![]));
    assert!(users.is_empty());
}

#[test]
fn entry_without_primary_key_is_a_query_error() {
    let (model, cache) = blog();

    let err = assert_err!(get(
        &model,
        &cache,
        "user",
        &filter(json!([{ "id": 1 }, { "username": "bob" }])),
        None
    ));

    assert!(err.is_invalid_query(), "{err}");
    assert!(err.to_string().contains("entry 1"), "{err}");
}

#[test]
fn join_as_primary_key_is_a_query_error() {
    let (model, cache) = blog();

    let filter = Where::List(vec![WhereClause::new().join("id", join())]);
    let err = assert_err!(get(&model, &cache, "user", &filter, None));

    assert!(err.is_invalid_query(), "{err}");
}
