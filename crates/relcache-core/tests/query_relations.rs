mod support;

use pretty_assertions::assert_eq;
use relcache_core::get;
use relcache_core::stmt::WhereClause;
use serde_json::json;
use std_util::prelude::*;
use support::*;

#[test]
fn nested_clause_follows_the_parent_reference() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 10, "author": { "username": "ada" } })),
    );

    assert_eq!(post["author"]["id"], 1);
    assert_eq!(post["author"]["email"], "a@x");
}

#[test]
fn unmatched_has_one_is_null_and_does_not_filter() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 10, "author": { "username": "bob" } })),
    );

    assert_eq!(post["title"], "hello");
    assert_eq!(post["author"], json!(null));
}

#[test]
fn nested_key_that_does_not_exist() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 11, "author": { "id": 99 } })),
    );

    assert_eq!(post["author"], json!(null));
}

#[test]
fn has_many_clause_filters_the_referenced_list() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 10, "comments": { "author": 2 } })),
    );

    let comments = post["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["id"], 100);
    assert_eq!(comments[0]["author"]["username"], "bob");
}

#[test]
fn has_many_clause_without_matches_is_empty() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 10, "comments": { "body": "nope" } })),
    );

    assert_eq!(post["comments"], json!([]));
}

#[test]
fn has_many_list_keeps_listed_order() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 10, "comments": [{ "id": 101 }, { "id": 100 }] })),
    );

    let ids: Vec<_> = post["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|comment| comment["id"].clone())
        .collect();
    assert_eq!(ids, [json!(101), json!(100)]);
}

#[test]
fn list_under_has_one_is_a_query_error() {
    let (model, cache) = blog();

    let err = assert_err!(get(
        &model,
        &cache,
        "post",
        &filter(json!({ "id": 10, "author": [{ "id": 1 }] })),
        None
    ));
    assert!(err.is_invalid_query(), "{err}");
    assert!(err.to_string().contains("`post::author`"));
}

#[test]
fn unmentioned_relations_are_still_expanded() {
    let (model, cache) = blog();

    let post = get_one(
        &model,
        &cache,
        "post",
        filter(json!({ "id": 12, "author": { "id": 2 } })),
    );

    assert_eq!(post["author"]["username"], "bob");
    assert_eq!(post["comments"], json!([]));
    // bob's own posts list comes back to post 12, already in this result.
    assert_eq!(post["author"]["posts"], json!([12]));
}

#[test]
fn missing_foreign_record_stays_a_key() {
    let (model, cache) = blog();

    let cache = relcache_core::normalize(
        &model,
        &cache,
        "post",
        &json!({ "id": 13, "title": "orphan", "author": 42, "comments": [100, 404] }),
    )
    .unwrap();

    let post = get_one(&model, &cache, "post", filter(json!({ "id": 13 })));
    assert_eq!(post["author"], 42);

    let comments = post["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["id"], 100);
}

#[test]
fn back_reference_to_an_ancestor_stays_a_key() {
    let (model, cache) = blog();

    let ada = get_one(&model, &cache, "user", filter(json!({ "id": 1 })));

    assert_eq!(ada["token"]["token"], "t1");
    assert_eq!(ada["token"]["user"], 1);

    let posts = ada["posts"].as_array().unwrap();
    assert_eq!(posts[0]["author"], 1);
    assert_eq!(posts[1]["author"], 1);

    // bob is expanded once, under the first comment that names him.
    let comments = posts[0]["comments"].as_array().unwrap();
    assert_eq!(comments[0]["author"]["username"], "bob");
    assert_eq!(comments[0]["author"]["posts"][0]["title"], "bob's");
    assert_eq!(comments[1]["author"], 1);
}

#[test]
fn nested_clause_under_an_ancestor_reference() {
    let (model, cache) = blog();

    let ada = get_one(
        &model,
        &cache,
        "user",
        filter(json!({ "id": 1, "posts": { "author": { "id": 1 } } })),
    );

    let posts = ada["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["author"]["username"], "ada");
    assert_eq!(posts[1]["author"]["username"], "ada");
}

#[test]
fn each_record_is_expanded_once_per_result() {
    let (model, cache) = crowded_blog(12);

    let start = std::time::Instant::now();
    let user = get_one(&model, &cache, "user", filter(json!({ "id": 1 })));
    let elapsed = start.elapsed();

    // Every record is reachable from user 1 and appears exactly once.
    assert_eq!(count_objects(&serde_json::Value::Object(user.clone())), cache.len());
    assert!(elapsed.as_secs() < 1, "took {elapsed:?}");

    let post = &user["posts"][0];
    assert_eq!(post["author"], 1);
    assert_eq!(post["comments"].as_array().unwrap().len(), 11);
}

#[test]
fn every_top_level_result_is_expanded_on_its_own() {
    let (model, cache) = crowded_blog(4);

    let users = get_many(&model, &cache, "user", WhereClause::new());

    assert_eq!(users.len(), 4);
    for user in &users {
        assert_eq!(count_objects(&serde_json::Value::Object(user.clone())), cache.len());
    }
}
