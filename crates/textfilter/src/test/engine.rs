use std::sync::Arc;

use serde_json::json;

use super::{names, people};
use crate::{Engine, Options, Settings};

#[test]
fn cached_compile_returns_same_predicate() {
    let engine = Engine::default();

    let first = engine.compile_cached("age:<30");
    let second = engine.compile_cached("age:<30");
    let other = engine.compile_cached("age:>30");

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(engine.cached_predicates(), 2);
}

#[test]
fn uncached_compile_does_not_fill_predicate_cache() {
    let engine = Engine::default();
    let predicate = engine.compile("name:/^Han");

    assert_eq!(predicate.query(), "name:/^Han");
    assert_eq!(engine.cached_predicates(), 0);
    assert_eq!(engine.cached_regexes(), 1);
}

#[test]
fn regexes_are_shared_between_queries() {
    let engine = Engine::default();
    engine.compile_cached("name:/^Han");
    engine.compile_cached("name:/^Han age:>3");

    assert_eq!(engine.cached_predicates(), 2);
    assert_eq!(engine.cached_regexes(), 1);
}

#[test]
fn invalid_regex_is_not_cached() {
    let engine = Engine::default();
    engine.compile("name:/*oops");
    assert_eq!(engine.cached_regexes(), 0);
}

#[test]
fn bounded_predicate_cache() {
    let engine = Engine::new(Options::default().with_cache_capacity(1));
    engine.compile_cached("a");
    engine.compile_cached("b");
    assert_eq!(engine.cached_predicates(), 1);

    engine.clear_caches();
    assert_eq!(engine.cached_predicates(), 0);
}

#[test]
fn search_keeps_record_order() {
    let records = people();
    let engine = Engine::default();

    assert_eq!(
        names(&engine.search(&records, "Organa Solo")),
        vec!["Han Solo", "Leia Organa"]
    );
}

#[test]
fn search_and_sort_descending() {
    let records = vec![
        json!({"name": "a", "age": 12}),
        json!({"name": "b"}),
        json!({"name": "c", "age": 40}),
        json!({"name": "d", "age": 7}),
    ];
    let engine = Engine::default();

    let found = engine.search_and_sort(&records, "age::desc");
    assert_eq!(names(&found), vec!["c", "a", "d", "b"]);

    let found = engine.search_and_sort(&records, "age:>10 age::asc");
    assert_eq!(names(&found), vec!["a", "c"]);
}

#[test]
fn engine_tokenize_uses_options() {
    let engine = Engine::new(Options::default().with_haystack_key("text"));
    let tokens = engine.tokenize("hello");
    assert_eq!(tokens[0][0].key, "text");
}

#[test]
fn tokenize_splits_chains() {
    let engine = Engine::default();
    let chain = engine.tokenize("name:han | age:>3");

    assert_eq!(chain.len(), 2);
    let rendered: Vec<Vec<String>> = chain
        .iter()
        .map(|tokens| tokens.iter().map(|t| t.to_string()).collect())
        .collect();
    assert_eq!(
        rendered,
        vec![
            vec!["name:han".to_string(), "haystack:".to_string()],
            vec!["age:>3".to_string(), "haystack:".to_string()],
        ]
    );
    assert!(engine.tokenize("").is_empty());
}

#[test]
fn settings_aliases_rename_keys() {
    let mut settings = Settings::default();
    settings.aliases.insert("years".into(), "age".into());

    let engine = Engine::new(Options::from_settings(settings));
    let records = people();

    assert_eq!(names(&engine.search(&records, "years:<30")), vec!["Leia Organa"]);
}

#[test]
fn engine_is_shareable_between_threads() {
    let engine = Arc::new(Engine::default());
    let records = Arc::new(people());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            let records = records.clone();
            std::thread::spawn(move || engine.search(&records, "age:<30").len())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
    assert_eq!(engine.cached_predicates(), 1);
}
