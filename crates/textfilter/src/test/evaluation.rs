use serde_json::{json, Value};

use super::{names, people};
use crate::{compile, FaultPolicy, Options};

fn filter<'a>(records: &'a [Value], query: &str, options: &Options) -> Vec<&'a Value> {
    let predicate = compile(query, options);
    records.iter().filter(|r| predicate.matches(*r)).collect()
}

fn matching(query: &str) -> Vec<String> {
    let records = people();
    names(&filter(&records, query, &Options::default()))
}

#[test]
fn free_text_searches_haystack() {
    assert_eq!(matching("Falcon"), vec!["Han Solo"]);
    assert_eq!(matching("Alderaan"), vec!["Leia Organa"]);
    assert!(matching("Tatooine").is_empty());
}

#[test]
fn free_text_fragments_are_alternatives() {
    assert_eq!(matching("Falcon Alderaan"), vec!["Han Solo", "Leia Organa"]);
}

#[test]
fn free_text_matches_emoji() {
    assert_eq!(matching("👑"), vec!["Leia Organa"]);
}

#[test]
fn empty_quoted_free_text_is_ignored() {
    assert_eq!(matching("name:Han \"\""), vec!["Han Solo"]);
    assert_eq!(matching("''").len(), 2);
}

#[test]
fn numbers_equal_booleans_loosely() {
    let records = vec![json!({"name": "on", "active": 1}), json!({"name": "off", "active": 0})];

    let found = filter(&records, "active:true", &Options::default());
    assert_eq!(names(&found), vec!["on"]);

    let found = filter(&records, "active:f", &Options::default());
    assert_eq!(names(&found), vec!["off"]);
}

#[test]
fn empty_query_matches_everything() {
    assert_eq!(matching("").len(), 2);
    assert_eq!(matching("   ").len(), 2);
}

#[test]
fn bare_key_matches_everything() {
    assert_eq!(matching("name:").len(), 2);
    assert_eq!(matching("unknown:").len(), 2);
}

#[test]
fn numeric_comparison() {
    assert_eq!(matching("age:<30"), vec!["Leia Organa"]);
    assert_eq!(matching("age:>=35"), vec!["Han Solo"]);
    assert_eq!(matching("age:=21"), vec!["Leia Organa"]);
    assert_eq!(matching("age:!=21"), vec!["Han Solo"]);
}

#[test]
fn compose_rules() {
    assert_eq!(matching("points:and,<400,>100"), vec!["Han Solo"]);
    assert_eq!(matching("points:or,>400,<100"), vec!["Leia Organa"]);
    assert_eq!(matching("points:&,<400,>100"), vec!["Han Solo"]);
}

#[test]
fn unspecified_operator_on_text_is_substring() {
    assert_eq!(matching("name:Org"), vec!["Leia Organa"]);
}

#[test]
fn unspecified_operator_on_numbers_is_equality() {
    assert_eq!(matching("age:35"), vec!["Han Solo"]);
    assert!(matching("age:3").is_empty());
}

#[test]
fn has_and_not_has_are_complements() {
    assert_eq!(matching("tags:has:other"), vec!["Leia Organa"]);
    assert_eq!(matching("tags:!has:other"), vec!["Han Solo"]);
}

#[test]
fn in_list() {
    assert_eq!(matching("age:in:[21,40]"), vec!["Leia Organa"]);
    assert_eq!(matching("age:!in:[21,40]"), vec!["Han Solo"]);
    assert_eq!(matching("name:\"in:Han Solo,Luke\""), vec!["Han Solo"]);
}

#[test]
fn exists() {
    let records = vec![json!({"name": "a", "email": "a@b.c"}), json!({"name": "b"})];
    let found = filter(&records, "email:?", &Options::default());
    assert_eq!(names(&found), vec!["a"]);
}

#[test]
fn regex_search() {
    assert_eq!(matching("name:/^L.*a$"), vec!["Leia Organa"]);
    assert!(matching("name:/^leia").is_empty());
    assert_eq!(matching("name:i/^leia"), vec!["Leia Organa"]);
    assert_eq!(matching("name:~Solo$"), vec!["Han Solo"]);
}

#[test]
fn invalid_regex_never_matches() {
    assert!(matching("name:/*oops").is_empty());
}

#[test]
fn exclusion() {
    assert_eq!(matching("-name:Han"), vec!["Leia Organa"]);
    assert_eq!(matching("-_:Falcon"), vec!["Leia Organa"]);
}

#[test]
fn additive_conditions_are_alternatives() {
    assert_eq!(
        matching("+name:Han +name:Leia"),
        vec!["Han Solo", "Leia Organa"]
    );
    assert_eq!(matching("+name:Han +name:Leia age:<30"), vec!["Leia Organa"]);
}

#[test]
fn nested_paths() {
    let records = vec![
        json!({"name": "mac", "build_history": {"version": {"number": "1.2-mac"}}}),
        json!({"name": "linux", "build_history": {"version": {"number": "1.2-linux"}}}),
        json!({"name": "bare"}),
    ];

    let found = filter(&records, "build_history.version.number:%mac", &Options::default());
    assert_eq!(names(&found), vec!["mac"]);

    let found = filter(&records, "build_history.version.name:%mac", &Options::default());
    assert!(found.is_empty());
}

#[test]
fn chained_queries_are_all_required() {
    assert_eq!(matching("age:<40 | -name:Han"), vec!["Leia Organa"]);
    assert!(matching("name:Han | name:Leia").is_empty());
}

#[test]
fn ignore_case() {
    let records = people();
    let options = Options::default().with_ignore_case(true);

    assert_eq!(names(&filter(&records, "falcon", &options)), vec!["Han Solo"]);
    assert_eq!(names(&filter(&records, "name:=leia organa", &options)), Vec::<String>::new());
    assert_eq!(
        names(&filter(&records, "name:\"=leia organa\"", &options)),
        vec!["Leia Organa"]
    );
    assert_eq!(names(&filter(&records, "name:/^LEIA", &options)), vec!["Leia Organa"]);
    assert_eq!(names(&filter(&records, "tags:has:OTHER", &options)), vec!["Leia Organa"]);
}

#[test]
fn incompatible_comparisons_follow_fault_policy() {
    let records = people();

    let closed = Options::default();
    assert!(filter(&records, "tags:<3", &closed).is_empty());

    let open = Options::default().with_fault_policy(FaultPolicy::Open);
    assert_eq!(filter(&records, "tags:<3", &open).len(), 2);
}

#[test]
fn missing_field_is_never_a_fault() {
    let records = people();
    let open = Options::default().with_fault_policy(FaultPolicy::Open);
    assert!(filter(&records, "missing:<3", &open).is_empty());
}

#[test]
fn composite_subjects_merge_records() {
    let records = vec![json!({"name": "first", "age": 10}), json!({"age": 50})];
    let predicate = compile("name:first age:>40", &Options::default());

    assert!(predicate.matches(&records));
    assert!(!predicate.matches(&records[0]));
    assert!(predicate.matches(&json!([{"name": "first"}, {"age": 41}])));
}
