mod engine;
mod evaluation;

use serde_json::{json, Value};

fn people() -> Vec<Value> {
    vec![
        json!({
            "name": "Han Solo",
            "age": 35,
            "points": 250,
            "tags": ["smuggler", "pilot"],
            "haystack": "Han Solo, captain of the Millennium Falcon"
        }),
        json!({
            "name": "Leia Organa",
            "age": 21,
            "points": 50,
            "tags": ["other", "royalty"],
            "haystack": "Leia Organa, princess of Alderaan 👑"
        }),
    ]
}

fn names(records: &[&Value]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r["name"].as_str())
        .map(String::from)
        .collect()
}
