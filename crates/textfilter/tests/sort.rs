use serde_json::{json, Value};
use textfilter::{dig, dig_sort, dig_sort_many};

#[test]
fn dig_resolves_paths() {
    let record = json!({"a": {"b": {"c": 3}}, "items": [{"name": "x"}], "nothing": null});

    assert_eq!(dig(&record, "a.b.c"), Some(&json!(3)));
    assert_eq!(dig(&record, "items.0.name"), Some(&json!("x")));
    assert_eq!(dig(&record, "a.b.d"), None);
    assert_eq!(dig(&record, "a.b.c.d"), None);
    assert_eq!(dig(&record, "nothing"), None);
}

#[test]
fn sort_dates_as_strings() {
    let mut records = vec![
        json!({"start": "2017-11-02"}),
        json!({"start": "2017-01-20"}),
        json!({"start": "2017-06-05"}),
    ];

    dig_sort(&mut records, "start", false);

    let starts: Vec<&str> = records.iter().filter_map(|r| r["start"].as_str()).collect();
    assert_eq!(starts, vec!["2017-01-20", "2017-06-05", "2017-11-02"]);
}

#[test]
fn reverse_sort_orders_descending() {
    let mut records: Vec<Value> = [17, 4, 9000, 230, 4, 56]
        .iter()
        .map(|rank| json!({ "rank": rank }))
        .collect();

    dig_sort(&mut records, "rank", true);

    let ranks: Vec<i64> = records.iter().filter_map(|r| r["rank"].as_i64()).collect();
    assert_eq!(ranks, vec![9000, 230, 56, 17, 4, 4]);
}

#[test]
fn sort_many_keeps_earlier_keys_significant() {
    let mut records = vec![
        json!({"group": "b", "rank": 1}),
        json!({"group": "a", "rank": 2}),
        json!({"group": "b"}),
        json!({"group": "a", "rank": 1}),
    ];

    dig_sort_many(&mut records, &["group", "rank"]);

    assert_eq!(
        records,
        vec![
            json!({"group": "a", "rank": 1}),
            json!({"group": "a", "rank": 2}),
            json!({"group": "b", "rank": 1}),
            json!({"group": "b"}),
        ]
    );
}
