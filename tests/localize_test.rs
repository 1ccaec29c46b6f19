//! Tests for field localization.

use serde_json::{Value, json};
use spaceq::Error;
use spaceq::localize::{FieldMap, OneOrMany, localize, localize_fields, localize_value};

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn formats_a_single_entry() {
    let item = fields(json!({"title": "Test", "body": "Test content..."}));

    let localized = localize(OneOrMany::One(item), "en-US");

    let OneOrMany::One(entry) = localized else {
        panic!("singleton input should give singleton output");
    };
    assert_eq!(
        serde_json::to_value(entry).unwrap(),
        json!({
            "fields": {
                "title": {"en-US": "Test"},
                "body": {"en-US": "Test content..."}
            }
        })
    );
}

#[test]
fn formats_multiple_entries_in_order() {
    let items = vec![
        fields(json!({"title": "Test"})),
        fields(json!({"title": "Test 2"})),
        fields(json!({"title": "Test 3"})),
    ];

    let localized = localize(OneOrMany::Many(items), "en-US");

    let OneOrMany::Many(entries) = localized else {
        panic!("array input should give array output");
    };
    let titles: Vec<_> = entries
        .iter()
        .map(|e| e.fields["title"]["en-US"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Test"), json!("Test 2"), json!("Test 3")]);
}

#[test]
fn single_element_array_stays_an_array() {
    let localized = localize(
        OneOrMany::Many(vec![fields(json!({"a": 1}))]),
        "en-US",
    );
    assert!(matches!(localized, OneOrMany::Many(ref v) if v.len() == 1));
}

#[test]
fn values_are_wrapped_untouched() {
    let item = fields(json!({
        "tags": ["a", "b"],
        "author": {"sys": {"type": "Link", "id": "42"}},
        "count": 3,
        "draft": null,
    }));

    let entry = localize_fields(&item, "de-DE");

    assert_eq!(entry.fields["tags"], json!({"de-DE": ["a", "b"]}));
    assert_eq!(
        entry.fields["author"],
        json!({"de-DE": {"sys": {"type": "Link", "id": "42"}}})
    );
    assert_eq!(entry.fields["count"], json!({"de-DE": 3}));
    assert_eq!(entry.fields["draft"], json!({"de-DE": null}));
}

#[test]
fn empty_object_gives_empty_fields() {
    let entry = localize_fields(&FieldMap::new(), "en-US");
    assert!(entry.fields.is_empty());
}

#[test]
fn localize_value_keeps_json_shape() {
    let one = localize_value(json!({"title": "x"}), "en-US").unwrap();
    assert_eq!(one, json!({"fields": {"title": {"en-US": "x"}}}));

    let many = localize_value(json!([{"title": "x"}, {"title": "y"}]), "en-US").unwrap();
    assert_eq!(
        many,
        json!([
            {"fields": {"title": {"en-US": "x"}}},
            {"fields": {"title": {"en-US": "y"}}}
        ])
    );
}

#[test]
fn localize_value_rejects_non_objects() {
    assert!(matches!(
        localize_value(json!("title"), "en-US"),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        localize_value(json!([{"ok": 1}, 2]), "en-US"),
        Err(Error::InvalidInput(_))
    ));
}
