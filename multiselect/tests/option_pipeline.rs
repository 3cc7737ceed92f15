use multiselect::{
    DedupMode, OptionGroup, OptionsPayload, Scalar, SelectOption, find_option, normalize_options,
    normalize_options_with, parse_filter_value, resolve_selection,
};
use serde_json::json;

fn scenario_payload() -> OptionsPayload {
    serde_json::from_value(json!([
        {"label": "A", "values": [{"label": "X", "value": 1}, {"label": "Y", "value": 2}]},
        {"label": "B", "values": [{"label": "X", "value": 3}]},
    ]))
    .expect("scenario payload deserializes")
}

#[test]
fn shared_labels_are_suffixed_and_resolved_with_their_group() {
    let normalized = normalize_options(&scenario_payload());
    let labels: Vec<&str> = normalized.iter_options().map(|option| option.label.as_str()).collect();
    assert_eq!(labels, vec!["X (A)", "Y", "X (B)"]);

    let found = find_option(&normalized, true, &Scalar::from(3)).expect("value 3 resolves");
    assert_eq!(
        serde_json::to_value(&found).unwrap(),
        json!({"label": "X (B)", "value": 3, "group": "B"})
    );
}

#[test]
fn normalized_payload_serializes_in_the_wire_shape() {
    let normalized = normalize_options(&scenario_payload());
    assert_eq!(
        serde_json::to_value(&normalized).unwrap(),
        json!([
            {"label": "A", "values": [{"label": "X (A)", "value": 1}, {"label": "Y", "value": 2}]},
            {"label": "B", "values": [{"label": "X (B)", "value": 3}]},
        ])
    );
}

#[test]
fn flat_payload_with_colliding_labels_is_identity() {
    let raw = json!([
        {"label": "Same", "value": "a"},
        {"label": "Same", "value": "b"},
    ]);
    let payload: OptionsPayload = serde_json::from_value(raw.clone()).unwrap();
    let normalized = normalize_options(&payload);
    assert_eq!(normalized, payload);
    assert_eq!(serde_json::to_value(&normalized).unwrap(), raw);
}

#[test]
fn label_in_two_groups_uses_each_options_own_group() {
    let payload = OptionsPayload::Grouped(vec![
        OptionGroup::new(
            "Posts",
            vec![
                SelectOption::new("Draft", "p-draft"),
                SelectOption::new("Live", "p-live"),
            ],
        ),
        OptionGroup::new("Pages", vec![SelectOption::new("Draft", "g-draft")]),
    ]);
    let normalized = normalize_options(&payload);
    for option in normalized.iter_options().filter(|option| option.label.starts_with("Draft")) {
        let expected = if option.value.as_key().starts_with("p-") {
            "Draft (Posts)"
        } else {
            "Draft (Pages)"
        };
        assert_eq!(option.label, expected);
    }
}

#[test]
fn literal_mode_renames_unique_labels_too() {
    let normalized = normalize_options_with(&scenario_payload(), DedupMode::Always);
    let labels: Vec<&str> = normalized.iter_options().map(|option| option.label.as_str()).collect();
    assert_eq!(labels, vec!["X (A)", "Y (A)", "X (B)"]);
}

#[test]
fn stored_values_of_every_shape_parse_consistently() {
    let expected = Some(vec![Scalar::from(1), Scalar::from(2), Scalar::from(3)]);
    assert_eq!(parse_filter_value(&json!([1, 2, 3])), expected);
    assert_eq!(parse_filter_value(&json!("[1,2,3]")), expected);
    assert_eq!(parse_filter_value(&json!("\"[1,2,3]\"")), expected);
    assert_eq!(parse_filter_value(&json!(null)), None);
    assert_eq!(parse_filter_value(&json!("not json")), None);
    assert_eq!(parse_filter_value(&json!("\"5\"")), None);
}

#[test]
fn numeric_and_string_identifiers_match_each_other() {
    let flat = OptionsPayload::Flat(vec![
        SelectOption::new("One", "1"),
        SelectOption::new("Two", 2),
    ]);
    assert_eq!(find_option(&flat, false, &Scalar::from(1)).unwrap().label, "One");
    assert_eq!(find_option(&flat, false, &Scalar::from("2")).unwrap().label, "Two");
    assert!(find_option(&flat, false, &Scalar::from("missing")).is_none());
}

#[test]
fn double_encoded_selection_resolves_against_grouped_options() {
    let normalized = normalize_options(&scenario_payload());
    let stored = json!(serde_json::to_string(&json!(["3", 2, 42]).to_string()).unwrap());
    let resolved = resolve_selection(&normalized, &stored, false);
    let summary: Vec<(String, Option<String>)> = resolved
        .into_iter()
        .map(|option| (option.label, option.group))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("X (B)".to_string(), Some("B".to_string())),
            ("Y".to_string(), Some("A".to_string())),
        ]
    );
}
