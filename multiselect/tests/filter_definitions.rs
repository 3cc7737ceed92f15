use multiselect::{
    FilterError, FilterRegistry, FilterValues, MultiselectFilter, OptionsPayload, RawOptions,
    normalize_options, resolve_selection,
};
use serde_json::{Value, json};

fn registry() -> FilterRegistry {
    FilterRegistry::new()
        .with(
            MultiselectFilter::new(
                "Status",
                RawOptions::from_json(json!({"1": "Active", "2": "Archived"})).unwrap(),
            )
            .placeholder(Some("Pick statuses".to_string()))
            .max(Some(2)),
        )
        .with(
            MultiselectFilter::new("Location", |values: &FilterValues| {
                let mut options = RawOptions::new()
                    .grouped("ams", "Centre", "Amsterdam")
                    .grouped("rtm", "Centre", "Rotterdam");
                let has_status = values
                    .get("status")
                    .and_then(Value::as_array)
                    .is_some_and(|ids| !ids.is_empty());
                if has_status {
                    options = options.grouped("utr", "Station", "Utrecht");
                }
                options
            })
            .async_options(true)
            .group_select(true),
        )
        .with(
            MultiselectFilter::new("Owner", RawOptions::new().label("me", "Me"))
                .single_select(true),
        )
}

#[test]
fn descriptors_carry_options_and_meta() {
    let descriptors = serde_json::to_value(registry().descriptors()).unwrap();
    assert_eq!(
        descriptors[0],
        json!({
            "class": "status",
            "name": "Status",
            "component": "multiselect-filter",
            "options": [{"label": "Active", "value": 1}, {"label": "Archived", "value": 2}],
            "currentValue": "",
            "placeholder": "Pick statuses",
            "max": 2,
        })
    );
    assert_eq!(descriptors[1]["options"], json!([]));
    assert_eq!(descriptors[1]["async"], json!(true));
    assert_eq!(descriptors[2]["singleSelect"], json!(true));
}

#[test]
fn async_options_depend_on_other_filter_values() {
    let registry = registry();

    let without = registry.options_for("location", &FilterValues::new()).unwrap();
    assert_eq!(without.iter_options().count(), 2);

    let mut values = FilterValues::new();
    values.insert("status".to_string(), json!([1]));
    let with = registry.options_for("location", &values).unwrap();
    match &with {
        OptionsPayload::Grouped(groups) => {
            let names: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
            assert_eq!(names, vec!["Amsterdam", "Rotterdam", "Utrecht"]);
        }
        other => panic!("expected grouped options, got {other:?}"),
    }

    let normalized = normalize_options(&with);
    let labels: Vec<&str> = normalized.iter_options().map(|option| option.label.as_str()).collect();
    assert_eq!(labels, vec!["Centre (Amsterdam)", "Centre (Rotterdam)", "Station"]);
}

#[test]
fn unknown_filter_keys_are_errors() {
    match registry().options_for("nope", &FilterValues::new()) {
        Err(FilterError::UnknownFilter { key }) => assert_eq!(key, "nope"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn single_select_filter_resolves_its_bare_value() {
    let registry = registry();
    let owner = registry.get("owner").unwrap();
    assert!(!owner.is_multiselect());

    let options = owner.formatted_options(&FilterValues::new());
    let selected = resolve_selection(&options, &json!("me"), owner.is_single_select());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].label, "Me");
}
