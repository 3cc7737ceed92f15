//! Building option payloads from developer-supplied label mappings.
//!
//! Filters declare their options as an ordered `key => label` mapping, or as
//! `key => { label, group }` when the options should be grouped. This module
//! turns that mapping into the [`OptionsPayload`] the UI consumes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::errors::{FilterError, json_kind};
use crate::types::{OptionGroup, OptionsPayload, Scalar, SelectOption};

/// Keys that look like canonical decimal integers become numeric identifiers.
static INTEGER_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|-?[1-9][0-9]*)$").expect("valid integer key pattern"));

/// One entry of a raw option mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    Label(String),
    Entry { label: String, group: Option<String> },
}

impl RawEntry {
    pub fn label(&self) -> &str {
        match self {
            RawEntry::Label(label) | RawEntry::Entry { label, .. } => label,
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, String> {
        match value {
            JsonValue::String(label) => Ok(RawEntry::Label(label)),
            JsonValue::Number(number) => {
                Ok(RawEntry::Label(Scalar::Number(number).as_key().into_owned()))
            }
            JsonValue::Object(mut fields) => {
                let label = text_field(fields.remove("label"), "label")?.unwrap_or_default();
                let group = text_field(fields.remove("group"), "group")?;
                Ok(RawEntry::Entry { label, group })
            }
            other => Err(format!(
                "option entry must be a label or an object, found {}",
                json_kind(&other)
            )),
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            RawEntry::Label(label) => JsonValue::String(label.clone()),
            RawEntry::Entry { label, group } => {
                let mut fields = Map::new();
                fields.insert("label".to_string(), JsonValue::String(label.clone()));
                if let Some(group) = group {
                    fields.insert("group".to_string(), JsonValue::String(group.clone()));
                }
                JsonValue::Object(fields)
            }
        }
    }
}

/// Ordered `key => entry` mapping as declared by a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions {
    entries: Vec<(Scalar, RawEntry)>,
}

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flat `key => label` entry.
    pub fn label(mut self, key: impl Into<Scalar>, label: impl Into<String>) -> Self {
        self.entries.push((key.into(), RawEntry::Label(label.into())));
        self
    }

    /// Adds a `key => { label, group }` entry.
    pub fn grouped(
        mut self,
        key: impl Into<Scalar>,
        label: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        self.entries.push((
            key.into(),
            RawEntry::Entry {
                label: label.into(),
                group: Some(group.into()),
            },
        ));
        self
    }

    pub fn push(&mut self, key: Scalar, entry: RawEntry) {
        self.entries.push((key, entry));
    }

    pub fn entries(&self) -> &[(Scalar, RawEntry)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A mapping is grouped as soon as one entry is structured.
    pub fn is_grouped(&self) -> bool {
        self.entries.iter().any(|(_, entry)| matches!(entry, RawEntry::Entry { .. }))
    }

    pub fn from_json(raw: JsonValue) -> Result<Self, FilterError> {
        let fields = match raw {
            JsonValue::Null => return Ok(Self::default()),
            JsonValue::Object(fields) => fields,
            other => {
                return Err(FilterError::invalid_options(format!(
                    "expected an object mapping keys to labels, found {}",
                    json_kind(&other)
                )));
            }
        };
        let mut options = Self::default();
        for (key, value) in fields {
            let entry = RawEntry::from_json(value)
                .map_err(|err| FilterError::invalid_options(format!("key '{key}': {err}")))?;
            options.push(parse_key(key), entry);
        }
        Ok(options)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FilterError> {
        Self::from_json(serde_json::from_str(raw)?)
    }
}

fn text_field(value: Option<JsonValue>, name: &str) -> Result<Option<String>, String> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(text)) => Ok(Some(text)),
        Some(JsonValue::Number(number)) => Ok(Some(Scalar::Number(number).as_key().into_owned())),
        Some(other) => Err(format!("entry {name} must be a string, found {}", json_kind(&other))),
    }
}

fn parse_key(key: String) -> Scalar {
    if INTEGER_KEY.is_match(&key)
        && let Ok(number) = key.parse::<i64>()
    {
        return Scalar::from(number);
    }
    Scalar::Text(key)
}

impl Serialize for RawOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut fields = Map::new();
        for (key, entry) in &self.entries {
            fields.insert(key.as_key().into_owned(), entry.to_json());
        }
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawOptions::from_json(JsonValue::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

/// Converts a raw mapping into the payload shown by the filter.
///
/// Grouped mappings are bucketed by group name in order of first appearance;
/// entries without a group share the group named `""`.
pub fn format_options(raw: &RawOptions) -> OptionsPayload {
    if !raw.is_grouped() {
        return OptionsPayload::Flat(
            raw.entries
                .iter()
                .map(|(key, entry)| SelectOption::new(entry.label(), key.clone()))
                .collect(),
        );
    }

    let mut groups: Vec<OptionGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (key, entry) in &raw.entries {
        let group_label = match entry {
            RawEntry::Entry { group: Some(group), .. } => group.as_str(),
            _ => "",
        };
        let position = *positions.entry(group_label.to_string()).or_insert_with(|| {
            groups.push(OptionGroup::new(group_label, Vec::new()));
            groups.len() - 1
        });
        groups[position].values.push(SelectOption::new(entry.label(), key.clone()));
    }

    OptionsPayload::Grouped(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_mapping_becomes_label_value_list() {
        let raw = RawOptions::from_json(json!({"1": "Active", "draft": "Draft"})).unwrap();
        let payload = format_options(&raw);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!([{"label": "Active", "value": 1}, {"label": "Draft", "value": "draft"}])
        );
    }

    #[test]
    fn only_canonical_integers_become_numbers() {
        let raw =
            RawOptions::from_json(json!({"007": "Bond", "-3": "Minus", "1.5": "Float"})).unwrap();
        let keys: Vec<_> = raw.entries().iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(
            keys,
            vec![Scalar::from("007"), Scalar::from(-3i64), Scalar::from("1.5")]
        );
    }

    #[test]
    fn grouped_mapping_buckets_by_first_appearance() {
        let raw = RawOptions::new()
            .grouped(1, "X", "A")
            .grouped(2, "Y", "B")
            .grouped(3, "Z", "A");
        let payload = format_options(&raw);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!([
                {"label": "A", "values": [
                    {"label": "X", "value": 1},
                    {"label": "Z", "value": 3},
                ]},
                {"label": "B", "values": [{"label": "Y", "value": 2}]},
            ])
        );
    }

    #[test]
    fn ungrouped_entries_share_the_empty_group() {
        let raw = RawOptions::from_json(json!({
            "a": {"label": "Alpha", "group": "Letters"},
            "b": "Bare",
            "c": {"label": "Orphan"},
        }))
        .unwrap();
        match format_options(&raw) {
            OptionsPayload::Grouped(groups) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[1].label, "");
                assert_eq!(groups[1].values.len(), 2);
            }
            other => panic!("expected grouped payload, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_object_mappings() {
        assert!(RawOptions::from_json(json!(["a"])).is_err());
        assert!(RawOptions::from_json(json!({"a": [1]})).is_err());
        assert!(RawOptions::from_json(json!(null)).unwrap().is_empty());
    }

    #[test]
    fn raw_options_serialize_back_to_a_mapping() {
        let raw = RawOptions::new().label(1, "One").grouped("x", "Ex", "G");
        assert_eq!(
            serde_json::to_value(&raw).unwrap(),
            json!({"1": "One", "x": {"label": "Ex", "group": "G"}})
        );
    }
}
