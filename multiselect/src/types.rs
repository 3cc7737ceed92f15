use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value as JsonValue};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::errors::{FilterError, json_kind};
use crate::normalize::is_grouped_payload;

/// Primitive option identifier.
///
/// Identifiers arrive as strings or numbers depending on the serialization
/// path, so two scalars are the same value when their string forms match.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(Number),
}

impl Scalar {
    /// Converts a loosely-typed JSON value into a scalar.
    ///
    /// Booleans are accepted and coerced to text. `null`, arrays and objects
    /// have no scalar form.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::String(text) => Some(Self::Text(text.clone())),
            JsonValue::Number(number) => Some(Self::Number(number.clone())),
            JsonValue::Bool(flag) => Some(Self::Text(flag.to_string())),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    /// String form used for every identifier comparison.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Scalar::Text(text) => Cow::Borrowed(text.as_str()),
            Scalar::Number(number) => Cow::Owned(number_key(number)),
        }
    }

    /// Returns `true` when both scalars share the same string form (`1 == "1"`).
    pub fn same_value(&self, other: &Scalar) -> bool {
        self.as_key() == other.as_key()
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Text(text) => JsonValue::String(text.clone()),
            Scalar::Number(number) => JsonValue::Number(number.clone()),
        }
    }
}

/// String form of a number as a browser would print it.
///
/// Magnitudes of `1e21` and above, and below `1e-6`, use exponent notation
/// (`1e+21`, `1.5e-7`); everything else is positional with no trailing `.0`.
fn number_key(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float == 0.0 => "0".to_string(),
        Some(float) if float.is_finite() && (float.abs() >= 1e21 || float.abs() < 1e-6) => {
            let formatted = format!("{float:e}");
            match formatted.split_once('e') {
                Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                    format!("{mantissa}e+{exponent}")
                }
                _ => formatted,
            }
        }
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Text(text) => serializer.serialize_str(text),
            Scalar::Number(number) => number.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        Scalar::from_json(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "expected a string or number, found {}",
                json_kind(&raw)
            ))
        })
    }
}

/// Labels are usually strings but numeric labels are common enough in
/// server-built mappings to accept them.
fn label_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    match raw {
        JsonValue::String(text) => Ok(text),
        JsonValue::Number(number) => Ok(number_key(&number)),
        JsonValue::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a label string, found {}",
            json_kind(&other)
        ))),
    }
}

/// A single selectable label/value pair.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(deserialize_with = "label_string")]
    pub label: String,
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub value: Scalar,
    /// Enclosing group label, attached only by grouped lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            group: None,
        }
    }

    /// Copy of this option tagged with its enclosing group label.
    pub fn in_group(&self, group: &str) -> Self {
        Self {
            label: self.label.clone(),
            value: self.value.clone(),
            group: Some(group.to_string()),
        }
    }
}

/// A named cluster of options.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGroup {
    #[serde(default, deserialize_with = "label_string")]
    pub label: String,
    pub values: Vec<SelectOption>,
}

impl OptionGroup {
    pub fn new(label: impl Into<String>, values: Vec<SelectOption>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// The options a filter offers, either flat or partitioned into groups.
///
/// On the wire both shapes are plain JSON arrays; which one applies is decided
/// by probing for an array-typed `values` attribute (see [`is_grouped_payload`]).
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsPayload {
    Flat(Vec<SelectOption>),
    Grouped(Vec<OptionGroup>),
}

impl Default for OptionsPayload {
    fn default() -> Self {
        OptionsPayload::Flat(Vec::new())
    }
}

impl OptionsPayload {
    #[inline]
    pub fn is_grouped(&self) -> bool {
        matches!(self, OptionsPayload::Grouped(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OptionsPayload::Flat(options) => options.is_empty(),
            OptionsPayload::Grouped(groups) => groups.is_empty(),
        }
    }

    /// Every option in display order, group members in group order.
    pub fn iter_options(&self) -> Box<dyn Iterator<Item = &SelectOption> + '_> {
        match self {
            OptionsPayload::Flat(options) => Box::new(options.iter()),
            OptionsPayload::Grouped(groups) => {
                Box::new(groups.iter().flat_map(|group| group.values.iter()))
            }
        }
    }

    /// Interprets an already-deserialized JSON payload.
    ///
    /// `null` is treated as an empty flat payload. In grouped mode, elements
    /// without an array-typed `values` attribute are skipped.
    pub fn from_json(raw: JsonValue) -> Result<Self, FilterError> {
        let items = match raw {
            JsonValue::Null => return Ok(OptionsPayload::default()),
            JsonValue::Array(items) => items,
            other => {
                return Err(FilterError::invalid_options(format!(
                    "expected an array of options, found {}",
                    json_kind(&other)
                )));
            }
        };

        if is_grouped_payload(&items) {
            let mut groups = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                if !has_values_array(&item) {
                    log::warn!(
                        "skipping element {index} without a `values` array in grouped payload"
                    );
                    continue;
                }
                let group: OptionGroup = serde_json::from_value(item)
                    .map_err(|err| FilterError::invalid_options(format!("group {index}: {err}")))?;
                groups.push(group);
            }
            return Ok(OptionsPayload::Grouped(groups));
        }

        let options = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<SelectOption>(item)
                    .map_err(|err| FilterError::invalid_options(format!("option {index}: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OptionsPayload::Flat(options))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FilterError> {
        let value: JsonValue = serde_json::from_str(raw)?;
        Self::from_json(value)
    }
}

pub(crate) fn has_values_array(item: &JsonValue) -> bool {
    item.get("values").is_some_and(JsonValue::is_array)
}

impl Serialize for OptionsPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionsPayload::Flat(options) => options.serialize(serializer),
            OptionsPayload::Grouped(groups) => groups.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for OptionsPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        OptionsPayload::from_json(raw).map_err(de::Error::custom)
    }
}

/// A persisted filter selection of unknown shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Nothing stored, or a falsy value (`null`, `""`, `0`, `false`).
    Absent,
    /// A lone identifier (single-select mode).
    Single(Scalar),
    /// An array of identifiers (multi-select mode); elements are not yet validated.
    Many(Vec<JsonValue>),
    /// A string that may hold JSON, possibly encoded several times over.
    Encoded(String),
    /// Objects and other shapes that never describe a selection.
    Unsupported(JsonValue),
}

impl FilterValue {
    pub fn from_json(raw: &JsonValue) -> Self {
        match raw {
            JsonValue::Null => FilterValue::Absent,
            JsonValue::Bool(false) => FilterValue::Absent,
            JsonValue::String(text) if text.is_empty() => FilterValue::Absent,
            JsonValue::Number(number) if number.as_f64() == Some(0.0) => FilterValue::Absent,
            JsonValue::String(text) => FilterValue::Encoded(text.clone()),
            JsonValue::Array(items) => FilterValue::Many(items.clone()),
            JsonValue::Number(number) => FilterValue::Single(Scalar::Number(number.clone())),
            JsonValue::Bool(true) => FilterValue::Single(Scalar::Text("true".to_string())),
            JsonValue::Object(_) => FilterValue::Unsupported(raw.clone()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FilterValue::Absent)
    }
}

impl From<Option<&JsonValue>> for FilterValue {
    fn from(raw: Option<&JsonValue>) -> Self {
        raw.map_or(FilterValue::Absent, FilterValue::from_json)
    }
}
