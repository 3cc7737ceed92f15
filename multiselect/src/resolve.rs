//! Recovering selections from stored filter values.
//!
//! Stored values survive several serialization boundaries on their way back to
//! the filter, so the same selection can show up as `[1,2]`, `"[1,2]"` or
//! `"\"[1,2]\""`. The resolver unwraps those layers, then maps each identifier
//! to its option by string form.

use serde_json::Value as JsonValue;

use crate::errors::{FilterError, json_kind};
use crate::types::{FilterValue, OptionsPayload, Scalar, SelectOption};

/// Default bound on how many string-encoding layers are unwrapped.
pub const MAX_DECODE_DEPTH: usize = 16;

/// Parses stored values and resolves them against options.
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver {
    max_decode_depth: usize,
}

impl Default for ValueResolver {
    fn default() -> Self {
        Self {
            max_decode_depth: MAX_DECODE_DEPTH,
        }
    }
}

impl ValueResolver {
    pub fn new(max_decode_depth: usize) -> Self {
        Self {
            max_decode_depth: max_decode_depth.max(1),
        }
    }

    pub fn max_decode_depth(&self) -> usize {
        self.max_decode_depth
    }

    /// Strict parse: `Ok(None)` for "nothing stored", an error for every
    /// shape that cannot describe a multi-selection.
    pub fn try_parse(&self, raw: &JsonValue) -> Result<Option<Vec<Scalar>>, FilterError> {
        match FilterValue::from_json(raw) {
            FilterValue::Absent => Ok(None),
            FilterValue::Many(items) => Ok(Some(collect_scalars(&items))),
            FilterValue::Encoded(text) => match self.unwrap_encoded(&text)? {
                JsonValue::Array(items) => Ok(Some(collect_scalars(&items))),
                other => Err(FilterError::NotAnArray {
                    found: json_kind(&other),
                }),
            },
            FilterValue::Single(_) | FilterValue::Unsupported(_) => Err(FilterError::NotAnArray {
                found: json_kind(raw),
            }),
        }
    }

    /// Soft parse: every failure reads as "no selection".
    pub fn parse(&self, raw: &JsonValue) -> Option<Vec<Scalar>> {
        match self.try_parse(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::debug!("ignoring stored filter value: {err}");
                None
            }
        }
    }

    /// Decodes `text` as JSON for as long as the result is itself a string.
    pub fn unwrap_encoded(&self, text: &str) -> Result<JsonValue, FilterError> {
        let mut current = text.to_owned();
        for layer in 1..=self.max_decode_depth {
            let decoded: JsonValue =
                serde_json::from_str(&current).map_err(|err| FilterError::MalformedValueEncoding {
                    layer,
                    message: err.to_string(),
                })?;
            match decoded {
                JsonValue::String(inner) => current = inner,
                terminal => return Ok(terminal),
            }
        }
        Err(FilterError::EncodingTooDeep {
            max_depth: self.max_decode_depth,
        })
    }

    /// Maps a stored value to the options it selects, dropping identifiers
    /// with no matching option.
    ///
    /// In single-select mode a plain scalar is the identifier itself; a string
    /// that is not JSON is taken verbatim.
    pub fn resolve_selection(
        &self,
        options: &OptionsPayload,
        raw: &JsonValue,
        single_select: bool,
    ) -> Vec<SelectOption> {
        let identifiers = if single_select {
            self.single_identifiers(raw)
        } else {
            self.parse(raw).unwrap_or_default()
        };

        let grouped = options.is_grouped();
        identifiers
            .iter()
            .filter_map(|identifier| {
                let found = find_option(options, grouped, identifier);
                if found.is_none() {
                    log::debug!("no option matches stored identifier '{identifier}'");
                }
                found
            })
            .collect()
    }

    fn single_identifiers(&self, raw: &JsonValue) -> Vec<Scalar> {
        match FilterValue::from_json(raw) {
            FilterValue::Absent | FilterValue::Unsupported(_) => Vec::new(),
            FilterValue::Single(identifier) => vec![identifier],
            FilterValue::Many(items) => collect_scalars(&items),
            FilterValue::Encoded(text) => match self.unwrap_encoded(&text) {
                Ok(JsonValue::Array(items)) => collect_scalars(&items),
                Ok(terminal) => Scalar::from_json(&terminal).into_iter().collect(),
                Err(_) => vec![Scalar::Text(text)],
            },
        }
    }
}

fn collect_scalars(items: &[JsonValue]) -> Vec<Scalar> {
    items
        .iter()
        .filter_map(|item| {
            let scalar = Scalar::from_json(item);
            if scalar.is_none() {
                log::debug!("skipping non-scalar selection element of kind {}", json_kind(item));
            }
            scalar
        })
        .collect()
}

/// Parses a stored filter value into selected identifiers.
///
/// Returns `None` for absent values, malformed encodings and anything that
/// does not decode to an array. Never fails.
pub fn parse_filter_value(raw: &JsonValue) -> Option<Vec<Scalar>> {
    ValueResolver::default().parse(raw)
}

/// Strict counterpart of [`parse_filter_value`] with an explicit decode bound.
pub fn try_parse_filter_value(
    raw: &JsonValue,
    max_depth: usize,
) -> Result<Option<Vec<Scalar>>, FilterError> {
    ValueResolver::new(max_depth).try_parse(raw)
}

/// Finds the first option whose value has the same string form as `value`.
///
/// With `is_grouped`, group members are searched and the match carries its
/// group label. A flag that disagrees with the payload shape finds nothing.
pub fn find_option(
    options: &OptionsPayload,
    is_grouped: bool,
    value: &Scalar,
) -> Option<SelectOption> {
    let key = value.as_key();
    match (options, is_grouped) {
        (OptionsPayload::Grouped(groups), true) => groups.iter().find_map(|group| {
            group
                .values
                .iter()
                .find(|option| option.value.as_key() == key)
                .map(|option| option.in_group(&group.label))
        }),
        (OptionsPayload::Flat(flat), false) => {
            flat.iter().find(|option| option.value.as_key() == key).cloned()
        }
        _ => {
            log::warn!(
                "option lookup expected a {} payload but received the other shape",
                if is_grouped { "grouped" } else { "flat" }
            );
            None
        }
    }
}

/// Convenience wrapper resolving a stored value with default settings.
pub fn resolve_selection(
    options: &OptionsPayload,
    raw: &JsonValue,
    single_select: bool,
) -> Vec<SelectOption> {
    ValueResolver::default().resolve_selection(options, raw, single_select)
}
