//! Multiselect filter definitions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::format::{RawOptions, format_options};
use crate::types::OptionsPayload;

/// Component name the UI registers the filter under.
pub const COMPONENT: &str = "multiselect-filter";

/// Punctuation that is dropped outright rather than treated as a word break.
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s_-]+").expect("valid punctuation pattern"));

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("valid separator pattern"));

/// Current values of the other filters on the page, keyed by filter key.
pub type FilterValues = Map<String, JsonValue>;

/// Source of a filter's raw options.
///
/// Receives the other filters' current values so options can depend on them.
pub trait OptionsProvider: Send + Sync {
    fn options(&self, filter_values: &FilterValues) -> RawOptions;
}

impl<F> OptionsProvider for F
where
    F: Fn(&FilterValues) -> RawOptions + Send + Sync,
{
    fn options(&self, filter_values: &FilterValues) -> RawOptions {
        self(filter_values)
    }
}

impl OptionsProvider for RawOptions {
    fn options(&self, _filter_values: &FilterValues) -> RawOptions {
        self.clone()
    }
}

/// Display settings forwarded to the UI component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_select: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_select: Option<bool>,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub async_options: Option<bool>,
}

/// Serialized description the UI receives for each filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    pub class: String,
    pub name: String,
    pub component: &'static str,
    pub options: OptionsPayload,
    pub current_value: JsonValue,
    #[serde(flatten)]
    pub meta: FilterMeta,
}

/// A named multiselect filter with an options source and display settings.
pub struct MultiselectFilter {
    name: String,
    key: String,
    provider: Box<dyn OptionsProvider>,
    meta: FilterMeta,
    default_value: Option<JsonValue>,
}

impl fmt::Debug for MultiselectFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiselectFilter")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("meta", &self.meta)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}

impl MultiselectFilter {
    /// Creates a filter whose key is the slug of `name`.
    pub fn new(name: impl Into<String>, provider: impl OptionsProvider + 'static) -> Self {
        let name = name.into();
        Self {
            key: slugify(&name),
            name,
            provider: Box::new(provider),
            meta: FilterMeta::default(),
            default_value: None,
        }
    }

    /// Overrides the derived key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.meta.placeholder = placeholder;
        self
    }

    /// Maximum number of options the user can select.
    pub fn max(mut self, max: Option<u32>) -> Self {
        self.meta.max = max;
        self
    }

    /// Stores a lone value instead of an array.
    pub fn single_select(mut self, single_select: bool) -> Self {
        self.meta.single_select = Some(single_select);
        self
    }

    /// Maximum number of options displayed at once.
    pub fn options_limit(mut self, options_limit: Option<u32>) -> Self {
        self.meta.options_limit = options_limit;
        self
    }

    /// Allows selecting a whole group at once.
    pub fn group_select(mut self, group_select: bool) -> Self {
        self.meta.group_select = Some(group_select);
        self
    }

    /// Options are fetched on demand instead of being embedded in the descriptor.
    pub fn async_options(mut self, async_options: bool) -> Self {
        self.meta.async_options = Some(async_options);
        self
    }

    pub fn default_value(mut self, value: JsonValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn meta(&self) -> &FilterMeta {
        &self.meta
    }

    pub fn is_single_select(&self) -> bool {
        self.meta.single_select.unwrap_or(false)
    }

    pub fn is_multiselect(&self) -> bool {
        !self.is_single_select()
    }

    pub fn is_async(&self) -> bool {
        self.meta.async_options.unwrap_or(false)
    }

    pub fn raw_options(&self, filter_values: &FilterValues) -> RawOptions {
        self.provider.options(filter_values)
    }

    pub fn formatted_options(&self, filter_values: &FilterValues) -> OptionsPayload {
        format_options(&self.raw_options(filter_values))
    }

    pub fn descriptor(&self) -> FilterDescriptor {
        let options = if self.is_async() {
            OptionsPayload::default()
        } else {
            self.formatted_options(&FilterValues::new())
        };
        FilterDescriptor {
            class: self.key.clone(),
            name: self.name.clone(),
            component: COMPONENT,
            options,
            current_value: self
                .default_value
                .clone()
                .unwrap_or_else(|| JsonValue::String(String::new())),
            meta: self.meta.clone(),
        }
    }
}

/// URL-friendly key derived from a display name.
///
/// Letters and digits of any script are kept. Whitespace, `_` and `-` runs
/// become a single `-`; other punctuation is dropped (`"Don't"` -> `"dont"`).
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase().replace('@', " at ");
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    SEPARATOR_RUN
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn statuses() -> RawOptions {
        RawOptions::new().label("draft", "Draft").label("live", "Live")
    }

    #[test]
    fn slugs_collapse_separators() {
        assert_eq!(slugify("Post Status"), "post-status");
        assert_eq!(slugify("  Owner / Team!! "), "owner-team");
        assert_eq!(slugify("Sent @ Noon"), "sent-at-noon");
        assert_eq!(slugify("Tags_2024"), "tags-2024");
        assert_eq!(slugify("Don't stop"), "dont-stop");
        assert_eq!(slugify("v1.2 Release"), "v12-release");
    }

    #[test]
    fn slugs_keep_letters_of_every_script() {
        assert_eq!(slugify("Статус"), "статус");
        assert_eq!(slugify("Город доставки"), "город-доставки");
        assert_eq!(slugify("Café Owner"), "café-owner");
        assert_eq!(slugify("東京 2024"), "東京-2024");
    }

    #[test]
    fn key_defaults_to_slug_and_can_be_overridden() {
        let filter = MultiselectFilter::new("Post Status", statuses());
        assert_eq!(filter.key(), "post-status");
        let filter = filter.with_key("status");
        assert_eq!(filter.key(), "status");
    }

    #[test]
    fn single_select_turns_off_multiselect() {
        let filter = MultiselectFilter::new("Status", statuses());
        assert!(filter.is_multiselect());
        assert!(!filter.single_select(true).is_multiselect());
    }

    #[test]
    fn descriptor_embeds_options_and_set_meta_only() {
        let filter = MultiselectFilter::new("Status", statuses())
            .max(Some(2))
            .group_select(true);
        assert_eq!(
            serde_json::to_value(filter.descriptor()).unwrap(),
            json!({
                "class": "status",
                "name": "Status",
                "component": "multiselect-filter",
                "options": [
                    {"label": "Draft", "value": "draft"},
                    {"label": "Live", "value": "live"},
                ],
                "currentValue": "",
                "max": 2,
                "groupSelect": true,
            })
        );
    }

    #[test]
    fn async_descriptor_omits_options() {
        let filter = MultiselectFilter::new("Status", statuses())
            .async_options(true)
            .default_value(json!(["draft"]));
        let descriptor = serde_json::to_value(filter.descriptor()).unwrap();
        assert_eq!(descriptor["options"], json!([]));
        assert_eq!(descriptor["async"], json!(true));
        assert_eq!(descriptor["currentValue"], json!(["draft"]));
    }

    #[test]
    fn closure_providers_see_filter_values() {
        let filter = MultiselectFilter::new("City", |values: &FilterValues| {
            match values.get("country").and_then(JsonValue::as_str) {
                Some("nl") => RawOptions::new().label(1, "Amsterdam"),
                _ => RawOptions::new(),
            }
        });
        let mut values = FilterValues::new();
        assert!(filter.formatted_options(&values).is_empty());
        values.insert("country".to_string(), json!("nl"));
        assert_eq!(filter.formatted_options(&values).iter_options().count(), 1);
    }
}
