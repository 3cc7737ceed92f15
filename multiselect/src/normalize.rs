//! Canonical display form for filter options.
//!
//! Grouped payloads may repeat an option label across groups ("Draft" under
//! both "Posts" and "Pages"). Normalization suffixes such labels with their
//! group so the rendered list never shows two identical entries. Flat payloads
//! pass through untouched.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::{OptionGroup, OptionsPayload, SelectOption, has_values_array};

/// Policy for suffixing grouped option labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupMode {
    /// Suffix a label only when it occurs in two or more groups.
    #[default]
    CrossGroup,
    /// Suffix every grouped label unconditionally.
    Always,
}

impl DedupMode {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            DedupMode::CrossGroup => "cross-group",
            DedupMode::Always => "always",
        }
    }
}

/// Returns `true` when at least one element carries an array-typed `values`
/// attribute. An empty payload is flat.
pub fn is_grouped_payload(items: &[JsonValue]) -> bool {
    items.iter().any(has_values_array)
}

/// Normalizes options with the default [`DedupMode::CrossGroup`] policy.
pub fn normalize_options(payload: &OptionsPayload) -> OptionsPayload {
    normalize_options_with(payload, DedupMode::default())
}

/// Produces a new payload with ambiguous grouped labels rewritten as
/// `"{label} ({group})"`. Order and grouping are preserved.
pub fn normalize_options_with(payload: &OptionsPayload, mode: DedupMode) -> OptionsPayload {
    let groups = match payload {
        OptionsPayload::Flat(options) => return OptionsPayload::Flat(options.clone()),
        OptionsPayload::Grouped(groups) => groups,
    };

    let ambiguous = match mode {
        DedupMode::CrossGroup => cross_group_labels(groups),
        DedupMode::Always => groups
            .iter()
            .flat_map(|group| group.values.iter().map(|option| option.label.as_str()))
            .collect(),
    };

    let normalized = groups
        .iter()
        .map(|group| OptionGroup {
            label: group.label.clone(),
            values: group
                .values
                .iter()
                .map(|option| {
                    let repeated = ambiguous.contains(option.label.as_str());
                    disambiguate(option, &group.label, repeated)
                })
                .collect(),
        })
        .collect();

    OptionsPayload::Grouped(normalized)
}

/// Labels that appear in more than one group. Repeats inside a single group
/// do not count.
fn cross_group_labels(groups: &[OptionGroup]) -> HashSet<&str> {
    let mut seen_in: HashMap<&str, HashSet<usize>> = HashMap::new();
    for (index, group) in groups.iter().enumerate() {
        for option in &group.values {
            seen_in.entry(option.label.as_str()).or_default().insert(index);
        }
    }
    seen_in
        .into_iter()
        .filter_map(|(label, owners)| (owners.len() > 1).then_some(label))
        .collect()
}

fn disambiguate(option: &SelectOption, group_label: &str, duplicate: bool) -> SelectOption {
    let mut renamed = option.clone();
    if duplicate {
        renamed.label = format!("{} ({})", option.label, group_label);
    }
    renamed
}
