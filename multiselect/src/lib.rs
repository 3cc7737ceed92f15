//! Option formatting and value resolution for multi-select filters.
//!
//! Filters declare their options as an ordered label mapping. [`format`] turns
//! that mapping into an [`OptionsPayload`], [`normalize`] disambiguates labels
//! repeated across groups, and [`resolve`] recovers the selected options from
//! a stored filter value of whatever shape the transport left it in.
//!
//! ```
//! use multiselect::{OptionsPayload, Scalar, find_option, normalize_options};
//! use serde_json::json;
//!
//! let payload: OptionsPayload = serde_json::from_value(json!([
//!     {"label": "A", "values": [{"label": "X", "value": 1}, {"label": "Y", "value": 2}]},
//!     {"label": "B", "values": [{"label": "X", "value": 3}]},
//! ]))
//! .unwrap();
//!
//! let normalized = normalize_options(&payload);
//! let found = find_option(&normalized, true, &Scalar::from(3)).unwrap();
//! assert_eq!(found.label, "X (B)");
//! assert_eq!(found.group.as_deref(), Some("B"));
//! ```

pub mod config;
pub mod errors;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod registry;
pub mod resolve;
pub mod types;

pub use config::Settings;
pub use errors::FilterError;
pub use filter::{
    FilterDescriptor, FilterMeta, FilterValues, MultiselectFilter, OptionsProvider, slugify,
};
pub use format::{RawEntry, RawOptions, format_options};
pub use normalize::{DedupMode, is_grouped_payload, normalize_options, normalize_options_with};
pub use registry::FilterRegistry;
pub use resolve::{
    MAX_DECODE_DEPTH, ValueResolver, find_option, parse_filter_value, resolve_selection,
    try_parse_filter_value,
};
pub use types::{FilterValue, OptionGroup, OptionsPayload, Scalar, SelectOption};
