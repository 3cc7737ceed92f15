use thiserror::Error;

/// Top-level error type returned by the strict multiselect APIs.
///
/// The soft entry points (`parse_filter_value`, `find_option`) never surface
/// these; they collapse every failure into "no selection" or "no match".
#[derive(Debug, Error)]
pub enum FilterError {
    /// A stored value string could not be decoded as JSON at some layer.
    #[error("malformed value encoding at layer {layer}: {message}")]
    MalformedValueEncoding { layer: usize, message: String },

    /// A stored value kept decoding to strings past the configured bound.
    #[error("value is string-encoded more than {max_depth} times")]
    EncodingTooDeep { max_depth: usize },

    /// The decoded value is valid JSON but not an array of selections.
    #[error("decoded value is not an array (found {found})")]
    NotAnArray { found: &'static str },

    /// An options payload could not be interpreted.
    #[error("invalid options payload: {message}")]
    InvalidOptions { message: String },

    /// No filter is registered under the requested key.
    #[error("unknown filter '{key}'")]
    UnknownFilter { key: String },

    /// Settings file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    pub(crate) fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

/// Human-readable name of a JSON value's kind, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
