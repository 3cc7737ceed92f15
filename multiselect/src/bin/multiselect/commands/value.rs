use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use multiselect::{Scalar, Settings, normalize_options_with};
use serde::Serialize;
use serde_json::Value;

use super::load_options;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, Selection, TableDisplay, themed_table};

pub const PARSE_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Parse Stored Values",
    commands: &[
        "multiselect parse '[1,2,3]'                    # Plain array",
        "multiselect parse '\"[1,2,3]\"'                # String-encoded array",
        "multiselect parse '\"5\"'                      # Scalar terminal: no selection",
    ],
}];

pub const RESOLVE_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Resolve Selections",
    commands: &[
        "multiselect resolve options.json '[\"1\",3]'          # Match by string form",
        "multiselect resolve options.json draft --single     # Single-select value",
        "multiselect resolve options.json '[3]' --normalize  # Normalized labels",
    ],
}];

#[derive(Args)]
pub struct ParseArgs {
    /// Stored value as JSON; anything that is not JSON is taken as a bare string
    pub value: String,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// JSON file holding an options payload
    pub file: PathBuf,

    /// Stored value as JSON; anything that is not JSON is taken as a bare string
    pub value: String,

    /// Treat the file as a raw label mapping and format it first
    #[arg(long)]
    pub raw: bool,

    /// Interpret the value as a single-select value
    #[arg(long)]
    pub single: bool,

    /// Normalize labels before matching
    #[arg(long)]
    pub normalize: bool,
}

/// Identifiers recovered from a stored value
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct Parsed(Vec<Scalar>);

impl TableDisplay for Parsed {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["#", "Value"]);
        for (index, value) in self.0.iter().enumerate() {
            table.add_row(vec![Cell::new(index + 1), Cell::new(value.as_key())]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let values: Vec<String> =
            self.0.iter().map(|value| value.as_key().into_owned()).collect();
        format!("[{}]", values.join(", "))
    }
}

/// Arguments arrive as shell strings. JSON literals are decoded; anything else
/// stays text.
fn cli_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

pub fn handle_parse(args: ParseArgs, settings: &Settings, output: &OutputManager) -> Result<()> {
    let raw = cli_value(args.value);
    output.verbose(&format!("Decoding {raw}"));

    match settings.resolver().try_parse(&raw) {
        Ok(Some(values)) => {
            output.heading("Selection");
            output.display(&Parsed(values))?;
        }
        Ok(None) => {
            if output.is_json() {
                println!("null");
            }
            output.info("Nothing stored: no selection");
        }
        Err(err) => {
            if output.is_json() {
                println!("null");
            }
            output.warning(&format!("No selection: {err}"));
        }
    }
    Ok(())
}

pub fn handle_resolve(
    args: ResolveArgs,
    settings: &Settings,
    output: &OutputManager,
) -> Result<()> {
    let mut options = load_options(&args.file, args.raw)?;
    if args.normalize {
        options = normalize_options_with(&options, settings.normalize.dedup);
    }
    let raw = cli_value(args.value);

    let selected = settings.resolver().resolve_selection(&options, &raw, args.single);
    if selected.is_empty() {
        output.warning("No options matched the stored value");
    } else {
        output.success(&format!("Matched {} option(s)", selected.len()));
    }
    output.heading("Resolved Options");
    output.display(&Selection(selected))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_fall_back_to_text() {
        assert_eq!(cli_value("[1,2]".to_string()), serde_json::json!([1, 2]));
        assert_eq!(cli_value("draft".to_string()), Value::String("draft".to_string()));
        assert_eq!(cli_value("\"5\"".to_string()), Value::String("5".to_string()));
    }

    #[test]
    fn parsed_values_render_in_a_themed_table() {
        let options = GlobalOptions {
            no_color: true,
            ..GlobalOptions::default()
        };
        let parsed = Parsed(vec![Scalar::from(1), Scalar::from("draft")]);
        let rendered = parsed.to_table(&options).to_string();
        assert!(rendered.starts_with('+'));
        assert!(rendered.contains("draft"));
        assert_eq!(parsed.to_compact(), "[1, draft]");
    }
}
