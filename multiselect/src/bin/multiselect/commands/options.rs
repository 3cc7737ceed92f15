use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use multiselect::{DedupMode, RawOptions, Settings, format_options, normalize_options_with};

use super::{load_options, read_json};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const FORMAT_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Format Label Mappings",
    commands: &[
        "multiselect format statuses.json              # {\"1\": \"Active\"}",
        "multiselect format cities.json --output json  # {\"ams\": {\"label\": .., \"group\": ..}}",
    ],
}];

pub const NORMALIZE_EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Normalize Options",
        commands: &[
            "multiselect normalize options.json       # Disambiguate repeated labels",
            "multiselect normalize cities.json --raw  # Format a label mapping first",
        ],
    },
    ExampleGroup {
        title: "Dedup Policy",
        commands: &[
            "multiselect normalize options.json --dedup always  # Suffix every grouped label",
        ],
    },
];

#[derive(Args)]
pub struct FormatArgs {
    /// JSON file holding a `key => label` or `key => {label, group}` mapping
    pub file: PathBuf,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// JSON file holding an options payload
    pub file: PathBuf,

    /// Treat the file as a raw label mapping and format it first
    #[arg(long)]
    pub raw: bool,

    /// Label dedup policy (overrides the config file)
    #[arg(long, value_enum)]
    pub dedup: Option<DedupArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DedupArg {
    /// Suffix labels shared by two or more groups
    CrossGroup,
    /// Suffix every grouped label
    Always,
}

impl From<DedupArg> for DedupMode {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::CrossGroup => DedupMode::CrossGroup,
            DedupArg::Always => DedupMode::Always,
        }
    }
}

pub fn handle_format(args: FormatArgs, output: &OutputManager) -> Result<()> {
    let document = read_json(&args.file)?;
    let mapping = RawOptions::from_json(document)
        .with_context(|| format!("Invalid label mapping in {}", args.file.display()))?;
    output.verbose(&format!("Read {} entries from {}", mapping.len(), args.file.display()));

    let payload = format_options(&mapping);
    output.heading(if payload.is_grouped() { "Grouped Options" } else { "Options" });
    output.display(&payload)?;
    Ok(())
}

pub fn handle_normalize(
    args: NormalizeArgs,
    settings: &Settings,
    output: &OutputManager,
) -> Result<()> {
    let payload = load_options(&args.file, args.raw)?;
    let mode = args.dedup.map(DedupMode::from).unwrap_or(settings.normalize.dedup);
    output.verbose(&format!("Normalizing with dedup policy '{}'", mode.as_str()));

    let normalized = normalize_options_with(&payload, mode);
    if !normalized.is_grouped() {
        output.info("Flat options are passed through unchanged");
    }
    output.heading("Normalized Options");
    output.display(&normalized)?;
    Ok(())
}
