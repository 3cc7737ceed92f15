use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use multiselect::{OptionsPayload, SelectOption};
use serde::Serialize;

const SUCCESS_ICON: &str = "✓";
const WARNING_ICON: &str = "⚠";
const INFO_ICON: &str = "ℹ";
const ARROW_ICON: &str = "→";
const GROUP_ICON: &str = "📁";

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.options.output_format, OutputFormat::Json)
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.decorate(SUCCESS_ICON, message, Color::Green));
        }
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.decorate(WARNING_ICON, message, Color::Yellow));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.decorate(ARROW_ICON, message, Color::BrightBlack));
        }
    }

    /// Display info message with color and icon
    pub fn info(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", self.decorate(INFO_ICON, message, Color::Blue));
        }
    }

    /// Display a heading
    pub fn heading(&self, text: &str) {
        if !self.options.quiet && !self.is_json() {
            let output = if self.options.no_color {
                format!("\n{text}\n{}", "=".repeat(text.chars().count()))
            } else {
                format!("\n{}", text.bright_blue().bold())
            };
            println!("{output}");
        }
    }

    fn decorate(&self, icon: &str, message: &str, color: Color) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }
}

pub(crate) fn themed_table(options: &GlobalOptions, headers: &[&str]) -> Table {
    let mut table = Table::new();

    if !options.no_color {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    } else {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    }

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
    table
}

impl TableDisplay for OptionsPayload {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        match self {
            OptionsPayload::Flat(flat) => {
                let mut table = themed_table(options, &["Label", "Value"]);
                for option in flat {
                    table.add_row(vec![
                        Cell::new(&option.label),
                        Cell::new(option.value.as_key()),
                    ]);
                }
                table
            }
            OptionsPayload::Grouped(groups) => {
                let mut table = themed_table(options, &["Group", "Label", "Value"]);
                for group in groups {
                    for option in &group.values {
                        table.add_row(vec![
                            Cell::new(format!("{} {}", GROUP_ICON, group.label)),
                            Cell::new(&option.label),
                            Cell::new(option.value.as_key()),
                        ]);
                    }
                }
                table
            }
        }
    }

    fn to_compact(&self) -> String {
        let labels: Vec<&str> = self.iter_options().map(|option| option.label.as_str()).collect();
        format!("{} option(s): {}", labels.len(), labels.join(", "))
    }
}

/// Options matched by a stored value
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Selection(pub Vec<SelectOption>);

impl TableDisplay for Selection {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Label", "Value", "Group"]);
        for option in &self.0 {
            table.add_row(vec![
                Cell::new(&option.label),
                Cell::new(option.value.as_key()),
                Cell::new(option.group.as_deref().unwrap_or("-")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let values: Vec<String> = self
            .0
            .iter()
            .map(|option| option.value.as_key().into_owned())
            .collect();
        format!("{} selected: {}", values.len(), values.join(", "))
    }
}
