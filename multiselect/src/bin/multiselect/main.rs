mod commands;
mod context;
mod examples;
mod output;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;

use commands::{
    options::{FormatArgs, NormalizeArgs, handle_format, handle_normalize},
    value::{ParseArgs, ResolveArgs, handle_parse, handle_resolve},
};
use context::{CONFIG_FILE, ConfigContext};
use examples::command_examples;
use output::{GlobalOptions, OutputFormat, OutputManager};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Log filter for diagnostics (e.g. multiselect=debug)"),
    (
        "MULTISELECT_CONFIG",
        "Path to a settings file, instead of discovering multiselect.toml",
    ),
];

#[derive(Parser)]
#[command(name = "multiselect")]
#[command(version)]
#[command(
    about = "Format, normalize and resolve multiselect filter options",
    long_about = r#"Inspect multiselect filter data from the command line:

• Turn `key => label` mappings into flat or grouped option payloads
• Disambiguate option labels repeated across groups
• Decode stored filter values, however many times they were JSON-encoded
• Resolve stored values back to the options they select

Commands:
  format     Format a raw label mapping
  normalize  Disambiguate grouped option labels
  parse      Decode a stored filter value
  resolve    Match a stored value against options
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Settings file (defaults to the nearest multiselect.toml)
    #[arg(long, env = "MULTISELECT_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_with_examples() -> Self {
        let matches = build_cli_command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn build_cli_command() -> Command {
    let mut command = Cli::command().after_long_help(top_level_appendix());
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(examples::render(example.groups));
        }
    }
    command
}

fn top_level_appendix() -> String {
    let mut buffer = String::from("Environment Variables:\n");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(buffer, "  {key:<20} {description}");
    }
    let _ = write!(
        buffer,
        "\nTip: settings are read from the nearest {CONFIG_FILE}; \
         use 'multiselect <command> --help' for examples."
    );
    buffer
}

#[derive(Subcommand)]
enum Commands {
    /// Format a raw `key => label` mapping into an options payload
    Format(FormatArgs),

    /// Disambiguate option labels repeated across groups
    Normalize(NormalizeArgs),

    /// Decode a stored filter value into selected identifiers
    Parse(ParseArgs),

    /// Match a stored filter value against an options payload
    Resolve(ResolveArgs),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_with_examples();

    if let Err(err) = execute(cli) {
        eprintln!("{} {err:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    if global_options.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(global_options);
    let ctx = ConfigContext::resolve(cli.config.as_deref())?;
    match &ctx.config_path {
        Some(path) => output.verbose(&format!("Using settings from {}", path.display())),
        None => output.verbose("No settings file found, using defaults"),
    }
    log::debug!("effective settings: {:?}", ctx.settings);

    match cli.command {
        Commands::Format(args) => handle_format(args, &output)?,
        Commands::Normalize(args) => handle_normalize(args, &ctx.settings, &output)?,
        Commands::Parse(args) => handle_parse(args, &ctx.settings, &output)?,
        Commands::Resolve(args) => handle_resolve(args, &ctx.settings, &output)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommands_carry_their_examples() {
        let mut command = build_cli_command();
        let help = command
            .find_subcommand_mut("resolve")
            .map(|subcommand| subcommand.render_long_help().to_string())
            .unwrap_or_default();
        assert!(help.contains("Resolve Selections"));
    }
}
