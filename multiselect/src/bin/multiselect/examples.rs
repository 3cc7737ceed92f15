use std::fmt::Write;

use crate::commands::{options, value};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "format",
            groups: options::FORMAT_EXAMPLES,
        },
        CommandExample {
            name: "normalize",
            groups: options::NORMALIZE_EXAMPLES,
        },
        CommandExample {
            name: "parse",
            groups: value::PARSE_EXAMPLES,
        },
        CommandExample {
            name: "resolve",
            groups: value::RESOLVE_EXAMPLES,
        },
    ]
}

/// Renders example groups as the `--help` appendix of a subcommand.
pub fn render(groups: &[ExampleGroup]) -> String {
    let mut buffer = String::from("Examples:\n");
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            buffer.push('\n');
        }
        let _ = writeln!(buffer, "  {}", group.title);
        for command in group.commands {
            let _ = writeln!(buffer, "    $ {command}");
        }
    }
    buffer
}
