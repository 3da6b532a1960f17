//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("icegen")
        .about("Java code generation for resolved Slice definitions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(generate_command())
        .subcommand(dump_command())
}

/// Write every Java artifact of a unit.
pub fn generate_command() -> Command {
    Command::new("generate")
        .about("Generate Java sources")
        .override_usage(
            "\
  icegen generate <UNIT> [-o <DIR>]
  icegen generate - --package <PACKAGE> < unit.json",
        )
        .after_help(
            r#"EXAMPLES:
  icegen generate hello.json                 # writes generated/Demo/*.java
  icegen generate hello.json -o src --tie    # with tie classes
  icegen generate hello.json --package com.acme --json   # print a manifest"#,
        )
        .arg(input_arg())
        .arg(output_arg())
        .arg(package_arg())
        .arg(tie_arg())
        .arg(no_header_arg())
        .arg(json_arg().help("Print a JSON manifest of the written files"))
}

/// Show dispatch tables and exception orders.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show dispatch tables and exception catch orders")
        .after_help(
            r#"EXAMPLES:
  icegen dump hello.json          # text tables
  icegen dump hello.json --json   # the same as JSON"#,
        )
        .arg(input_arg())
        .arg(json_arg())
}
