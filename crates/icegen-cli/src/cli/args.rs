//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Resolved definitions as JSON (positional, `-` for stdin).
pub fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("UNIT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Resolved Slice definitions as JSON, or - for stdin")
}

/// Output root directory (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .default_value("generated")
        .value_parser(value_parser!(PathBuf))
        .help("Directory the Java package tree is written under")
}

/// Package prefix (--package).
pub fn package_arg() -> Arg {
    Arg::new("package")
        .long("package")
        .value_name("PACKAGE")
        .help("Java package prepended to every Slice module path")
}

/// Emit tie classes (--tie).
pub fn tie_arg() -> Arg {
    Arg::new("tie")
        .long("tie")
        .action(ArgAction::SetTrue)
        .help("Also generate _XTie delegation classes")
}

/// Skip the generated-file comment (--no-header).
pub fn no_header_arg() -> Arg {
    Arg::new("no_header")
        .long("no-header")
        .action(ArgAction::SetTrue)
        .help("Don't start files with a generated-file comment")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of text")
}

/// Log verbosity (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("More log output on stderr (RUST_LOG overrides)")
}
