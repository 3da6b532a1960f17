//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::dump::DumpArgs;
use crate::commands::generate::GenerateArgs;

pub struct GenerateParams {
    pub input: PathBuf,
    pub output: PathBuf,
    pub package: Option<String>,
    pub tie: bool,
    pub header: bool,
    pub json: bool,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            output: m
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("generated")),
            package: m.get_one::<String>("package").cloned(),
            tie: m.get_flag("tie"),
            header: !m.get_flag("no_header"),
            json: m.get_flag("json"),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            input: p.input,
            output: p.output,
            package: p.package,
            tie: p.tie,
            header: p.header,
            json: p.json,
        }
    }
}

pub struct DumpParams {
    pub input: PathBuf,
    pub json: bool,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            input: p.input,
            json: p.json,
        }
    }
}

/// The input is required, so clap guarantees it; `-` is the fallback
/// only for matches built by hand.
fn input_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("-"))
}
