use std::path::PathBuf;

use icegen_compiler::{Artifact, Config};

use super::CliError;
use super::load::load_unit;

pub struct GenerateArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub package: Option<String>,
    pub tie: bool,
    pub header: bool,
    pub json: bool,
}

pub fn run(args: GenerateArgs) {
    let artifacts = match execute(&args) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&artifacts) {
            Ok(manifest) => println!("{}", manifest),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Generate every artifact of the unit and write it under the output root.
///
/// Nothing is written unless generation succeeds for the whole unit.
pub fn execute(args: &GenerateArgs) -> Result<Vec<Artifact>, CliError> {
    let unit = load_unit(&args.input)?;
    let config = Config::new()
        .package_prefix(args.package.clone().unwrap_or_default())
        .tie(args.tie)
        .header(args.header);

    let artifacts = icegen_compiler::generate(&unit, &config)?;

    for artifact in &artifacts {
        let path = args.output.join(artifact.path());
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| CliError::Io {
                path: dir.to_owned(),
                source,
            })?;
        }
        std::fs::write(&path, &artifact.source).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote");
    }

    tracing::info!(
        count = artifacts.len(),
        output = %args.output.display(),
        "generated"
    );
    Ok(artifacts)
}
