//! Unit loading shared by the commands.

use std::io::Read;
use std::path::Path;

use icegen_core::Unit;

use super::CliError;

/// Read a JSON unit from a file, or from stdin for `-`, and check it.
pub fn load_unit(path: &Path) -> Result<Unit, CliError> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Io {
                path: path.to_owned(),
                source,
            })?;
        text
    } else {
        std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_owned(),
            source,
        })?
    };

    let unit = Unit::from_json(&text)?;
    unit.check()?;
    tracing::debug!(path = %path.display(), definitions = unit.definitions.len(), "unit loaded");
    Ok(unit)
}
