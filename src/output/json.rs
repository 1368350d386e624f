use std::fs;
use std::path::Path;

use crate::error::{Result, SecdbError};
use crate::model::{Database, PackageRecord};

/// Encodes the database as two-space indented JSON.
pub fn to_json(db: &Database) -> Result<String> {
    Ok(serde_json::to_string_pretty(db)?)
}

/// Writes the database to `path`, creating missing parent directories.
pub fn write_database(db: &Database, path: &Path) -> Result<()> {
    let json = to_json(db)?;
    let write_err = |source| SecdbError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    fs::write(path, json).map_err(write_err)
}

pub fn print_records_json(records: &[PackageRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{}", json);
    Ok(())
}
