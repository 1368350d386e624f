use std::path::PathBuf;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, SecdbError};
use crate::loader::load_package;
use crate::model::PackageRecord;
use crate::template::ReservedPlaceholders;

/// Loads every package document directly inside one directory.
///
/// Entries are visited in file-name order. Sub-directories are skipped,
/// every other entry is loaded as a document.
pub struct DirectoryScanner {
    dir: PathBuf,
    placeholders: ReservedPlaceholders,
}

impl DirectoryScanner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            placeholders: ReservedPlaceholders::melange(),
        }
    }

    pub fn with_placeholders(mut self, placeholders: ReservedPlaceholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Lists the document paths in discovery order.
    pub fn documents(&self) -> Result<Vec<PathBuf>> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| SecdbError::Walk {
                path: self.dir.clone(),
                source,
            })?;

            if entry.file_type().is_dir() {
                debug!(path = %entry.path().display(), "skipping directory");
                continue;
            }

            documents.push(entry.into_path());
        }

        Ok(documents)
    }
}

impl super::Scanner for DirectoryScanner {
    fn name(&self) -> String {
        self.dir.display().to_string()
    }

    fn scan(&self) -> Result<Vec<PackageRecord>> {
        let documents = self.documents()?;
        info!(dir = %self.dir.display(), documents = documents.len(), "scanning directory");

        documents
            .iter()
            .map(|path| load_package(path, &self.placeholders))
            .collect()
    }
}
