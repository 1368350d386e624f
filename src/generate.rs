//! Security database generation.
//!
//! [`Generator`] validates the configuration, loads every document of the
//! given directories in order, and collects their secfixes into a
//! [`Database`]. The first failure aborts the whole run.
//!
//! # Example
//!
//! ```no_run
//! use secdb::{Config, Generator};
//!
//! fn main() -> secdb::Result<()> {
//!     let config = Config::default().with_repo_name("os");
//!     let db = Generator::new(config)?.run(&["./os"])?;
//!     println!("{} packages", db.packages.len());
//!     Ok(())
//! }
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, SecdbError};
use crate::model::Database;
use crate::output::write_database;
use crate::scanner::{DirectoryScanner, Scanner};
use crate::template::ReservedPlaceholders;

pub struct Generator {
    config: Config,
    placeholders: ReservedPlaceholders,
}

impl Generator {
    /// Creates a generator for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SecdbError::MissingRepoName`] if no repository name is set.
    /// Nothing is read from disk before this check.
    pub fn new(config: Config) -> Result<Self> {
        if config.repo_name.is_empty() {
            return Err(SecdbError::MissingRepoName);
        }

        Ok(Self {
            config,
            placeholders: ReservedPlaceholders::melange(),
        })
    }

    pub fn with_placeholders(mut self, placeholders: ReservedPlaceholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the database from `dirs` without writing it.
    pub fn build<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<Database> {
        let mut db = Database::new(
            self.config.archs.clone(),
            &self.config.repo_name,
            &self.config.base_url,
        );

        for dir in dirs {
            let scanner =
                DirectoryScanner::new(dir.as_ref()).with_placeholders(self.placeholders.clone());

            let records = scanner.scan()?;
            debug!(source = %scanner.name(), records = records.len(), "collected secfixes");

            for record in records {
                db.push(record.entry());
            }
        }

        Ok(db)
    }

    /// Builds the database from `dirs` and writes it to the configured
    /// output path.
    pub fn run<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<Database> {
        let db = self.build(dirs)?;
        write_database(&db, &self.config.output)?;

        info!(
            output = %self.config.output.display(),
            packages = db.packages.len(),
            "wrote security database"
        );
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_repo_name_fails_before_io() {
        let err = Generator::new(Config::default()).err().unwrap();
        assert!(matches!(err, SecdbError::MissingRepoName));
    }

    #[test]
    fn test_header_fields_from_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::default()
            .with_repo_name("extras")
            .with_base_url("https://mirror.example")
            .with_archs(vec!["aarch64".to_string(), "x86_64".to_string()]);

        let db = Generator::new(config).unwrap().build(&[dir.path()]).unwrap();

        assert_eq!(db.reponame, "extras");
        assert_eq!(db.urlprefix, "https://mirror.example");
        assert_eq!(db.archs, ["aarch64", "x86_64"]);
        assert_eq!(db.apkurl, crate::model::APK_URL);
        assert!(db.packages.is_empty());
    }

    #[test]
    fn test_directories_processed_in_argument_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("a.yaml"), "package:\n  name: from-second\n").unwrap();
        fs::write(first.path().join("z.yaml"), "package:\n  name: from-first\n").unwrap();

        let generator = Generator::new(Config::default().with_repo_name("os")).unwrap();
        let db = generator.build(&[first.path(), second.path()]).unwrap();
        let names: Vec<_> = db.packages.iter().map(|e| e.pkg.name.as_str()).collect();

        assert_eq!(names, ["from-first", "from-second"]);
    }

    #[test]
    fn test_failure_in_later_directory_aborts() {
        let good = TempDir::new().unwrap();
        let bad = TempDir::new().unwrap();
        fs::write(good.path().join("a.yaml"), "package:\n  name: a\n").unwrap();
        fs::write(bad.path().join("b.yaml"), "package: [not, a, mapping]\n").unwrap();

        let generator = Generator::new(Config::default().with_repo_name("os")).unwrap();
        let err = generator.build(&[good.path(), bad.path()]).unwrap_err();

        assert!(matches!(err, SecdbError::Decode { .. }));
    }

    #[test]
    fn test_custom_placeholders_are_used() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.yaml"),
            "package:\n  name: \"${{vars.name}}\"\n",
        )
        .unwrap();

        let config = Config::default().with_repo_name("os");
        assert!(Generator::new(config.clone()).unwrap().build(&[dir.path()]).is_err());

        let placeholders =
            ReservedPlaceholders::new([("${{vars.name}}", "__VARS_NAME__")]).unwrap();
        let db = Generator::new(config)
            .unwrap()
            .with_placeholders(placeholders)
            .build(&[dir.path()])
            .unwrap();

        assert_eq!(db.packages[0].pkg.name, "${{vars.name}}");
    }
}
