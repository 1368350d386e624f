//! Package document scanners.
//!
//! This module provides the [`Scanner`] trait and [`DirectoryScanner`],
//! which loads every package-definition document directly inside a
//! directory.
//!
//! # Example
//!
//! ```no_run
//! use secdb::scanner::{DirectoryScanner, Scanner};
//!
//! fn main() -> secdb::Result<()> {
//!     let scanner = DirectoryScanner::new("./os");
//!     for record in scanner.scan()? {
//!         println!("{}: {} fixed issues", record.identity(), record.fixed_issue_count());
//!     }
//!     Ok(())
//! }
//! ```

mod directory;

pub use directory::DirectoryScanner;

use crate::error::Result;
use crate::model::PackageRecord;

/// Trait for discovering and loading package documents from one source.
pub trait Scanner {
    /// Returns a human-readable name for this source.
    fn name(&self) -> String;

    /// Loads every document of this source, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns the first listing or loading error; no partial result is
    /// produced.
    fn scan(&self) -> Result<Vec<PackageRecord>>;
}
