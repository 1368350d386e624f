//! Core data types for package documents and the security database.
//!
//! - [`PackageRecord`] - A decoded package-definition document
//! - [`Secfixes`] - Fixed-in version to issue identifiers
//! - [`PackageEntry`] - The part of a record exposed in the database
//! - [`Database`] - The apk-style security database
//!
//! # Example
//!
//! ```
//! use secdb::{Database, PackageRecord};
//!
//! let record: PackageRecord = serde_yaml::from_str(
//!     "package:\n  name: foo\n  version: 1.2.3\n  epoch: 1\n",
//! )
//! .unwrap();
//! assert_eq!(record.identity(), "foo-1.2.3-r1");
//!
//! let mut db = Database::new(vec!["x86_64".to_string()], "os", "https://packages.wolfi.dev");
//! db.push(record.entry());
//! assert_eq!(db.packages.len(), 1);
//! ```

mod database;
mod package;

pub use database::*;
pub use package::*;
