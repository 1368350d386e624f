use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Package, PackageEntry};

/// Fixed-in version mapped to the issue identifiers resolved by it.
///
/// Versions serialize in sorted order; identifiers keep document order.
pub type Secfixes = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub epoch: u64,
}

/// A package-definition document after templating and decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageRecord {
    pub package: PackageInfo,
    pub secfixes: Secfixes,
}

impl PackageRecord {
    /// Returns the package identity as apk-tools expects it,
    /// e.g. `name-version-rEPOCH`.
    pub fn identity(&self) -> String {
        format!(
            "{}-{}-r{}",
            self.package.name, self.package.version, self.package.epoch
        )
    }

    pub fn entry(&self) -> PackageEntry {
        PackageEntry {
            pkg: Package {
                name: self.package.name.clone(),
                secfixes: self.secfixes.clone(),
            },
        }
    }

    /// Total number of issue identifiers across all fixed-in versions.
    pub fn fixed_issue_count(&self) -> usize {
        self.secfixes.values().map(Vec::len).sum()
    }
}
