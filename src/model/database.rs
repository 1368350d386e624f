use serde::{Deserialize, Serialize};

use super::Secfixes;

/// Download URL template understood by apk security database consumers.
///
/// Filled in by the consumer, not by this crate's templating pass.
pub const APK_URL: &str = "{{urlprefix}}/{{reponame}}/{{arch}}/{{pkg.name}}-{{pkg.ver}}.apk";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub secfixes: Secfixes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub pkg: Package,
}

/// An apk-style security database.
///
/// `packages` keeps the order in which documents were discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub apkurl: String,
    pub archs: Vec<String>,
    pub reponame: String,
    pub urlprefix: String,
    pub packages: Vec<PackageEntry>,
}

impl Database {
    pub fn new(
        archs: Vec<String>,
        reponame: impl Into<String>,
        urlprefix: impl Into<String>,
    ) -> Self {
        Self {
            apkurl: APK_URL.to_string(),
            archs,
            reponame: reponame.into(),
            urlprefix: urlprefix.into(),
            packages: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: PackageEntry) {
        self.packages.push(entry);
    }
}
