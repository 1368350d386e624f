//! Package document loading.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SecdbError};
use crate::model::PackageRecord;
use crate::template::{apply_template, ReservedPlaceholders};

/// Loads a package-definition document and decodes its secfixes data.
///
/// The raw text goes through [`apply_template`] before it is decoded, so
/// reserved placeholders reach the decoder unchanged.
///
/// # Errors
///
/// Returns [`SecdbError::Read`], [`SecdbError::Encoding`],
/// [`SecdbError::Template`] or [`SecdbError::Decode`], each tagged with
/// `path`.
pub fn load_package(path: &Path, placeholders: &ReservedPlaceholders) -> Result<PackageRecord> {
    let bytes = fs::read(path).map_err(|source| SecdbError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8(bytes).map_err(|source| SecdbError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    let rendered = apply_template(&contents, placeholders).map_err(|source| {
        SecdbError::Template {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let record: PackageRecord =
        serde_yaml::from_str(&rendered).map_err(|source| SecdbError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), identity = %record.identity(), "loaded package");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_flow_document() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "foo.yaml",
            r#"{package: {name: foo, version: 1.0, epoch: 0}, secfixes: {"1.1": ["CVE-2020-1"]}}"#,
        );

        let record = load_package(&path, &ReservedPlaceholders::melange()).unwrap();

        assert_eq!(record.package.name, "foo");
        assert_eq!(record.package.version, "1.0");
        assert_eq!(record.secfixes["1.1"], vec!["CVE-2020-1".to_string()]);
    }

    #[test]
    fn test_placeholder_value_does_not_leak_sentinel() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "self.yaml",
            "package:\n  name: \"${{package.name}}\"\n  version: \"${{package.version}}\"\n",
        );

        let record = load_package(&path, &ReservedPlaceholders::melange()).unwrap();

        assert_eq!(record.package.name, "${{package.name}}");
        assert_eq!(record.package.version, "${{package.version}}");
        assert!(!record.package.name.contains("SECDB_RESERVED"));
    }

    #[test]
    fn test_templated_value_is_rendered() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "git.yaml",
            "package:\n  name: {{ \"GIT\" | lower }}\n  version: 2.42.0\n  epoch: {{ 1 + 1 }}\n",
        );

        let record = load_package(&path, &ReservedPlaceholders::melange()).unwrap();

        assert_eq!(record.identity(), "git-2.42.0-r2");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = load_package(&path, &ReservedPlaceholders::melange()).unwrap_err();

        assert!(matches!(err, SecdbError::Read { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_undefined_variable_is_template_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yaml", "package:\n  name: {{ name }}\n");

        let err = load_package(&path, &ReservedPlaceholders::melange()).unwrap_err();

        assert!(matches!(err, SecdbError::Template { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_shell_syntax_survives_loading() {
        let dir = TempDir::new().unwrap();
        let contents = "package:\n  name: bash-completion\n  version: 2.11.0\npipeline:\n  - runs: |\n      n=${#x}\n      y=${y#pre}\n      echo '#}'\n      printf \"{%s}\" ${{package.name}}\nsecfixes:\n  2.11.0-r1:\n    - CVE-2024-0001\n";
        let path = write(&dir, "bash-completion.yaml", contents);

        let placeholders = ReservedPlaceholders::melange();
        assert_eq!(apply_template(contents, &placeholders).unwrap(), contents);

        let record = load_package(&path, &placeholders).unwrap();
        assert_eq!(record.identity(), "bash-completion-2.11.0-r0");
        assert_eq!(record.secfixes["2.11.0-r1"], vec!["CVE-2024-0001".to_string()]);
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.yaml");
        fs::write(&path, b"package:\n  name: caf\xe9\n").unwrap();

        let err = load_package(&path, &ReservedPlaceholders::melange()).unwrap_err();

        assert!(matches!(err, SecdbError::Encoding { .. }));
        assert!(err.to_string().contains("latin1.yaml"));
    }

    #[test]
    fn test_bad_epoch_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "epoch.yaml", "package:\n  name: foo\n  epoch: latest\n");

        let err = load_package(&path, &ReservedPlaceholders::melange()).unwrap_err();

        assert!(matches!(err, SecdbError::Decode { .. }));
    }
}
