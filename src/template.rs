//! Placeholder-protected templating.
//!
//! Package documents mix two templating dialects. A fixed set of reserved
//! placeholders such as `${{package.name}}` belongs to the downstream build
//! pipeline and must survive untouched, while everything else is rendered
//! immediately with a Jinja-style engine.
//!
//! Only `{{ }}` opens an expression. Blocks use `{{% %}}` and comments use
//! `{{/* */}}`, so shell constructs like `${#arr[@]}`, `${v#prefix}` or
//! `printf "{%s}"` pass through as plain text.
//!
//! Rendering happens in three passes:
//!
//! 1. every reserved placeholder is replaced by its sentinel token
//! 2. the text is rendered with strict undefined semantics
//! 3. every sentinel token is replaced back by its placeholder
//!
//! Both replacement passes are literal substring replacements, so their
//! order only stays irrelevant while no placeholder or sentinel is a
//! substring of another. [`ReservedPlaceholders::new`] enforces that.
//!
//! # Example
//!
//! ```
//! use secdb::template::{apply_template, ReservedPlaceholders};
//!
//! let placeholders = ReservedPlaceholders::melange();
//! let rendered = apply_template(
//!     "runs: make DESTDIR=${{targets.destdir}} {{ \"install\" | upper }}",
//!     &placeholders,
//! )
//! .unwrap();
//!
//! assert_eq!(rendered, "runs: make DESTDIR=${{targets.destdir}} INSTALL");
//! ```

use minijinja::syntax::SyntaxConfig;
use minijinja::{context, AutoEscape, Environment, UndefinedBehavior};
use thiserror::Error;

use crate::error::{Result, SecdbError};

/// Placeholders interpreted by the melange build pipeline.
const MELANGE_PLACEHOLDERS: [(&str, &str); 9] = [
    ("${{package.name}}", "__SECDB_RESERVED_PACKAGE_NAME__"),
    ("${{package.version}}", "__SECDB_RESERVED_PACKAGE_VERSION__"),
    ("${{package.epoch}}", "__SECDB_RESERVED_PACKAGE_EPOCH__"),
    ("${{targets.destdir}}", "__SECDB_RESERVED_TARGETS_DESTDIR__"),
    ("${{targets.subpkgdir}}", "__SECDB_RESERVED_TARGETS_SUBPKGDIR__"),
    ("${{host.triplet.gnu}}", "__SECDB_RESERVED_HOST_TRIPLET_GNU__"),
    ("${{host.triplet.rust}}", "__SECDB_RESERVED_HOST_TRIPLET_RUST__"),
    ("${{cross.triplet.gnu.glibc}}", "__SECDB_RESERVED_CROSS_TRIPLET_GNU_GLIBC__"),
    ("${{cross.triplet.gnu.musl}}", "__SECDB_RESERVED_CROSS_TRIPLET_GNU_MUSL__"),
];

/// Every delimiter of [`environment`] starts with `{{` or ends with `}}`.
const TEMPLATE_DELIMITERS: [&str; 2] = ["{{", "}}"];

/// Errors raised by [`apply_template`].
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Syntax error or reference to an undefined variable.
    #[error(transparent)]
    Render(#[from] minijinja::Error),

    /// The document already contains a sentinel token literally.
    #[error("document contains reserved sentinel token {sentinel}")]
    SentinelCollision { sentinel: String },
}

/// An immutable table of reserved placeholders and their sentinel tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedPlaceholders {
    entries: Vec<(String, String)>,
}

impl ReservedPlaceholders {
    /// Builds a table from `(placeholder, sentinel)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SecdbError::InvalidPlaceholders`] if an entry is empty, a
    /// sentinel contains a template delimiter, or any placeholder or
    /// sentinel is a substring of another entry.
    pub fn new<I, P, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        let entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(placeholder, sentinel)| (placeholder.into(), sentinel.into()))
            .collect();

        validate(&entries).map_err(SecdbError::InvalidPlaceholders)?;
        Ok(Self { entries })
    }

    /// The nine placeholders reserved by melange pipelines.
    pub fn melange() -> Self {
        Self {
            entries: MELANGE_PLACEHOLDERS
                .iter()
                .map(|(placeholder, sentinel)| (placeholder.to_string(), sentinel.to_string()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(placeholder, sentinel)| (placeholder.as_str(), sentinel.as_str()))
    }

    /// Replaces every reserved placeholder with its sentinel.
    pub fn protect(&self, text: &str) -> String {
        self.iter()
            .fold(text.to_string(), |acc, (placeholder, sentinel)| {
                acc.replace(placeholder, sentinel)
            })
    }

    /// Replaces every sentinel with its reserved placeholder.
    pub fn restore(&self, text: &str) -> String {
        self.iter()
            .fold(text.to_string(), |acc, (placeholder, sentinel)| {
                acc.replace(sentinel, placeholder)
            })
    }
}

impl Default for ReservedPlaceholders {
    fn default() -> Self {
        Self::melange()
    }
}

fn validate(entries: &[(String, String)]) -> std::result::Result<(), String> {
    for (placeholder, sentinel) in entries {
        if placeholder.is_empty() || sentinel.is_empty() {
            return Err("placeholders and sentinels must not be empty".to_string());
        }
        if let Some(delimiter) = TEMPLATE_DELIMITERS.iter().find(|d| sentinel.contains(*d)) {
            return Err(format!(
                "sentinel {sentinel:?} contains template delimiter {delimiter:?}"
            ));
        }
    }

    let tokens: Vec<&str> = entries
        .iter()
        .flat_map(|(placeholder, sentinel)| [placeholder.as_str(), sentinel.as_str()])
        .collect();

    for (i, inner) in tokens.iter().enumerate() {
        for (j, outer) in tokens.iter().enumerate() {
            if i != j && outer.contains(inner) {
                return Err(format!("{inner:?} overlaps {outer:?}"));
            }
        }
    }

    Ok(())
}

fn environment() -> std::result::Result<Environment<'static>, minijinja::Error> {
    let syntax = SyntaxConfig::builder()
        .block_delimiters("{{%", "%}}")
        .variable_delimiters("{{", "}}")
        .comment_delimiters("{{/*", "*/}}")
        .build()?;

    let mut env = Environment::new();
    env.set_syntax(syntax);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    minijinja_contrib::add_to_environment(&mut env);
    Ok(env)
}

/// Renders `contents` while keeping reserved placeholders intact.
///
/// The render context is empty, so any variable reference outside the
/// reserved set fails.
pub fn apply_template(
    contents: &str,
    placeholders: &ReservedPlaceholders,
) -> std::result::Result<String, TemplateError> {
    if let Some((_, sentinel)) = placeholders.iter().find(|(_, s)| contents.contains(s)) {
        return Err(TemplateError::SentinelCollision {
            sentinel: sentinel.to_string(),
        });
    }

    let protected = placeholders.protect(contents);
    let rendered = environment()?.render_str(&protected, context! {})?;

    Ok(placeholders.restore(&rendered))
}
