// crates/auditgate-core/src/loader.rs
// ============================================================================
// Module: Spec Loader
// Description: Reads a YAML spec file from disk into a typed Spec.
// Purpose: Isolate the one place this crate touches the filesystem for spec
//          parsing, so the Validator/Planner operate on an in-memory value.
// Dependencies: serde_yaml, glob
// ============================================================================

//! ## Overview
//! [`SpecLoader::load`] never raises through a panic: a missing file is
//! [`CoreError::NotFound`], malformed YAML is [`CoreError::ParseError`].
//! [`SpecLoader::expand`] resolves a `--spec <path-or-glob>` argument into
//! every matching path, supporting the multi-spec `validate-spec` flow.

use std::path::Path;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::model::Spec;

/// Parses pipeline specs from YAML files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpecLoader;

impl SpecLoader {
    /// Loads and parses a single spec file.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if `path` does not exist, or
    /// [`CoreError::ParseError`] if its contents are not valid YAML matching
    /// the spec shape.
    pub fn load(&self, path: &Path) -> Result<Spec, CoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CoreError::NotFound { path: path.to_owned(), source })?;
        serde_yaml::from_str(&text).map_err(|source| CoreError::ParseError { detail: source.to_string() })
    }

    /// Expands a `--spec` argument into every matching path.
    ///
    /// If `pattern` contains no glob metacharacters it is returned as a
    /// single-element list verbatim (even if the path does not exist, so
    /// callers still get a clear [`CoreError::NotFound`] from [`Self::load`]
    /// rather than a silently empty match list).
    ///
    /// # Errors
    /// Returns [`CoreError::ParseError`] if `pattern` is not a syntactically
    /// valid glob.
    pub fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, CoreError> {
        if !pattern.contains('*') && !pattern.contains('?') {
            return Ok(vec![PathBuf::from(pattern)]);
        }
        let paths = glob::glob(pattern).map_err(|source| CoreError::ParseError { detail: source.to_string() })?;
        let mut matches: Vec<PathBuf> = paths.flatten().collect();
        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_missing_file_is_not_found() {
        let loader = SpecLoader;
        let err = loader.load(Path::new("/no/such/spec.yaml")).expect_err("missing file");
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn load_malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("spec.yaml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "suite: [unterminated").expect("write");

        let loader = SpecLoader;
        let err = loader.load(&path).expect_err("malformed yaml");
        assert!(matches!(err, CoreError::ParseError { .. }));
    }

    #[test]
    fn load_valid_spec() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("spec.yaml");
        std::fs::write(&path, "suite: demo\npipeline: []\n").expect("write");

        let loader = SpecLoader;
        let spec = loader.load(&path).expect("valid spec");
        assert_eq!(spec.suite, "demo");
        assert!(spec.pipeline.is_empty());
    }

    #[test]
    fn expand_non_glob_pattern_is_single_element() {
        let loader = SpecLoader;
        let matches = loader.expand("fixtures/spec.yaml").expect("expand");
        assert_eq!(matches, vec![PathBuf::from("fixtures/spec.yaml")]);
    }
}
