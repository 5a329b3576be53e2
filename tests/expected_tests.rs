//! Fixture runner: annotates every `tests/fixtures/*.py` with the canned
//! docstrings in its `.docstrings.json` and compares against `.expected.py`.
//! Files under `tests/fixtures/errors/` must fail with the scan error in
//! their `.expected.err`.
//!
//! Run with: cargo test --test expected_tests

use docstring_generator::{AnnotateError, DefinitionRecord, Pipeline, ProviderError};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One canned answer. `class` narrows the match when two classes share a method name.
#[derive(Debug, Clone, Deserialize)]
struct Canned {
    #[serde(default)]
    class: Option<String>,
    name: String,
    text: String,
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn collect(pattern: &str) -> Vec<PathBuf> {
    let pattern = fixtures_dir().join(pattern);
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(Result::ok)
        .filter(|p| !p.to_string_lossy().ends_with(".expected.py"))
        .collect();
    files.sort();
    files
}

fn load_canned(path: &Path) -> Result<Vec<Canned>, Failed> {
    let json_path = path.with_extension("docstrings.json");
    if !json_path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(&json_path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn canned_provider(
    canned: Vec<Canned>,
) -> impl Fn(&DefinitionRecord) -> Result<String, ProviderError> {
    move |record: &DefinitionRecord| {
        canned
            .iter()
            .find(|c| {
                c.name == record.name
                    && c.class.as_deref().is_none_or(|class| record.enclosing_class.as_option() == Some(class))
            })
            .map(|c| c.text.clone())
            .ok_or_else(|| ProviderError::Status {
                status: 404,
                body: format!("no canned docstring for {} ({})", record.name, record.enclosing_class),
            })
    }
}

fn check_output(path: &Path) -> Result<(), Failed> {
    let source = fs::read_to_string(path)?;
    let expected = fs::read_to_string(path.with_extension("expected.py"))
        .map_err(|e| format!("missing expected file for {}: {e}", path.display()))?;

    let pipeline = Pipeline::new(canned_provider(load_canned(path)?));
    let result = pipeline
        .annotate(&source, path)
        .map_err(|e| format!("annotation failed for {}: {e}", path.display()))?;

    if result.code != expected {
        return Err(format!(
            "output mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
            path.display(),
            expected,
            result.code
        )
        .into());
    }
    Ok(())
}

fn check_error(path: &Path) -> Result<(), Failed> {
    let source = fs::read_to_string(path)?;
    let expected = fs::read_to_string(path.with_extension("expected.err"))
        .map_err(|e| format!("missing expected.err for {}: {e}", path.display()))?;
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");

    let pipeline = Pipeline::new(canned_provider(Vec::new()));
    match pipeline.annotate(&source, path) {
        Ok(_) => Err(format!("expected a scan error for {}", path.display()).into()),
        Err(AnnotateError::Scan(err)) => {
            let actual = err.render(&source, filename);
            if actual.trim() != expected.trim() {
                return Err(format!(
                    "error mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
                    path.display(),
                    expected.trim(),
                    actual.trim()
                )
                .into());
            }
            Ok(())
        }
        Err(other) => Err(format!("expected a scan error, got: {other}").into()),
    }
}

fn trial_name(path: &Path) -> String {
    let parent = path.parent().and_then(|p| p.file_name()).unwrap_or_default();
    let stem = path.file_stem().unwrap_or_default();
    format!("{}@{}", parent.to_string_lossy(), stem.to_string_lossy())
}

fn main() {
    let args = Arguments::from_args();

    let mut trials: Vec<Trial> = collect("*.py")
        .into_iter()
        .map(|path| Trial::test(trial_name(&path), move || check_output(&path)))
        .collect();

    trials.extend(
        collect("errors/*.py")
            .into_iter()
            .map(|path| Trial::test(trial_name(&path), move || check_error(&path))),
    );

    libtest_mimic::run(&args, trials).exit();
}
