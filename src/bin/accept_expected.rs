//! Binary to generate/update .expected.py and .expected.err fixture files
//!
//! Docstrings come from the `<stem>.docstrings.json` file next to each fixture,
//! so no completion endpoint is contacted.
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- basic   # Update only fixtures matching "basic"

use docstring_generator::{AnnotateError, DefinitionRecord, Pipeline, ProviderError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Deserialize)]
struct Canned {
    #[serde(default)]
    class: Option<String>,
    name: String,
    text: String,
}

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixtures)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.ends_with(".py") && !name.ends_with(".expected.py")
        })
    {
        let path = entry.path();

        if let Some(ref f) = filter {
            if !path.to_string_lossy().contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn load_canned(path: &Path) -> Vec<Canned> {
    let json_path = path.with_extension("docstrings.json");
    let Ok(raw) = fs::read_to_string(&json_path) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(canned) => canned,
        Err(e) => {
            eprintln!("Failed to parse {:?}: {}", json_path, e);
            Vec::new()
        }
    }
}

fn process_file(path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    let is_error_test = path.to_string_lossy().contains("/errors/");
    let canned = load_canned(path);
    let provider = |record: &DefinitionRecord| -> Result<String, ProviderError> {
        canned
            .iter()
            .find(|c| {
                c.name == record.name
                    && c.class.as_deref().is_none_or(|class| record.enclosing_class.as_option() == Some(class))
            })
            .map(|c| c.text.clone())
            .ok_or_else(|| ProviderError::Status {
                status: 404,
                body: format!("no canned docstring for {}", record.name),
            })
    };

    match Pipeline::new(provider).annotate(&source, path) {
        Ok(result) => {
            let expected_py = path.with_extension("expected.py");
            if let Err(e) = fs::write(&expected_py, &result.code) {
                eprintln!("Failed to write {:?}: {}", expected_py, e);
            } else {
                println!("  wrote {}", expected_py.display());
            }

            // Remove any stale .expected.err if this now annotates cleanly
            let expected_err = path.with_extension("expected.err");
            if expected_err.exists() {
                let _ = fs::remove_file(&expected_err);
            }
        }
        Err(AnnotateError::Scan(e)) if is_error_test => {
            let expected_err = path.with_extension("expected.err");
            let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");
            if let Err(err) = fs::write(&expected_err, e.render(&source, filename)) {
                eprintln!("Failed to write {:?}: {}", expected_err, err);
            } else {
                println!("  wrote {}", expected_err.display());
            }
        }
        Err(e) => {
            eprintln!("ERROR: {:?} failed to annotate: {}", path, e);
        }
    }
}
