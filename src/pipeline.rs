use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::AnnotateError;
use crate::generate::{Insertion, RewriteResult, rewrite};
use crate::model::{DefinitionRecord, DocstringMap};
use crate::parser::header::needs_docstring;
use crate::parser::{LineSequence, scan};
use crate::provider::AnnotationProvider;

/// File selection settings.
#[derive(Debug, Clone)]
pub struct Options {
    /// Extension of files to annotate, without the dot (default: "py")
    pub extension: String,
    /// Files whose name starts with this are left alone (default: "test_")
    pub skip_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            skip_prefix: "test_".to_string(),
        }
    }
}

impl Options {
    /// Whether a file name is picked up by a folder run
    pub fn selects(&self, file_name: &str) -> bool {
        let suffix = format!(".{}", self.extension);
        file_name.ends_with(&suffix) && !file_name.starts_with(&self.skip_prefix)
    }
}

/// Result of annotating one file in a folder run
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<Vec<Insertion>, AnnotateError>,
}

/// Serializable view of a [`FileOutcome`]
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub insertions: Vec<Insertion>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn report(&self) -> FileReport {
        let (status, error, insertions) = match &self.result {
            Ok(insertions) => ("written", None, insertions.clone()),
            Err(err) => ("failed", Some(err.to_string()), Vec::new()),
        };
        FileReport {
            input: self.input.clone(),
            output: self.output.clone(),
            status,
            error,
            insertions,
        }
    }
}

/// Scan, annotate and rewrite source files
pub struct Pipeline<P> {
    provider: P,
    options: Options,
}

impl<P: AnnotationProvider> Pipeline<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            options: Options::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Ask the provider for every record that needs a docstring, in order.
    ///
    /// Stops at the first provider failure.
    pub fn collect_docstrings(&self, records: &[DefinitionRecord]) -> Result<DocstringMap, AnnotateError> {
        let mut docstrings = DocstringMap::new();
        for record in records {
            if !needs_docstring(&record.name) {
                debug!(name = %record.name, "skipping dunder definition");
                continue;
            }
            let text = self
                .provider
                .docstring(record)
                .map_err(|source| AnnotateError::Provider {
                    name: record.name.clone(),
                    source,
                })?;
            info!("Got docstring for {}", record.name);
            docstrings.insert(record, text);
        }
        Ok(docstrings)
    }

    /// Annotate source text. `filepath` tags the records.
    pub fn annotate(&self, source: &str, filepath: &Path) -> Result<RewriteResult, AnnotateError> {
        let lines = LineSequence::from_text(source);
        let records = scan(&lines, filepath)?;
        debug!(path = %filepath.display(), definitions = records.len(), "scanned");
        let docstrings = self.collect_docstrings(&records)?;
        Ok(rewrite(&lines, &records, &docstrings))
    }

    /// Annotate `input` and write the result to `output`.
    ///
    /// Nothing is written unless scanning and every provider call succeed.
    pub fn annotate_file(&self, input: &Path, output: &Path) -> Result<Vec<Insertion>, AnnotateError> {
        info!("Processing file {}", input.display());
        let source = fs::read_to_string(input).map_err(|e| AnnotateError::io(input, e))?;
        let result = self.annotate(&source, input)?;
        result.write_to(output).map_err(|e| AnnotateError::io(output, e))?;
        Ok(result.insertions)
    }

    /// Files in `folder` (not recursive) picked up by the options, sorted by name
    pub fn select_files(&self, folder: &Path) -> Result<Vec<PathBuf>, AnnotateError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(folder).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(folder).to_path_buf();
                AnnotateError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if self.options.selects(&name) {
                files.push(entry.path().to_path_buf());
            }
        }
        Ok(files)
    }

    /// Annotate every selected file of `input` into `output`.
    ///
    /// The output folder is created if missing. A failing file does not stop
    /// the run; each file gets its own outcome.
    pub fn process_folder(&self, input: &Path, output: &Path) -> Result<Vec<FileOutcome>, AnnotateError> {
        if !input.is_dir() {
            return Err(AnnotateError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "folder does not exist"),
            ));
        }
        fs::create_dir_all(output).map_err(|e| AnnotateError::io(output, e))?;

        let files = self.select_files(input)?;
        let outcomes = files
            .into_iter()
            .map(|path| {
                let target = output.join(path.file_name().unwrap_or_default());
                let result = self.annotate_file(&path, &target);
                FileOutcome {
                    input: path,
                    output: target,
                    result,
                }
            })
            .collect();
        Ok(outcomes)
    }
}
