use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::docstring::{indent_level, render_block};
use super::output::{Insertion, Output};
use crate::model::{DefinitionRecord, DocstringMap};
use crate::parser::LineSequence;
use crate::parser::header::{HeaderStep, HeaderTracker, is_definition_header, keyword_column};

/// Rewritten file contents
#[derive(Debug, Clone)]
pub struct RewriteResult {
    pub code: String,
    pub insertions: Vec<Insertion>,
}

impl RewriteResult {
    /// Write the code to `path`, creating or truncating it
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.code)
    }
}

/// Re-emit `source` with docstring blocks inserted.
///
/// `records` must be the scan of `source`, in scan order. The preamble before
/// the first definition header is copied as is; each record's code follows,
/// with its docstring (if `docstrings` has one) placed above the header for
/// constructors and right after the block-opening line otherwise.
pub fn rewrite(source: &LineSequence, records: &[DefinitionRecord], docstrings: &DocstringMap) -> RewriteResult {
    let mut output = Output::new();

    let lines = source.lines();
    let first_header = lines
        .iter()
        .position(|line| is_definition_header(line))
        .unwrap_or(lines.len());
    for line in &lines[..first_header] {
        output.push_line(line);
    }

    for record in records {
        emit_record(record, docstrings.get(record), &mut output);
    }

    let (code, insertions) = output.finish(source.has_trailing_newline());
    debug!(insertions = insertions.len(), "rewrite finished");
    RewriteResult { code, insertions }
}

fn emit_record(record: &DefinitionRecord, docstring: Option<&str>, output: &mut Output) {
    let level = indent_level(keyword_column(record.header_line()));
    let constructor = record.is_constructor();

    if let (true, Some(text)) = (constructor, docstring) {
        emit_docstring(record, text, level, output);
    }

    let mut tracker = HeaderTracker::new();
    let mut step = HeaderStep::Continues;
    for line in record.code.split('\n') {
        output.push_line(line);
        if step != HeaderStep::Continues {
            continue;
        }
        step = tracker.feed(line);
        if let (HeaderStep::Opens, false, Some(text)) = (step, constructor, docstring) {
            emit_docstring(record, text, level, output);
        }
    }

    if step != HeaderStep::Opens && docstring.is_some() && !constructor {
        warn!(
            name = %record.name,
            line = record.line + 1,
            "header never opens a block; docstring not placed"
        );
    }
}

fn emit_docstring(record: &DefinitionRecord, text: &str, level: usize, output: &mut Output) {
    let block = render_block(text, level);
    let output_line = output.position();
    for line in &block {
        output.push_line(line);
    }
    output.add_insertion(Insertion {
        name: record.name.clone(),
        class: record.enclosing_class.as_option().map(str::to_string),
        source_line: record.line,
        output_line,
        line_count: block.len(),
    });
}
