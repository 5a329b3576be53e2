//! Definition scanner.
//!
//! Walks a [`LineSequence`] once, remembering the most recent class line,
//! and yields one [`DefinitionRecord`] per definition header. A record's code
//! runs from its header up to the next header or end of file.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::header::{class_name, extract_name, is_definition_header};
use super::lines::LineSequence;
use crate::error::{ScanError, ScanErrorKind};
use crate::model::{DefinitionRecord, EnclosingClass};

/// Most lines a single definition may span, header included
pub const MAX_LOOKAHEAD: usize = 10_000;

/// Lazy iterator over the definitions of one file.
///
/// Stops for good after yielding the first error.
pub struct Scanner<'a> {
    lines: &'a [String],
    filepath: PathBuf,
    cursor: usize,
    current_class: EnclosingClass,
    max_lookahead: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(lines: &'a LineSequence, filepath: impl AsRef<Path>) -> Self {
        Self {
            lines: lines.lines(),
            filepath: filepath.as_ref().to_path_buf(),
            cursor: 0,
            current_class: EnclosingClass::None,
            max_lookahead: MAX_LOOKAHEAD,
            failed: false,
        }
    }

    pub fn with_max_lookahead(mut self, max_lookahead: usize) -> Self {
        self.max_lookahead = max_lookahead.max(1);
        self
    }

    /// Index one past the last line of the definition starting at `start`
    fn definition_end(&self, start: usize) -> Result<usize, ScanError> {
        let next_header = self.lines[start + 1..]
            .iter()
            .position(|line| is_definition_header(line))
            .map(|offset| start + 1 + offset)
            .unwrap_or(self.lines.len());

        if next_header - start > self.max_lookahead {
            return Err(ScanError::new(
                ScanErrorKind::BodyTooLong,
                format!(
                    "definition spans {} lines, more than the {} line limit",
                    next_header - start,
                    self.max_lookahead
                ),
                start,
                0,
            ));
        }

        Ok(next_header)
    }

    fn record_at(&self, start: usize) -> Result<DefinitionRecord, ScanError> {
        let header = &self.lines[start];
        let name = extract_name(header, start)?;
        let end = self.definition_end(start)?;

        Ok(DefinitionRecord {
            enclosing_class: self.current_class.clone(),
            code: self.lines[start..end].join("\n"),
            name,
            filepath: self.filepath.clone(),
            line: start,
        })
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<DefinitionRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while self.cursor < self.lines.len() {
            let index = self.cursor;
            self.cursor += 1;
            let line = &self.lines[index];

            if let Some(class) = class_name(line) {
                self.current_class = EnclosingClass::Named(class.to_string());
            }

            if is_definition_header(line) {
                let result = self.record_at(index);
                match &result {
                    Ok(record) => debug!(
                        name = %record.name,
                        class = %record.enclosing_class,
                        line = index + 1,
                        "found definition"
                    ),
                    Err(_) => self.failed = true,
                }
                return Some(result);
            }
        }

        None
    }
}

/// Scan a whole file, stopping at the first structural error
pub fn scan(lines: &LineSequence, filepath: impl AsRef<Path>) -> Result<Vec<DefinitionRecord>, ScanError> {
    Scanner::new(lines, filepath).collect()
}
