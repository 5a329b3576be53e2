//! Line store.
//!
//! Source text is split into lines once, after every line break (`\r\n`,
//! lone `\r`, or `\n`) has been normalized to `\n`. Line indices are
//! therefore the same no matter which platform wrote the file.

use std::fs;
use std::io;
use std::path::Path;

/// Ordered lines of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
    /// Whether the text ended with a line break
    trailing_newline: bool,
}

impl LineSequence {
    pub fn from_text(text: &str) -> Self {
        let normalized = normalize_line_endings(text);
        let trailing_newline = normalized.ends_with('\n');

        let body = if trailing_newline {
            &normalized[..normalized.len() - 1]
        } else {
            normalized.as_str()
        };

        let lines = if normalized.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(str::to_string).collect()
        };

        Self {
            lines,
            trailing_newline,
        }
    }

    /// Read and split a file from disk
    pub fn read(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Join the lines back into text, restoring the final line break if the
    /// original had one.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }
}

fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
