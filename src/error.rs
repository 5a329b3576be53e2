use std::path::PathBuf;
use thiserror::Error;

/// Kind of structural scan error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// Header is indented at a depth that is neither top level nor a method
    UnrecognizedIndent,
    /// No `(` after the definition keyword
    MissingParen,
    /// Nothing between the keyword and `(`
    EmptyName,
    /// Definition body runs past the lookahead bound
    BodyTooLong,
}

impl ScanErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanErrorKind::UnrecognizedIndent => "Unrecognized indentation",
            ScanErrorKind::MissingParen => "Missing parameter list",
            ScanErrorKind::EmptyName => "Empty definition name",
            ScanErrorKind::BodyTooLong => "Definition too long",
        }
    }
}

/// Structural parse error raised while scanning definition headers.
///
/// Fatal for the file being scanned.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub message: String,
    /// 0-indexed line of the offending header
    pub line: usize,
    /// 0-indexed column where the underline starts
    pub col: usize,
    /// Underline width in characters
    pub width: usize,
    pub help: Option<String>,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            col,
            width: 1,
            help: None,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();
        output.push('\n');

        let line = self.line + 1;
        let col = self.col + 1;
        output.push_str(&format!(" {}file:{} {}:{}:{}\n", dim, reset, filename, line, col));
        output.push_str(&format!(
            "{}error:{} {}: {}\n",
            red,
            reset,
            self.kind.as_str(),
            self.message
        ));

        // Line lookup goes through the same normalization the scanner used
        let lines = crate::parser::LineSequence::from_text(source);
        if let Some(source_line) = lines.get(self.line) {
            let width = format!("{}", line).len().max(2);
            let shown = if color { highlight_python(source_line) } else { source_line.to_string() };
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = width));
            output.push_str(&format!("{}{:>width$} |{} {}\n", dim, line, reset, shown, width = width));

            let spaces = " ".repeat(self.col);
            let carets = "^".repeat(self.width);
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim, "", reset, spaces, red, carets, reset,
                width = width
            ));
        }

        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
                } else {
                    output.push_str(&format!("       {}\n", help_line));
                }
            }
        }

        output.push('\n');
        output
    }
}

/// Failure reported by an annotation provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A constructor was found outside of any class
    #[error("constructor `{name}` has no enclosing class")]
    MissingClassContext { name: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("authentication rejected ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("rate limited ({status}): {body}")]
    RateLimited { status: u16, body: String },
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Error while annotating one source file
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("docstring for `{name}` failed: {source}")]
    Provider {
        name: String,
        #[source]
        source: ProviderError,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnnotateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnnotateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Render the error for terminal output. Scan errors get source context.
    pub fn render(&self, source: &str, filename: &str, color: bool) -> String {
        match self {
            AnnotateError::Scan(err) if color => err.render_color(source, filename),
            AnnotateError::Scan(err) => err.render(source, filename),
            other if color => format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", other),
            other => format!("error: {}\n", other),
        }
    }
}

/// Minimal Python highlighting for the source line shown under an error
fn highlight_python(line: &str) -> String {
    const KEYWORD: &str = "\x1b[38;5;173m";
    const STRING: &str = "\x1b[38;5;72m";
    const NUMBER: &str = "\x1b[38;5;73m";
    const RESET: &str = "\x1b[0m";

    const KEYWORDS: &[&str] = &[
        "def", "class", "async", "return", "yield", "lambda", "None", "True", "False", "self",
    ];

    let mut result = String::with_capacity(line.len() * 2);
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '"' || chars[i] == '\'' {
            let quote = chars[i];
            result.push_str(STRING);
            result.push(quote);
            i += 1;
            while i < chars.len() && chars[i] != quote {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push(chars[i]);
                i += 1;
            }
            if i < chars.len() {
                result.push(quote);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        if chars[i].is_alphabetic() || chars[i] == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if KEYWORDS.contains(&word.as_str()) {
                result.push_str(KEYWORD);
                result.push_str(&word);
                result.push_str(RESET);
            } else {
                result.push_str(&word);
            }
            continue;
        }

        if chars[i].is_ascii_digit() {
            result.push_str(NUMBER);
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == '_') {
                result.push(chars[i]);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        result.push(chars[i]);
        i += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let source = "import os\n\n  def f(x):\n    pass\n";
        let err = ScanError::new(ScanErrorKind::UnrecognizedIndent, "header indented by 2 spaces", 2, 0)
            .with_width(2)
            .with_help("top-level definitions start at column 0; methods are indented 4 spaces");
        let rendered = err.render(source, "mod.py");

        assert!(rendered.contains(" file: mod.py:3:1"));
        assert!(rendered.contains("error: Unrecognized indentation: header indented by 2 spaces"));
        assert!(rendered.contains(" 3 |   def f(x):"));
        assert!(rendered.contains("   | ^^\n"));
        assert!(rendered.contains(" help: top-level definitions"));
    }

    #[test]
    fn test_render_color_has_escapes() {
        let err = ScanError::new(ScanErrorKind::MissingParen, "no `(` in header", 0, 4);
        let rendered = err.render_color("def f:\n", "a.py");
        assert!(rendered.contains("\x1b[1;31merror:"));
        assert!(rendered.contains("\x1b[38;5;173mdef"));
    }

    #[test]
    fn test_render_line_out_of_range() {
        let err = ScanError::new(ScanErrorKind::EmptyName, "empty", 10, 0);
        let rendered = err.render("def f():\n", "a.py");
        assert!(rendered.contains("a.py:11:1"));
        assert!(!rendered.contains(" |"));
    }

    #[test]
    fn test_annotate_error_display() {
        let err = AnnotateError::Provider {
            name: "compute".to_string(),
            source: ProviderError::RateLimited { status: 429, body: "slow down".to_string() },
        };
        assert_eq!(
            err.to_string(),
            "docstring for `compute` failed: rate limited (429): slow down"
        );
    }
}
