//! Definition header policies.
//!
//! The scanner is line based and does not parse Python. Everything it knows
//! about the source convention lives here: the keywords, the two header
//! indentation forms it accepts, how a name is cut out of a header, and
//! where a header ends.

use crate::error::{ScanError, ScanErrorKind};

/// Keyword introducing a function or method
pub const DEF_KEYWORD: &str = "def";

/// Keyword introducing a class
pub const CLASS_KEYWORD: &str = "class";

/// Object initializer; its docstring goes above the header
pub const CONSTRUCTOR_NAME: &str = "__init__";

/// Character that ends a header and opens the body
pub const BLOCK_TERMINATOR: char = ':';

/// Leading whitespace of a method header inside a class body
pub const METHOD_INDENT: &str = "    ";

const DUNDER: &str = "__";

/// Recognized header indentation forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderForm {
    /// `def` at column 0
    TopLevel,
    /// `def` after exactly one [`METHOD_INDENT`]
    Method,
}

impl HeaderForm {
    pub fn detect(line: &str) -> Option<Self> {
        let indent = leading_whitespace(line);
        if indent.is_empty() {
            Some(HeaderForm::TopLevel)
        } else if indent == METHOD_INDENT {
            Some(HeaderForm::Method)
        } else {
            None
        }
    }

    pub fn indent(&self) -> &'static str {
        match self {
            HeaderForm::TopLevel => "",
            HeaderForm::Method => METHOD_INDENT,
        }
    }
}

/// Text after `keyword` when `text` starts with it as a whole word
fn after_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Whether the line, ignoring leading whitespace, starts with the definition keyword
pub fn is_definition_header(line: &str) -> bool {
    after_keyword(line.trim_start(), DEF_KEYWORD).is_some()
}

/// Raw class text following the class keyword, kept as written
pub fn class_name(line: &str) -> Option<&str> {
    after_keyword(line.trim_start(), CLASS_KEYWORD).map(str::trim_start)
}

/// Column of the definition keyword on its header line
pub fn keyword_column(line: &str) -> usize {
    leading_whitespace(line).chars().count()
}

/// Cut the definition name out of a header line.
///
/// `line_no` is only used for error reporting.
pub fn extract_name(line: &str, line_no: usize) -> Result<String, ScanError> {
    let indent = leading_whitespace(line);
    let form = HeaderForm::detect(line).ok_or_else(|| {
        ScanError::new(
            ScanErrorKind::UnrecognizedIndent,
            format!(
                "definition header indented by {} character(s)",
                indent.chars().count()
            ),
            line_no,
            0,
        )
        .with_width(indent.chars().count())
        .with_help("top-level definitions start at column 0 and methods are indented 4 spaces; nested definitions are not supported")
    })?;

    let after_indent = &line[form.indent().len()..];
    let rest = after_keyword(after_indent, DEF_KEYWORD).ok_or_else(|| {
        ScanError::new(
            ScanErrorKind::UnrecognizedIndent,
            "not a definition header",
            line_no,
            keyword_column(line),
        )
    })?;

    let name_col = keyword_column(line) + DEF_KEYWORD.len();
    let paren = rest.find('(').ok_or_else(|| {
        ScanError::new(
            ScanErrorKind::MissingParen,
            "definition header has no `(`",
            line_no,
            name_col,
        )
        .with_width(rest.chars().count())
        .with_help("the name is read up to the opening parenthesis of the parameter list")
    })?;

    let name = rest[..paren].trim();
    if name.is_empty() {
        return Err(ScanError::new(
            ScanErrorKind::EmptyName,
            "definition header has no name before `(`",
            line_no,
            name_col,
        ));
    }

    Ok(name.to_string())
}

/// Whether a definition is sent for annotation.
///
/// Dunder names are skipped, except the constructor.
pub fn needs_docstring(name: &str) -> bool {
    name == CONSTRUCTOR_NAME || !name.contains(DUNDER)
}

/// What a header line did to the header being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStep {
    /// Brackets still open or the line is continued
    Continues,
    /// The line ends with [`BLOCK_TERMINATOR`] and opens the body
    Opens,
    /// The header is complete but its body sits on the same line
    Inline,
}

/// Tracks a header across physical lines until its block opens.
///
/// A line opens the block when its last significant character (trailing
/// comments ignored) is [`BLOCK_TERMINATOR`] and every bracket opened so far
/// in the header has been closed. A line that closes every bracket without
/// ending in the terminator finishes the header without a block.
#[derive(Debug, Default)]
pub struct HeaderTracker {
    depth: i32,
}

impl HeaderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next header line
    pub fn feed(&mut self, line: &str) -> HeaderStep {
        let mut last_significant = None;
        let mut quote: Option<char> = None;
        let mut chars = line.chars();

        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                last_significant = Some(c);
                continue;
            }

            match c {
                '#' => break,
                '"' | '\'' => quote = Some(c),
                '(' | '[' | '{' => self.depth += 1,
                ')' | ']' | '}' => self.depth -= 1,
                _ => {}
            }
            if !c.is_whitespace() {
                last_significant = Some(c);
            }
        }

        match last_significant {
            _ if self.depth > 0 => HeaderStep::Continues,
            Some(BLOCK_TERMINATOR) => HeaderStep::Opens,
            None | Some('\\') => HeaderStep::Continues,
            Some(_) => HeaderStep::Inline,
        }
    }
}
