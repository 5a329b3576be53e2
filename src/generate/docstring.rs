//! Docstring block formatting.

/// Block delimiter for Python docstrings
pub const DOCSTRING_QUOTE: &str = "\"\"\"";

/// Width of one indentation level
pub const INDENT_UNIT: &str = "  ";

/// Indentation level that puts a block's margin at `column`
pub fn indent_level(column: usize) -> usize {
    column / INDENT_UNIT.len()
}

/// Render `text` as a docstring block at `level`.
///
/// Returns the block's lines without line breaks: opening quotes, every line
/// of `text` behind the same margin, closing quotes. Content lines keep their
/// own inner indentation, whitespace-only lines included. Empty lines get no
/// margin, and trailing line breaks in `text` are dropped.
pub fn render_block(text: &str, level: usize) -> Vec<String> {
    let margin = INDENT_UNIT.repeat(level);
    let body = text.trim_end_matches(['\n', '\r']);

    let mut lines = Vec::new();
    lines.push(format!("{margin}{DOCSTRING_QUOTE}"));
    for line in body.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{margin}{line}"));
        }
    }
    lines.push(format!("{margin}{DOCSTRING_QUOTE}"));
    lines
}
