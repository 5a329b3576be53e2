use serde::Serialize;

/// Where a docstring block landed in the rewritten file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insertion {
    pub name: String,
    /// Raw class text, `None` at module level
    pub class: Option<String>,
    /// 0-indexed header line in the source
    pub source_line: usize,
    /// 0-indexed line of the opening quotes in the output
    pub output_line: usize,
    /// Lines added, quotes included
    pub line_count: usize,
}

/// Output buffer that accumulates rewritten lines
pub struct Output {
    lines: Vec<String>,
    insertions: Vec<Insertion>,
}

impl Output {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            insertions: Vec::new(),
        }
    }

    /// Add one line (without its line break)
    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Index the next pushed line will get
    pub fn position(&self) -> usize {
        self.lines.len()
    }

    pub fn add_insertion(&mut self, insertion: Insertion) {
        self.insertions.push(insertion);
    }

    /// Join the lines, ending with a line break only when the source did
    pub fn finish(self, trailing_newline: bool) -> (String, Vec<Insertion>) {
        let mut code = self.lines.join("\n");
        if trailing_newline {
            code.push('\n');
        }
        (code, self.insertions)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
