use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::parser::header::CONSTRUCTOR_NAME;

/// The class a definition belongs to.
///
/// `Named` holds the raw text after the `class` keyword, base classes and
/// trailing colon included.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EnclosingClass {
    #[default]
    None,
    Named(String),
}

impl EnclosingClass {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            EnclosingClass::None => None,
            EnclosingClass::Named(name) => Some(name),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, EnclosingClass::None)
    }
}

impl fmt::Display for EnclosingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnclosingClass::None => write!(f, "none"),
            EnclosingClass::Named(name) => write!(f, "{}", name),
        }
    }
}

/// One function or method found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub enclosing_class: EnclosingClass,
    /// Header line through the line before the next definition (or EOF), joined with `\n`
    pub code: String,
    pub name: String,
    pub filepath: PathBuf,
    /// 0-indexed line of the header in the source
    pub line: usize,
}

impl DefinitionRecord {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    pub fn header_line(&self) -> &str {
        self.code.split('\n').next().unwrap_or_default()
    }

    pub fn key(&self) -> DefinitionKey {
        DefinitionKey {
            filepath: self.filepath.clone(),
            enclosing_class: self.enclosing_class.clone(),
            name: self.name.clone(),
            line: self.line,
        }
    }
}

/// Identity of a definition within a scan.
///
/// The header line takes part so that two same-named methods in one class
/// (property getter and setter, say) stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefinitionKey {
    pub filepath: PathBuf,
    pub enclosing_class: EnclosingClass,
    pub name: String,
    pub line: usize,
}

/// Generated docstring text for the definitions of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocstringMap {
    entries: BTreeMap<DefinitionKey, String>,
}

impl DocstringMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: &DefinitionRecord, text: impl Into<String>) {
        self.entries.insert(record.key(), text.into());
    }

    pub fn get(&self, record: &DefinitionRecord) -> Option<&str> {
        self.entries.get(&record.key()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(class: EnclosingClass, name: &str, line: usize) -> DefinitionRecord {
        DefinitionRecord {
            enclosing_class: class,
            code: format!("    def {}(self):\n        pass", name),
            name: name.to_string(),
            filepath: PathBuf::from("shapes.py"),
            line,
        }
    }

    #[test]
    fn test_same_name_in_two_classes_is_distinct() {
        let area_a = record(EnclosingClass::Named("Square:".into()), "area", 1);
        let area_b = record(EnclosingClass::Named("Circle:".into()), "area", 5);

        let mut map = DocstringMap::new();
        map.insert(&area_a, "Square area.");
        map.insert(&area_b, "Circle area.");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&area_a), Some("Square area."));
        assert_eq!(map.get(&area_b), Some("Circle area."));
    }

    #[test]
    fn test_constructor_detection() {
        let init = record(EnclosingClass::Named("Foo:".into()), "__init__", 1);
        let init_subclass = record(EnclosingClass::Named("Foo:".into()), "__init_subclass__", 3);
        assert!(init.is_constructor());
        assert!(!init_subclass.is_constructor());
    }

    #[test]
    fn test_header_line() {
        let rec = record(EnclosingClass::None, "run", 0);
        assert_eq!(rec.header_line(), "    def run(self):");
    }

    #[test]
    fn test_enclosing_class_display() {
        assert_eq!(EnclosingClass::None.to_string(), "none");
        assert_eq!(EnclosingClass::Named("Foo(Base):".into()).to_string(), "Foo(Base):");
    }
}
