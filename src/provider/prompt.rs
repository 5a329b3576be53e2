//! System instructions sent with every docstring request.

use crate::error::ProviderError;
use crate::model::{DefinitionRecord, EnclosingClass};

const FIELD_FORMAT: &str = ":param [ParamName]: [ParamDescription], defaults to [DefaultParamVal]\n\
:type [ParamName]: [ParamType](, optional)\n\
...\n\
:raises [ErrorType]: [ErrorDescription]\n\
...\n";

const RETURN_FORMAT: &str = ":return: [ReturnDescription]\n:rtype: [ReturnType]\n";

const SHARED_RULES: &str = "Mark parameters as optional only if they have a default value.\n\
Omit raises from the docstring if they don't occur.\n";

/// One docstring request: instructions, class context and the code to document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRequest {
    pub system: String,
    pub class_name: String,
    pub source: String,
}

impl AnnotationRequest {
    /// Build the request for a record, picking class-level instructions for
    /// constructors and function-level instructions otherwise.
    pub fn for_record(record: &DefinitionRecord) -> Result<Self, ProviderError> {
        let system = if record.is_constructor() {
            class_instructions(&record.enclosing_class, &record.name)?
        } else {
            function_instructions(&record.enclosing_class)
        };

        Ok(Self {
            system,
            class_name: record.enclosing_class.to_string(),
            source: record.code.clone(),
        })
    }
}

/// Instructions for a function or method
pub fn function_instructions(class: &EnclosingClass) -> String {
    format!(
        "You are a helpful assistant that writes docstrings for Python functions.\n\
         User will send you a function definition. Belonging to {class} class\n\
         You'll respond with only a multi-line docstring to every function user sends. \
         Don't append the start and ending triple quotes.\n\
         First part of the docstring is a description of functionality. \
         Use function body to generate this description.\n\
         Second part of the docstring is a description of signature and return values.\n\
         The second part should follow the rules of following format:\n\
         {FIELD_FORMAT}{RETURN_FORMAT}{SHARED_RULES}"
    )
}

/// Instructions for a class, sent with its constructor.
///
/// Refuses when no enclosing class was seen.
pub fn class_instructions(class: &EnclosingClass, constructor: &str) -> Result<String, ProviderError> {
    let EnclosingClass::Named(class) = class else {
        return Err(ProviderError::MissingClassContext {
            name: constructor.to_string(),
        });
    };

    Ok(format!(
        "You are a helpful assistant that writes docstrings for Python classes.\n\
         User will send you a class constructor definition. Belonging to {class} class\n\
         You'll respond with only a multi-line docstring to every class user sends the constructor for. \
         Don't append the start and ending triple quotes.\n\
         First part of the docstring is a description of the class. \
         Use class name and constructor body to generate this description.\n\
         Second part of the docstring is a description of signature and errors (if any) raised by the constructor.\n\
         The second part should follow the rules of following format:\n\
         {FIELD_FORMAT}{SHARED_RULES}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(class: EnclosingClass, name: &str) -> DefinitionRecord {
        DefinitionRecord {
            enclosing_class: class,
            code: format!("def {}(self):\n    pass", name),
            name: name.to_string(),
            filepath: PathBuf::from("m.py"),
            line: 0,
        }
    }

    #[test]
    fn test_function_request_at_module_level() {
        let request = AnnotationRequest::for_record(&record(EnclosingClass::None, "run")).unwrap();
        assert!(request.system.contains("Belonging to none class"));
        assert!(request.system.contains(":rtype: [ReturnType]"));
        assert_eq!(request.class_name, "none");
        assert_eq!(request.source, "def run(self):\n    pass");
    }

    #[test]
    fn test_constructor_request_uses_class_instructions() {
        let request =
            AnnotationRequest::for_record(&record(EnclosingClass::Named("Foo:".into()), "__init__")).unwrap();
        assert!(request.system.contains("docstrings for Python classes"));
        assert!(request.system.contains("Belonging to Foo: class"));
        assert!(!request.system.contains(":return:"));
        assert!(request.system.contains("Omit raises"));
    }

    #[test]
    fn test_constructor_without_class_is_refused() {
        let err = AnnotationRequest::for_record(&record(EnclosingClass::None, "__init__")).unwrap_err();
        assert!(matches!(err, ProviderError::MissingClassContext { ref name } if name == "__init__"));
    }

    #[test]
    fn test_lines_are_not_run_together() {
        let text = function_instructions(&EnclosingClass::None);
        assert!(text.contains("triple quotes.\nFirst part"));
        assert!(text.contains("defaults to [DefaultParamVal]\n:type"));
    }
}
