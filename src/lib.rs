//! Docstring generator for Python sources.
//!
//! A file goes through four steps:
//!
//! 1. [`LineSequence`] splits it into lines with normalized line endings.
//! 2. [`Scanner`] yields one [`DefinitionRecord`] per `def` header, tagged
//!    with the most recent `class` line above it.
//! 3. An [`AnnotationProvider`] produces docstring text for each record,
//!    collected into a [`DocstringMap`].
//! 4. [`rewrite`] re-emits the file unchanged apart from the inserted
//!    docstring blocks.
//!
//! [`Pipeline`] strings the steps together for a single file or a folder.
//!
//! ```
//! use std::path::Path;
//! use docstring_generator::{DefinitionRecord, Pipeline, ProviderError};
//!
//! let provider = |record: &DefinitionRecord| -> Result<String, ProviderError> {
//!     Ok(format!("Docs for {}.", record.name))
//! };
//! let result = Pipeline::new(provider)
//!     .annotate("def add(a, b):\n    return a + b\n", Path::new("math.py"))
//!     .unwrap();
//! assert_eq!(result.code, "def add(a, b):\n\"\"\"\nDocs for add.\n\"\"\"\n    return a + b\n");
//! ```

pub mod error;
pub mod generate;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod provider;

pub use error::{AnnotateError, ProviderError, ScanError, ScanErrorKind};
pub use generate::{Insertion, RewriteResult, rewrite};
pub use model::{DefinitionKey, DefinitionRecord, DocstringMap, EnclosingClass};
pub use parser::{LineSequence, Scanner, scan};
pub use pipeline::{FileOutcome, FileReport, Options, Pipeline};
pub use provider::{AnnotationProvider, AnnotationRequest, OpenAiProvider, ProviderConfig};
