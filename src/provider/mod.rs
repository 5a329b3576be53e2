//! Docstring text providers.
//!
//! The pipeline only sees [`AnnotationProvider`]. The production provider
//! talks to an OpenAI-compatible chat completion endpoint; tests plug in
//! closures that return canned text.

pub mod openai;
pub mod prompt;

pub use openai::{OpenAiProvider, ProviderConfig};
pub use prompt::AnnotationRequest;

use crate::error::ProviderError;
use crate::model::DefinitionRecord;

/// Produces docstring text for a definition.
///
/// Calls are blocking and made one at a time, in scan order.
pub trait AnnotationProvider {
    fn docstring(&self, record: &DefinitionRecord) -> Result<String, ProviderError>;
}

impl<F> AnnotationProvider for F
where
    F: Fn(&DefinitionRecord) -> Result<String, ProviderError>,
{
    fn docstring(&self, record: &DefinitionRecord) -> Result<String, ProviderError> {
        self(record)
    }
}
