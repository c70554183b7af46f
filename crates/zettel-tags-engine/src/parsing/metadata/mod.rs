//! # Metadata token interpreter
//!
//! Metadata blocks (YAML front matter, or a whole `.yaml` file) are
//! tokenised by `yaml-rust2`; [`events`] adapts that stream and
//! [`MetadataInterpreter`] walks it, creating tags for the recognised fields
//! and leaving identifier/title attachment to the [`DeferredAnnotator`].

pub mod annotator;
pub mod events;
pub mod interpreter;
pub mod scope;

pub use annotator::{DeferredAnnotator, Scope};
pub use events::{MetadataError, MetadataEvent, tokenize};
pub use interpreter::MetadataInterpreter;
pub use scope::Scratch;

use crate::tags::TagSink;

/// Runs one metadata stream through `interpreter`.
///
/// A tokenizer error ends the stream early: the tags created so far are
/// kept and annotated with what was seen, and the error is returned for
/// reporting.
pub fn interpret_block(
    text: &str,
    first_line: usize,
    interpreter: &mut MetadataInterpreter<'_>,
    sink: &mut dyn TagSink,
) -> Result<(), MetadataError> {
    let result = tokenize(text, first_line, |event| interpreter.handle(event, sink));
    if result.is_err() {
        interpreter.finish(sink);
    }
    result
}
