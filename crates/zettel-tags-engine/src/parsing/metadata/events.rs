//! Structural events of a metadata block.
//!
//! `yaml-rust2` does the tokenising. [`EventAdapter`] turns its event stream
//! into [`MetadataEvent`]s: a `Key` event before the first node of every
//! mapping entry, and note line numbers instead of block-relative markers.

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataEvent {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
    /// The next node is the key of a mapping entry.
    Key,
    /// A scalar; plain `~`, `null` and empty scalars have an empty value.
    Scalar { value: String, line: usize },
    Alias { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("metadata error at line {line}: {message}")]
pub struct MetadataError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Mapping { expect_key: bool },
    Sequence,
}

pub struct EventAdapter<F> {
    first_line: usize,
    frames: Vec<Frame>,
    emit: F,
}

impl<F: FnMut(MetadataEvent)> EventAdapter<F> {
    /// `first_line` is the note line the block text starts on.
    pub fn new(first_line: usize, emit: F) -> Self {
        Self {
            first_line,
            frames: Vec::new(),
            emit,
        }
    }

    fn line(&self, mark: &Marker) -> usize {
        self.first_line + mark.line().saturating_sub(1)
    }

    /// Called before every node; emits `Key` when the node is an entry key.
    fn node_start(&mut self) {
        if let Some(Frame::Mapping { expect_key }) = self.frames.last_mut() {
            let is_key = *expect_key;
            *expect_key = !is_key;
            if is_key {
                (self.emit)(MetadataEvent::Key);
            }
        }
    }
}

impl<F: FnMut(MetadataEvent)> MarkedEventReceiver for EventAdapter<F> {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        let event = match ev {
            Event::StreamStart { .. } => MetadataEvent::StreamStart,
            Event::StreamEnd { .. } => MetadataEvent::StreamEnd,
            Event::DocumentStart { .. } => MetadataEvent::DocumentStart,
            Event::DocumentEnd { .. } => MetadataEvent::DocumentEnd,
            Event::MappingStart { .. } => {
                self.node_start();
                self.frames.push(Frame::Mapping { expect_key: true });
                MetadataEvent::MappingStart
            }
            Event::MappingEnd { .. } => {
                self.frames.pop();
                MetadataEvent::MappingEnd
            }
            Event::SequenceStart { .. } => {
                self.node_start();
                self.frames.push(Frame::Sequence);
                MetadataEvent::SequenceStart
            }
            Event::SequenceEnd { .. } => {
                self.frames.pop();
                MetadataEvent::SequenceEnd
            }
            Event::Scalar(value, style, ..) => {
                self.node_start();
                let value = value.to_string();
                let is_null = style == TScalarStyle::Plain && matches!(value.as_str(), "~" | "null");
                MetadataEvent::Scalar {
                    value: if is_null { String::new() } else { value },
                    line: self.line(&mark),
                }
            }
            Event::Alias { .. } => {
                self.node_start();
                MetadataEvent::Alias {
                    line: self.line(&mark),
                }
            }
            _ => return,
        };
        (self.emit)(event);
    }
}

/// Tokenises `text` and hands every event to `emit`.
///
/// Events before a syntax error are still delivered; the error is returned
/// afterwards.
pub fn tokenize(
    text: &str,
    first_line: usize,
    emit: impl FnMut(MetadataEvent),
) -> Result<(), MetadataError> {
    let mut adapter = EventAdapter::new(first_line, emit);
    let mut parser = Parser::new_from_str(text);
    parser
        .load(&mut adapter, true)
        .map_err(|err| to_error(&err, first_line))
}

fn to_error(err: &ScanError, first_line: usize) -> MetadataError {
    MetadataError {
        line: first_line + err.marker().line().saturating_sub(1),
        message: err.info().to_string(),
    }
}
