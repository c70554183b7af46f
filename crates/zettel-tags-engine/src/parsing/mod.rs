//! # Parsing
//!
//! Two cooperating scanners over one note:
//!
//! - [`region`]: the region state machine over the whole text, which finds
//!   body references and hands out metadata blocks
//! - [`links`]: turns body references into tags
//! - [`metadata`]: interprets metadata blocks and defers identifier/title
//!   attachment
//!
//! [`NoteScanner`] drives both for a note and joins their results.

pub mod links;
pub mod metadata;
pub mod region;
pub mod source;

use crate::options::Options;
use crate::tags::{SourceId, TagSink};

use links::LinkExtractor;
use metadata::{MetadataError, MetadataInterpreter, Scratch};
use region::{RegionScanner, RegionTable, ScanEnd, Scanned};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid scanner pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// What scanning one note produced, besides the tags themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteScan {
    pub source: SourceId,
    pub end: ScanEnd,
    /// Body references that became tags.
    pub references: usize,
    /// Closed metadata blocks handed to the interpreter.
    pub metadata_blocks: usize,
    pub metadata_errors: Vec<MetadataError>,
    /// Note identifier and title (last write wins across blocks).
    pub note: Scratch,
}

pub struct NoteScanner<'o> {
    options: &'o Options,
    regions: RegionTable,
    links: LinkExtractor<'o>,
}

impl<'o> NoteScanner<'o> {
    pub fn new(options: &'o Options) -> Result<Self, ScanError> {
        Ok(Self {
            options,
            regions: RegionTable::new()?,
            links: LinkExtractor::new(options),
        })
    }

    /// Scans a Markdown note: body references and every closed metadata
    /// block. The blocks share one interpreter, so they read as one logical
    /// document; body references stay unannotated.
    pub fn scan_note(&self, text: &str, source: SourceId, sink: &mut dyn TagSink) -> NoteScan {
        let mut interpreter = MetadataInterpreter::new(self.options, source);
        let mut scanner = RegionScanner::new(&self.regions, text);
        let mut references = 0;
        let mut metadata_blocks = 0;
        let mut metadata_errors = Vec::new();

        let end = loop {
            match scanner.step() {
                Scanned::Consumed => {}
                Scanned::Reference(occurrence) => {
                    if self.links.extract(&occurrence, source, sink).is_some() {
                        references += 1;
                    }
                }
                Scanned::Metadata(block) => {
                    metadata_blocks += 1;
                    if let Err(err) = metadata::interpret_block(
                        block.text,
                        block.first_line,
                        &mut interpreter,
                        sink,
                    ) {
                        log::warn!("{err}");
                        metadata_errors.push(err);
                    }
                }
                Scanned::Done(end) => break end,
            }
        };

        NoteScan {
            source,
            end,
            references,
            metadata_blocks,
            metadata_errors,
            note: interpreter.note().clone(),
        }
    }

    /// Scans a standalone YAML metadata file.
    pub fn scan_metadata(&self, text: &str, source: SourceId, sink: &mut dyn TagSink) -> NoteScan {
        let mut interpreter = MetadataInterpreter::new(self.options, source);
        let mut metadata_errors = Vec::new();
        if let Err(err) = metadata::interpret_block(text, 1, &mut interpreter, sink) {
            log::warn!("{err}");
            metadata_errors.push(err);
        }
        NoteScan {
            source,
            end: ScanEnd::Complete,
            references: 0,
            metadata_blocks: 1,
            metadata_errors,
            note: interpreter.note().clone(),
        }
    }
}
