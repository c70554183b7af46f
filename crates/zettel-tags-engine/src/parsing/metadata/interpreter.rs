use crate::options::{Options, PrefixKind};
use crate::tags::{Extra, NewTag, NextlinkRole, Role, SourceId, TagKind, TagSink};

use super::annotator::{DeferredAnnotator, Scope};
use super::events::MetadataEvent;
use super::scope::{FieldScope, ReferenceKey, Scratch, Slot, TopKey};

/// Walks the events of one metadata stream and creates tags for the fields
/// it recognises.
///
/// Top-level keys are only recognised directly in the root mapping; `id` and
/// `title` inside an entry of the `references` list describe that entry
/// instead of the note. Keys at any other depth are ignored.
pub struct MetadataInterpreter<'o> {
    options: &'o Options,
    source: SourceId,
    scope: FieldScope,
    top: Slot<TopKey>,
    reference: Slot<ReferenceKey>,
    document: Scratch,
    entry: Scratch,
    note: Scratch,
    annotator: DeferredAnnotator,
}

impl<'o> MetadataInterpreter<'o> {
    pub fn new(options: &'o Options, source: SourceId) -> Self {
        Self {
            options,
            source,
            scope: FieldScope::default(),
            top: Slot::None,
            reference: Slot::None,
            document: Scratch::default(),
            entry: Scratch::default(),
            note: Scratch::default(),
            annotator: DeferredAnnotator::new(),
        }
    }

    /// Identifier and title of the note, as of the last flush.
    pub fn note(&self) -> &Scratch {
        &self.note
    }

    pub fn handle(&mut self, event: MetadataEvent, sink: &mut dyn TagSink) {
        match event {
            MetadataEvent::StreamStart => self.reset(),
            MetadataEvent::StreamEnd
            | MetadataEvent::DocumentStart
            | MetadataEvent::DocumentEnd => self.flush_document(sink),
            MetadataEvent::MappingStart => {
                self.complex_key();
                self.scope.mapping_depth += 1;
            }
            MetadataEvent::SequenceStart => {
                self.complex_key();
                self.scope.sequence_depth += 1;
            }
            MetadataEvent::MappingEnd => {
                self.scope.mapping_depth = self.scope.mapping_depth.saturating_sub(1);
                if self.scope.in_reference && self.scope.mapping_depth < 2 {
                    self.flush_entry(sink);
                }
            }
            MetadataEvent::SequenceEnd => {
                self.scope.sequence_depth = self.scope.sequence_depth.saturating_sub(1);
                if self.scope.in_reference && self.scope.sequence_depth == 0 {
                    self.flush_entry(sink);
                    self.scope.in_reference = false;
                }
            }
            MetadataEvent::Key => {
                if self.scope.at_top_level_key() {
                    self.top = Slot::KeyPending;
                    self.scope.in_reference = false;
                } else if self.scope.at_reference_entry() {
                    self.reference = Slot::KeyPending;
                }
            }
            MetadataEvent::Scalar { value, line } => self.scalar(&value, line, sink),
            MetadataEvent::Alias { .. } => self.complex_key(),
        }
    }

    /// Flushes everything still parked. Used when the tokenizer gives up
    /// part way through a block.
    pub fn finish(&mut self, sink: &mut dyn TagSink) {
        self.flush_document(sink);
    }

    fn reset(&mut self) {
        self.scope = FieldScope::default();
        self.top = Slot::None;
        self.reference = Slot::None;
        self.document.clear();
        self.entry.clear();
        self.annotator.clear();
    }

    /// A key that is not a scalar can never be recognised.
    fn complex_key(&mut self) {
        if self.top == Slot::KeyPending {
            self.top = Slot::None;
        }
        if self.reference == Slot::KeyPending {
            self.reference = Slot::None;
        }
    }

    fn scalar(&mut self, value: &str, line: usize, sink: &mut dyn TagSink) {
        if self.top == Slot::KeyPending {
            self.top = match TopKey::from_key(value) {
                Some(key) => {
                    if key == TopKey::References {
                        self.scope.in_reference = true;
                    }
                    Slot::Value(key)
                }
                None => Slot::None,
            };
            return;
        }
        if self.reference == Slot::KeyPending {
            self.reference = ReferenceKey::from_key(value).map_or(Slot::None, Slot::Value);
            return;
        }

        if self.scope.at_reference_entry() {
            if let Slot::Value(key) = self.reference {
                self.reference_value(key, value, line, sink);
            }
        } else if self.scope.at_top_level_value()
            && let Slot::Value(key) = self.top
        {
            self.top_value(key, value, line, sink);
        }
    }

    fn top_value(&mut self, key: TopKey, value: &str, line: usize, sink: &mut dyn TagSink) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let options = self.options;
        let source = self.source;
        let mut tags = Vec::new();
        match key {
            TopKey::Id => {
                self.document.identifier = Some(value.to_string());
                tags.push(NewTag::definition(value, TagKind::Identifier, line, source));
            }
            TopKey::Title => {
                self.document.title = Some(value.to_string());
                tags.push(NewTag::definition(
                    options.prefixed(PrefixKind::Title, value),
                    TagKind::Title,
                    line,
                    source,
                ));
            }
            TopKey::Keywords => {
                tags.extend(split_list(value).map(|keyword| {
                    NewTag::reference(
                        options.prefixed(PrefixKind::Keyword, keyword),
                        Role::INDEX,
                        line,
                        source,
                    )
                }));
            }
            TopKey::Nocite => {
                tags.extend(split_citations(value).map(|key| {
                    NewTag::reference(
                        options.prefixed(PrefixKind::Nocite, key),
                        Role::BIBLIOGRAPHY,
                        line,
                        source,
                    )
                }));
            }
            TopKey::Next => {
                let name = options.prefixed(PrefixKind::Next, value);
                tags.push(NewTag::reference(
                    name.clone(),
                    Role::Nextlink(NextlinkRole::Identifier),
                    line,
                    source,
                ));
                tags.push(
                    NewTag::reference(name, Role::Nextlink(NextlinkRole::Folgezettel), line, source)
                        .with_extra(Extra::Folgezettel),
                );
            }
            TopKey::References => {}
        }
        for tag in tags {
            if let Some(handle) = sink.create(tag) {
                self.annotator.push(handle, Scope::Document);
            }
        }
    }

    fn reference_value(
        &mut self,
        key: ReferenceKey,
        value: &str,
        line: usize,
        sink: &mut dyn TagSink,
    ) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let tag = match key {
            ReferenceKey::Id => {
                self.entry.identifier = Some(value.to_string());
                NewTag::definition(
                    self.options
                        .prefixed(PrefixKind::Bibliography, &format!("@{value}")),
                    TagKind::Citekey,
                    line,
                    self.source,
                )
            }
            ReferenceKey::Title => {
                self.entry.title = Some(value.to_string());
                NewTag::definition(
                    self.options.prefixed(PrefixKind::Reftitle, value),
                    TagKind::Reftitle,
                    line,
                    self.source,
                )
            }
        };
        if let Some(handle) = sink.create(tag) {
            self.annotator.push(handle, Scope::Reference);
        }
    }

    fn flush_entry(&mut self, sink: &mut dyn TagSink) {
        self.annotator.flush(Scope::Reference, &self.entry, sink);
        self.entry.clear();
        self.reference = Slot::None;
    }

    fn flush_document(&mut self, sink: &mut dyn TagSink) {
        self.flush_entry(sink);
        self.annotator.flush(Scope::Document, &self.document, sink);
        self.note.update_from(&self.document);
    }
}

/// Citation keys are `@`-prefixed tokens separated by blanks or commas;
/// other tokens are dropped.
fn split_citations(value: &str) -> impl Iterator<Item = &str> {
    split_list(value).filter(|t| t.starts_with('@') && t.len() > 1)
}

/// Keyword and citation lists are separated by blanks or commas.
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}
