//! Deferred annotation.
//!
//! A tag is often created before the identifier and title of the block that
//! owns it are known (a keyword above the `title:` line, a reference entry
//! listing its `id` after its `title`). Its handle is parked on a stack for its scope and the scope's
//! final identifier/title are attached when the scope closes.

use crate::options::Field;
use crate::tags::{TagHandle, TagSink};

use super::scope::Scratch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Document,
    Reference,
}

#[derive(Debug, Default)]
pub struct DeferredAnnotator {
    document: Vec<TagHandle>,
    reference: Vec<TagHandle>,
}

impl DeferredAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: TagHandle, scope: Scope) {
        self.stack(scope).push(handle);
    }

    #[cfg(test)]
    pub fn pending(&self, scope: Scope) -> usize {
        match scope {
            Scope::Document => self.document.len(),
            Scope::Reference => self.reference.len(),
        }
    }

    /// Attaches the scope's current values to every parked tag, newest
    /// first, and empties the stack.
    pub fn flush(&mut self, scope: Scope, values: &Scratch, sink: &mut dyn TagSink) {
        let summary = sink.is_field_enabled(Field::Summary);
        let identifier = values
            .identifier
            .as_deref()
            .filter(|v| !v.is_empty() && (summary || sink.is_field_enabled(Field::Identifier)));
        let title = values
            .title
            .as_deref()
            .filter(|v| !v.is_empty() && (summary || sink.is_field_enabled(Field::Title)));

        let stack = self.stack(scope);
        while let Some(handle) = stack.pop() {
            if let Some(identifier) = identifier {
                sink.attach(handle, Field::Identifier, identifier);
            }
            if let Some(title) = title {
                sink.attach(handle, Field::Title, title);
            }
        }
    }

    /// Drops every parked tag without annotating it.
    pub fn clear(&mut self) {
        self.document.clear();
        self.reference.clear();
    }

    fn stack(&mut self, scope: Scope) -> &mut Vec<TagHandle> {
        match scope {
            Scope::Document => &mut self.document,
            Scope::Reference => &mut self.reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::tags::{NewTag, Role, TagKind, TagTable};

    fn scratch(identifier: &str, title: &str) -> Scratch {
        Scratch {
            identifier: Some(identifier.into()),
            title: Some(title.into()),
        }
    }

    #[test]
    fn flush_attaches_and_empties() {
        let options = Options::default();
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "");
        let mut annotator = DeferredAnnotator::new();
        for name in ["a", "b"] {
            let handle = table
                .create(NewTag::reference(name, Role::INDEX, 1, source))
                .unwrap();
            annotator.push(handle, Scope::Document);
        }

        annotator.flush(Scope::Document, &scratch("z1", "Hello"), &mut table);
        assert_eq!(annotator.pending(Scope::Document), 0);
        for entry in table.entries() {
            assert_eq!(entry.identifier(), Some("z1"));
            assert_eq!(entry.title(), Some("Hello"));
        }

        // A second flush has nothing left to do.
        annotator.flush(Scope::Document, &scratch("z9", "Other"), &mut table);
        assert_eq!(table.entries()[0].identifier(), Some("z1"));
    }

    #[test]
    fn scopes_are_independent() {
        let options = Options::default();
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "");
        let mut annotator = DeferredAnnotator::new();
        let doc = table
            .create(NewTag::definition("z1", TagKind::Identifier, 1, source))
            .unwrap();
        let reference = table
            .create(NewTag::definition("@a", TagKind::Citekey, 2, source))
            .unwrap();
        annotator.push(doc, Scope::Document);
        annotator.push(reference, Scope::Reference);

        annotator.flush(Scope::Reference, &scratch("a", "Paper A"), &mut table);
        assert_eq!(annotator.pending(Scope::Document), 1);
        assert_eq!(table.get(doc).unwrap().title(), None);
        assert_eq!(table.get(reference).unwrap().title(), Some("Paper A"));
    }

    #[test]
    fn empty_values_and_disabled_fields_are_skipped() {
        let options = Options {
            fields: vec![Field::Identifier],
            ..Options::default()
        };
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "");
        let mut annotator = DeferredAnnotator::new();
        let handle = table
            .create(NewTag::definition("z1", TagKind::Identifier, 1, source))
            .unwrap();
        annotator.push(handle, Scope::Document);
        annotator.flush(Scope::Document, &scratch("", "Hello"), &mut table);

        let entry = table.get(handle).unwrap();
        assert_eq!(entry.identifier(), None);
        assert_eq!(entry.title(), None);
    }
}
