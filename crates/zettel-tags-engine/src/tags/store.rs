use crate::options::{Field, Options};
use crate::parsing::source::{LineIndex, compact_line};

use super::kind::{Extra, Role, TagKind};

/// Opaque handle to a stored tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagHandle(usize);

impl TagHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifies the input a tag was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(usize);

/// A scanned input kept for rendering (file name column, compact line).
#[derive(Debug)]
pub struct SourceFile {
    path: String,
    text: String,
    lines: LineIndex,
}

impl SourceFile {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The compact form of a 1-based source line, empty if out of range.
    pub fn compact_line(&self, line: usize) -> String {
        self.lines
            .line_text(&self.text, line)
            .map(compact_line)
            .unwrap_or_default()
    }
}

/// Where in a note a tag was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// A metadata block or a standalone metadata file.
    #[default]
    Metadata,
    /// The note body. Such tags are never annotated; their summary is the
    /// compact source line.
    Body,
}

/// A tag about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub kind: TagKind,
    pub role: Option<Role>,
    pub line: usize,
    pub source: SourceId,
    pub extra: Option<Extra>,
    pub origin: Origin,
}

impl NewTag {
    /// A definition tag.
    pub fn definition(name: impl Into<String>, kind: TagKind, line: usize, source: SourceId) -> Self {
        Self {
            name: name.into(),
            kind,
            role: None,
            line,
            source,
            extra: None,
            origin: Origin::Metadata,
        }
    }

    /// A reference tag; the kind is implied by the role.
    pub fn reference(name: impl Into<String>, role: Role, line: usize, source: SourceId) -> Self {
        Self {
            name: name.into(),
            kind: role.kind(),
            role: Some(role),
            line,
            source,
            extra: None,
            origin: Origin::Metadata,
        }
    }

    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn in_body(mut self) -> Self {
        self.origin = Origin::Body;
        self
    }
}

/// A stored tag.
///
/// Everything but the identifier/title fields is fixed at creation; those two
/// are attached later by the deferred annotator once the owning scope closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub kind: TagKind,
    pub role: Option<Role>,
    pub line: usize,
    pub source: SourceId,
    pub extra: Option<Extra>,
    pub origin: Origin,
    identifier: Option<String>,
    title: Option<String>,
}

impl TagEntry {
    pub fn is_reference(&self) -> bool {
        self.role.is_some()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// The record store the scanners emit into.
pub trait TagSink {
    /// Creates a tag, or returns `None` when its kind, role, or extra is
    /// disabled.
    fn create(&mut self, tag: NewTag) -> Option<TagHandle>;

    /// Attaches a deferred field value to an existing tag.
    fn attach(&mut self, handle: TagHandle, field: Field, value: &str);

    fn is_field_enabled(&self, field: Field) -> bool;

    fn is_role_enabled(&self, kind: TagKind, role: Option<Role>) -> bool;
}

/// In-memory tag store for one run.
#[derive(Debug)]
pub struct TagTable<'o> {
    options: &'o Options,
    sources: Vec<SourceFile>,
    entries: Vec<TagEntry>,
}

impl<'o> TagTable<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self {
            options,
            sources: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn options(&self) -> &'o Options {
        self.options
    }

    pub fn add_source(&mut self, path: impl Into<String>, text: impl Into<String>) -> SourceId {
        let text = text.into();
        let lines = LineIndex::new(&text);
        self.sources.push(SourceFile {
            path: path.into(),
            text,
            lines,
        });
        SourceId(self.sources.len() - 1)
    }

    pub fn source(&self, id: SourceId) -> &SourceFile {
        &self.sources[id.0]
    }

    pub fn get(&self, handle: TagHandle) -> Option<&TagEntry> {
        self.entries.get(handle.0)
    }

    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags of one kind, in creation order.
    pub fn of_kind(&self, kind: TagKind) -> impl Iterator<Item = &TagEntry> + '_ {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

}

impl TagSink for TagTable<'_> {
    fn create(&mut self, tag: NewTag) -> Option<TagHandle> {
        if !self.options.is_role_enabled(tag.kind, tag.role) {
            log::debug!("skipping disabled {} tag {}", tag.kind.name(), tag.name);
            return None;
        }
        if tag.extra == Some(Extra::Folgezettel) && !self.options.folgezettel {
            return None;
        }
        self.entries.push(TagEntry {
            name: tag.name,
            kind: tag.kind,
            role: tag.role,
            line: tag.line,
            source: tag.source,
            extra: tag.extra,
            origin: tag.origin,
            identifier: None,
            title: None,
        });
        Some(TagHandle(self.entries.len() - 1))
    }

    fn attach(&mut self, handle: TagHandle, field: Field, value: &str) {
        let Some(entry) = self.entries.get_mut(handle.0) else {
            log::warn!("attach to unknown tag handle {}", handle.0);
            return;
        };
        match field {
            Field::Identifier => entry.identifier = Some(value.to_string()),
            Field::Title => entry.title = Some(value.to_string()),
            Field::EncodedName | Field::Summary => {
                log::debug!("{field:?} is computed at render time, not attached");
            }
        }
    }

    fn is_field_enabled(&self, field: Field) -> bool {
        self.options.is_field_enabled(field)
    }

    fn is_role_enabled(&self, kind: TagKind, role: Option<Role>) -> bool {
        self.options.is_role_enabled(kind, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{NextlinkRole, WikilinkRole};

    #[test]
    fn create_and_attach() {
        let options = Options::default();
        let mut table = TagTable::new(&options);
        let source = table.add_source("z1.md", "id: z1\n");

        let handle = table
            .create(NewTag::definition("z1", TagKind::Identifier, 1, source))
            .unwrap();
        table.attach(handle, Field::Title, "Hello");

        let entry = table.get(handle).unwrap();
        assert_eq!(entry.name, "z1");
        assert_eq!(entry.title(), Some("Hello"));
        assert_eq!(entry.identifier(), None);
        assert!(!entry.is_reference());
    }

    #[test]
    fn disabled_kind_is_not_stored() {
        let options = Options {
            disabled_kinds: vec![TagKind::Keyword],
            ..Options::default()
        };
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "");
        assert!(
            table
                .create(NewTag::reference("k", Role::INDEX, 1, source))
                .is_none()
        );
        assert!(table.is_empty());
    }

    #[test]
    fn extras_need_their_switch() {
        let tag = |source| {
            NewTag::reference(
                "z2",
                Role::Nextlink(NextlinkRole::Folgezettel),
                1,
                source,
            )
            .with_extra(Extra::Folgezettel)
        };

        let off = Options::default();
        let mut table = TagTable::new(&off);
        let source = table.add_source("n.md", "");
        assert!(table.create(tag(source)).is_none());

        let on = Options {
            folgezettel: true,
            ..Options::default()
        };
        let mut table = TagTable::new(&on);
        let source = table.add_source("n.md", "");
        assert!(table.create(tag(source)).is_some());
    }

    #[test]
    fn wikilink_definitions_are_rejected() {
        let options = Options::default();
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "");
        assert!(
            table
                .create(NewTag::definition("z2", TagKind::Wikilink, 1, source))
                .is_none()
        );
        assert!(
            table
                .create(NewTag::reference(
                    "z2",
                    Role::Wikilink(WikilinkRole::Reference),
                    1,
                    source
                ))
                .is_some()
        );
    }

    #[test]
    fn compact_line_of_source() {
        let options = Options::default();
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "# Head\n\n  see   [[z2]]\n");
        assert_eq!(table.source(source).compact_line(3), "see [[z2]]");
        assert_eq!(table.source(source).compact_line(9), "");
    }
}
