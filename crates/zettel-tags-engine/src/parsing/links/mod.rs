//! # Link & citation extractor
//!
//! Turns the references the region scanner finds in the note body into
//! tags. The syntaxes themselves live in [`kinds`].

pub mod kinds;

use crate::options::{Options, PrefixKind};
use crate::parsing::region::{Emit, Occurrence};
use crate::tags::{Extra, NewTag, Role, SourceId, TagHandle, TagSink, WikilinkRole};

pub struct LinkExtractor<'o> {
    options: &'o Options,
}

impl<'o> LinkExtractor<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// The tag an occurrence stands for.
    ///
    /// A forward link `next:[[id]]` becomes a Folgezettel link when those are
    /// enabled, and a plain wiki link otherwise; it is never both.
    pub fn tag_for(&self, occurrence: &Occurrence<'_>, source: SourceId) -> NewTag {
        let line = occurrence.line;
        let tag = match occurrence.emit {
            Emit::ForwardLink if self.options.folgezettel => NewTag::reference(
                self.options.prefixed(PrefixKind::Next, occurrence.raw),
                Role::Wikilink(WikilinkRole::Folgezettel),
                line,
                source,
            )
            .with_extra(Extra::Folgezettel),
            Emit::ForwardLink | Emit::WikiLink => NewTag::reference(
                occurrence.raw,
                Role::Wikilink(WikilinkRole::Reference),
                line,
                source,
            ),
            Emit::Citation => NewTag::reference(
                format!("{}{}", kinds::Citation::AT, occurrence.raw),
                Role::BIBLIOGRAPHY,
                line,
                source,
            ),
        };
        tag.in_body()
    }

    /// Creates the tag for `occurrence` in `sink`.
    pub fn extract(
        &self,
        occurrence: &Occurrence<'_>,
        source: SourceId,
        sink: &mut dyn TagSink,
    ) -> Option<TagHandle> {
        sink.create(self.tag_for(occurrence, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{Origin, TagKind, TagTable};
    use rstest::rstest;

    fn occurrence(emit: Emit, raw: &str) -> Occurrence<'_> {
        Occurrence {
            emit,
            raw,
            line: 7,
        }
    }

    #[rstest]
    #[case(Emit::WikiLink, "z2", "z2", Role::Wikilink(WikilinkRole::Reference))]
    #[case(Emit::ForwardLink, "z3", "z3", Role::Wikilink(WikilinkRole::Reference))]
    #[case(Emit::Citation, "doe99", "@doe99", Role::BIBLIOGRAPHY)]
    fn default_tags(#[case] emit: Emit, #[case] raw: &str, #[case] name: &str, #[case] role: Role) {
        let options = Options::default();
        let source = TagTable::new(&options).add_source("n.md", "");
        let tag = LinkExtractor::new(&options).tag_for(&occurrence(emit, raw), source);
        assert_eq!(tag.name, name);
        assert_eq!(tag.role, Some(role));
        assert_eq!(tag.line, 7);
        assert_eq!(tag.extra, None);
        assert_eq!(tag.origin, Origin::Body);
    }

    #[test]
    fn folgezettel_forward_link() {
        let options = Options {
            folgezettel: true,
            next_prefix: "*".into(),
            ..Options::default()
        };
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "next:[[z3]]\n");
        let handle = LinkExtractor::new(&options)
            .extract(&occurrence(Emit::ForwardLink, "z3"), source, &mut table)
            .unwrap();
        let entry = table.get(handle).unwrap();
        assert_eq!(entry.name, "*z3");
        assert_eq!(entry.kind, TagKind::Wikilink);
        assert_eq!(entry.role, Some(Role::Wikilink(WikilinkRole::Folgezettel)));
        assert_eq!(entry.extra, Some(Extra::Folgezettel));
    }

    #[test]
    fn disabled_citations_are_dropped() {
        let options = Options {
            disabled_kinds: vec![TagKind::Citekey],
            ..Options::default()
        };
        let mut table = TagTable::new(&options);
        let source = table.add_source("n.md", "@doe\n");
        let extractor = LinkExtractor::new(&options);
        assert!(
            extractor
                .extract(&occurrence(Emit::Citation, "doe"), source, &mut table)
                .is_none()
        );
        assert!(table.is_empty());
    }
}
