//! Rendering of stored tags.
//!
//! The encoded name and the summary line are not stored; they are computed
//! here, after scanning, from the raw name and whatever identifier/title the
//! deferred annotator attached.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::options::Field;

use super::encode::encode_name;
use super::kind::TagKind;
use super::store::{Origin, TagEntry, TagTable};
use super::summary::SummarySelector;
use super::template::{Template, TemplateError, TemplateField};

pub const PROGRAM_NAME: &str = "zettel-tags";

pub struct Renderer<'t, 'o> {
    table: &'t TagTable<'o>,
    summaries: SummarySelector,
    xref: Template,
}

impl<'t, 'o> Renderer<'t, 'o> {
    pub fn new(table: &'t TagTable<'o>) -> Result<Self, TemplateError> {
        let options = table.options();
        Ok(Self {
            table,
            summaries: SummarySelector::new(options)?,
            xref: Template::parse(options.xref_format())?,
        })
    }

    /// The name as written to the output: encoded when the encoded-name field
    /// is enabled, raw otherwise.
    pub fn encoded_name(&self, entry: &TagEntry) -> String {
        let options = self.table.options();
        if options.is_field_enabled(Field::EncodedName) {
            encode_name(&entry.name, entry.kind, options)
        } else {
            entry.name.clone()
        }
    }

    /// The summary line, or `None` when summaries are disabled.
    ///
    /// Body references are summarised by their compact source line; every
    /// other tag renders its summary template.
    pub fn summary(&self, entry: &TagEntry) -> Option<String> {
        if !self.table.options().is_field_enabled(Field::Summary) {
            return None;
        }
        if entry.origin == Origin::Body {
            return Some(self.table.source(entry.source).compact_line(entry.line));
        }
        let template = self.summaries.select(entry);
        Some(template.render(|field| match field {
            TemplateField::Summary => Cow::Borrowed(""),
            other => self.resolve(entry, other),
        }))
    }

    /// One cross-reference line for `entry`.
    pub fn xref_line(&self, entry: &TagEntry) -> String {
        self.xref.render(|field| self.resolve(entry, field))
    }

    fn resolve<'e>(&'e self, entry: &'e TagEntry, field: TemplateField) -> Cow<'e, str> {
        match field {
            TemplateField::Name => Cow::Borrowed(entry.name.as_str()),
            TemplateField::Line => Cow::Owned(entry.line.to_string()),
            TemplateField::Input => Cow::Borrowed(self.table.source(entry.source).path()),
            TemplateField::Kind => Cow::Borrowed(entry.kind.name()),
            TemplateField::KindLetter => Cow::Owned(entry.kind.letter().to_string()),
            TemplateField::Role => Cow::Borrowed(entry.role.map_or("def", |r| r.name())),
            TemplateField::Marker => Cow::Borrowed(if entry.is_reference() { "R" } else { "D" }),
            TemplateField::CompactLine => {
                Cow::Owned(self.table.source(entry.source).compact_line(entry.line))
            }
            TemplateField::EncodedName => Cow::Owned(self.encoded_name(entry)),
            TemplateField::Summary => Cow::Owned(self.summary(entry).unwrap_or_default()),
            TemplateField::Identifier => Cow::Borrowed(entry.identifier().unwrap_or("")),
            TemplateField::Title => Cow::Borrowed(entry.title().unwrap_or("")),
        }
    }

    /// One tags-file line, without the trailing newline.
    pub fn tag_line(&self, entry: &TagEntry) -> String {
        let options = self.table.options();
        let mut line = format!(
            "{}\t{}\t{};\"\t{}",
            escape(&self.encoded_name(entry)),
            escape(self.table.source(entry.source).path()),
            entry.line,
            entry.kind.letter(),
        );
        if let Some(role) = entry.role {
            line.push_str("\troles:");
            line.push_str(role.name());
        }
        if options.is_field_enabled(Field::Identifier)
            && let Some(identifier) = entry.identifier()
        {
            line.push_str("\tidentifier:");
            line.push_str(&escape(identifier));
        }
        if options.is_field_enabled(Field::Title)
            && let Some(title) = entry.title()
        {
            line.push_str("\ttitle:");
            line.push_str(&escape(title));
        }
        if let Some(summary) = self.summary(entry).filter(|s| !s.is_empty()) {
            line.push_str("\tsummary:");
            line.push_str(&escape(&summary));
        }
        line
    }

    /// Writes a sorted tags file with its pseudo-tag header.
    pub fn write_tags(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "!_TAG_FILE_FORMAT\t2\t/extended format/")?;
        writeln!(out, "!_TAG_FILE_SORTED\t1\t/0=unsorted, 1=sorted, 2=foldcase/")?;
        writeln!(out, "!_TAG_PROGRAM_NAME\t{PROGRAM_NAME}\t//")?;
        for kind in TagKind::ALL {
            writeln!(
                out,
                "!_TAG_KIND_DESCRIPTION\t{},{}\t/{}/",
                kind.letter(),
                kind.name(),
                kind.description()
            )?;
        }

        let mut lines: Vec<String> = self
            .table
            .entries()
            .iter()
            .map(|e| self.tag_line(e))
            .collect();
        lines.sort();
        for line in lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Writes one cross-reference line per tag, in creation order.
    pub fn write_xref(&self, out: &mut impl Write) -> io::Result<()> {
        for entry in self.table.entries() {
            writeln!(out, "{}", self.xref_line(entry).trim_end())?;
        }
        Ok(())
    }
}

/// Escapes the bytes that would break a tags-file line.
fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '\t', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
