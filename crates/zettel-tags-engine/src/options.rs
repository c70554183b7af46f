use serde::{Deserialize, Serialize};

use crate::tags::{Role, TagKind};

/// Default summary template for both definitions and references.
pub const DEFAULT_SUMMARY_FORMAT: &str = "%{identifier}:%{title}";

/// Default cross-reference line, one per tag.
pub const DEFAULT_XREF_FORMAT: &str =
    "%-16{encodedTagName} %-10K %4n %-16F %{summaryLine}";

/// Output fields a tag can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// The percent-encoded tag name.
    #[serde(rename = "encodedTagName")]
    EncodedName,
    /// The rendered summary line.
    #[serde(rename = "summaryLine")]
    Summary,
    /// Raw identifier of the owning note or reference entry.
    Identifier,
    /// Raw title of the owning note or reference entry.
    Title,
}

/// Which configured prefix applies to a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixKind {
    Title,
    Keyword,
    Reftitle,
    Bibliography,
    Next,
    Nocite,
}

impl PrefixKind {
    pub const ALL: [PrefixKind; 6] = [
        PrefixKind::Title,
        PrefixKind::Keyword,
        PrefixKind::Reftitle,
        PrefixKind::Bibliography,
        PrefixKind::Next,
        PrefixKind::Nocite,
    ];

    /// The prefixes that names of `kind` may legitimately start with.
    pub fn owned_by(kind: TagKind) -> &'static [PrefixKind] {
        match kind {
            TagKind::Identifier => &[],
            TagKind::Title => &[PrefixKind::Title],
            TagKind::Keyword => &[PrefixKind::Keyword],
            TagKind::Reftitle => &[PrefixKind::Reftitle],
            TagKind::Citekey => &[PrefixKind::Bibliography, PrefixKind::Nocite],
            TagKind::Nextlink | TagKind::Wikilink => &[PrefixKind::Next],
        }
    }
}

/// Run-wide configuration.
///
/// Built once (from the config file and command line) and then only ever
/// shared by reference; nothing in the engine mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Custom cross-reference format; [`DEFAULT_XREF_FORMAT`] when unset.
    pub xref_format: Option<String>,
    /// Summary template for definition tags.
    pub definition_format: String,
    /// Summary template for reference tags; falls back to `definition_format`.
    pub reference_format: Option<String>,
    pub title_prefix: String,
    pub keyword_prefix: String,
    pub reftitle_prefix: String,
    pub bibliography_prefix: String,
    pub next_prefix: String,
    pub nocite_prefix: String,
    /// Prepend `title_prefix`/`keyword_prefix` to title and keyword tags.
    pub mark_prefixes: bool,
    /// Emit the auxiliary Folgezettel tags for forward links.
    pub folgezettel: bool,
    pub fields: Vec<Field>,
    pub disabled_kinds: Vec<TagKind>,
    pub disabled_roles: Vec<Role>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            xref_format: None,
            definition_format: DEFAULT_SUMMARY_FORMAT.to_string(),
            reference_format: None,
            title_prefix: String::new(),
            keyword_prefix: String::new(),
            reftitle_prefix: String::new(),
            bibliography_prefix: String::new(),
            next_prefix: String::new(),
            nocite_prefix: String::new(),
            mark_prefixes: true,
            folgezettel: false,
            fields: vec![Field::EncodedName, Field::Summary],
            disabled_kinds: Vec::new(),
            disabled_roles: Vec::new(),
        }
    }
}

impl Options {
    /// The prefix to prepend for `kind`; empty when unset or when prefix
    /// marking is switched off for titles and keywords.
    pub fn prefix(&self, kind: PrefixKind) -> &str {
        match kind {
            PrefixKind::Title if self.mark_prefixes => &self.title_prefix,
            PrefixKind::Keyword if self.mark_prefixes => &self.keyword_prefix,
            PrefixKind::Title | PrefixKind::Keyword => "",
            PrefixKind::Reftitle => &self.reftitle_prefix,
            PrefixKind::Bibliography => &self.bibliography_prefix,
            PrefixKind::Next => &self.next_prefix,
            PrefixKind::Nocite => &self.nocite_prefix,
        }
    }

    /// `prefix + value`, allocating once.
    pub fn prefixed(&self, kind: PrefixKind, value: &str) -> String {
        let prefix = self.prefix(kind);
        let mut name = String::with_capacity(prefix.len() + value.len());
        name.push_str(prefix);
        name.push_str(value);
        name
    }

    pub fn is_field_enabled(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_kind_enabled(&self, kind: TagKind) -> bool {
        !self.disabled_kinds.contains(&kind)
    }

    /// Definitions (`role == None`) are enabled whenever their kind is.
    pub fn is_role_enabled(&self, kind: TagKind, role: Option<Role>) -> bool {
        if !self.is_kind_enabled(kind) {
            return false;
        }
        match role {
            None => !kind.reference_only(),
            Some(role) => role.kind() == kind && !self.disabled_roles.contains(&role),
        }
    }

    pub fn xref_format(&self) -> &str {
        self.xref_format.as_deref().unwrap_or(DEFAULT_XREF_FORMAT)
    }

    pub fn reference_format(&self) -> &str {
        self.reference_format
            .as_deref()
            .unwrap_or(&self.definition_format)
    }
}
