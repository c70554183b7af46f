use serde::{Deserialize, Serialize};

/// The kind of an emitted tag.
///
/// Kind names and letters are the externally visible identifiers used in
/// tags files and cross-reference listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// A note identifier (`id:` in the metadata block).
    #[serde(rename = "id")]
    Identifier,
    /// A note title.
    Title,
    /// A keyword from the `keywords:` list.
    Keyword,
    /// A citation key, either cited (`@key`, `nocite:`) or defined (`references:`).
    Citekey,
    /// A forward link to the next note (`next:` in the metadata block).
    #[serde(rename = "next")]
    Nextlink,
    /// A wiki link `[[id]]` in the note body.
    Wikilink,
    /// The title of a `references:` entry.
    Reftitle,
}

impl TagKind {
    pub const ALL: [TagKind; 7] = [
        TagKind::Identifier,
        TagKind::Title,
        TagKind::Keyword,
        TagKind::Citekey,
        TagKind::Nextlink,
        TagKind::Wikilink,
        TagKind::Reftitle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Identifier => "id",
            TagKind::Title => "title",
            TagKind::Keyword => "keyword",
            TagKind::Citekey => "citekey",
            TagKind::Nextlink => "next",
            TagKind::Wikilink => "wikilink",
            TagKind::Reftitle => "reftitle",
        }
    }

    pub fn letter(self) -> char {
        match self {
            TagKind::Identifier => 'i',
            TagKind::Title => 't',
            TagKind::Keyword => 'k',
            TagKind::Citekey => 'c',
            TagKind::Nextlink => 'n',
            TagKind::Wikilink => 'w',
            TagKind::Reftitle => 'r',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TagKind::Identifier => "zettel identifiers",
            TagKind::Title => "zettel titles",
            TagKind::Keyword => "keywords",
            TagKind::Citekey => "citation keys",
            TagKind::Nextlink => "forward links",
            TagKind::Wikilink => "wiki links",
            TagKind::Reftitle => "reference titles",
        }
    }

    /// Reference-only kinds never produce definition tags.
    pub fn reference_only(self) -> bool {
        matches!(self, TagKind::Wikilink)
    }

    /// Kinds whose names are free text and get percent-encoded on output.
    pub fn is_text(self) -> bool {
        matches!(self, TagKind::Title | TagKind::Keyword | TagKind::Reftitle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordRole {
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitekeyRole {
    Bibliography,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextlinkRole {
    Identifier,
    Folgezettel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WikilinkRole {
    Reference,
    Folgezettel,
}

/// A reference role, scoped to the kind it belongs to.
///
/// Each kind has its own role enum so a role can never be attached to a
/// kind that does not define it. A tag without a role is a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Keyword(KeywordRole),
    Citekey(CitekeyRole),
    #[serde(rename = "next")]
    Nextlink(NextlinkRole),
    Wikilink(WikilinkRole),
}

impl Role {
    pub const INDEX: Role = Role::Keyword(KeywordRole::Index);
    pub const BIBLIOGRAPHY: Role = Role::Citekey(CitekeyRole::Bibliography);

    pub fn kind(self) -> TagKind {
        match self {
            Role::Keyword(_) => TagKind::Keyword,
            Role::Citekey(_) => TagKind::Citekey,
            Role::Nextlink(_) => TagKind::Nextlink,
            Role::Wikilink(_) => TagKind::Wikilink,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Keyword(KeywordRole::Index) => "index",
            Role::Citekey(CitekeyRole::Bibliography) => "bibliography",
            Role::Nextlink(NextlinkRole::Identifier) => "identifier",
            Role::Nextlink(NextlinkRole::Folgezettel) => "folgezettel",
            Role::Wikilink(WikilinkRole::Reference) => "reference",
            Role::Wikilink(WikilinkRole::Folgezettel) => "folgezettel",
        }
    }
}

/// Optional tags that are only emitted when explicitly enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extra {
    /// Include tags for Folgezettel (forward) links.
    Folgezettel,
}
