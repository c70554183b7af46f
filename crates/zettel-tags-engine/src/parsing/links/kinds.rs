//! Reference syntaxes recognised in the unprotected note body.
//!
//! Each type owns its pattern and capture names; the region table only
//! refers to these constants. Every pattern is anchored and optionally
//! swallows a following `---` underline so it is not taken for a setext
//! heading.

pub struct ForwardLink;

impl ForwardLink {
    pub const PATTERN: &'static str = r"^next:\[\[(?P<id>[^\] \t\n]+)\]\](?:\n-+\n)?";
}

pub struct WikiLink;

impl WikiLink {
    pub const ID: &'static str = "id";
    pub const PATTERN: &'static str = r"^\[\[(?P<id>[^\] \t\n]+)\]\](?:\n-+\n)?";
}

pub struct Citation;

impl Citation {
    pub const AT: char = '@';
    pub const KEY: &'static str = "key";
    /// A key starts with a word character and runs over word characters and
    /// `:.#$%&'()*+?<>~/`. Trailing punctuation stays part of the key, so
    /// `@doe99.` cites `doe99.`; `-` and `,` end it.
    pub const PATTERN: &'static str =
        r"^@(?P<key>[A-Za-z0-9_][A-Za-z0-9_:.#$%&'()*+?<>~/]*)(?:\n-+\n)?";
}

/// Pandoc numbered examples, `(@label)`. Skipped.
pub struct NumberedExample;

impl NumberedExample {
    pub const PATTERN: &'static str = r"^[ \t]*\(@[a-zA-Z0-9_-]*\)(?:\n-+\n)?";
}

/// Local parts of e-mail addresses, skipped so they are not read as
/// citations.
pub struct Email;

impl Email {
    pub const BRACKETED: &'static str =
        r#"^<(?:[^@> \t\n]|"[^@>\t\n]*")+(?:\.(?:[^@> \t\n]|"[^@>\t\n]"))*@(?:\n-+\n)?"#;
    pub const MAILTO: &'static str =
        r#"^mailto:(?:[^@> \t\n]|"[^@>\t\n]*")+(?:\.(?:[^@> \t\n]|"[^@>\t\n]"))*@(?:\n-+\n)?"#;
}
