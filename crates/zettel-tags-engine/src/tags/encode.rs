//! Tag name encoding.
//!
//! Tags files are line and tab oriented, sorted bytewise, and reserve a
//! leading `!` for pseudo-tags. Free-text names (titles, keywords, reference
//! titles) are therefore percent-encoded: every byte outside `0x21..=0x7E`
//! and every `%` becomes `%xx`. The first byte is also forced through the
//! encoder when it is `!` or `@`, or when the name starts with the prefix
//! configured for a *different* kind, so that differently tagged names that
//! share text stay distinguishable.
//!
//! Identifiers, citation keys and links are not encoded. Only their first
//! character is escaped, when it is `!` or starts the prefix of another
//! kind. Any other byte outside the printable range is reported and kept.
//!
//! Encoding is only defined over raw names: encoding an encoded name again
//! is not the identity.

use crate::options::{Options, PrefixKind};

use super::kind::TagKind;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Encodes `name` of `kind` for output.
pub fn encode_name(name: &str, kind: TagKind, options: &Options) -> String {
    let mut out = String::with_capacity(name.len() * 3);
    let rest = encode_head(name, kind, options, &mut out);
    if kind.is_text() {
        for &b in rest.as_bytes() {
            if needs_escape(b) {
                push_escaped(&mut out, b);
            } else {
                out.push(b as char);
            }
        }
    } else {
        if let Some(b) = rest.bytes().find(|&b| !is_printable(b)) {
            log::info!("Unexpected character {b:#04x} in tag {name}");
        }
        out.push_str(rest);
    }
    out
}

/// Writes the start of `name` to `out` and returns the part still to be
/// written. An own prefix is kept verbatim; a colliding first character is
/// escaped.
fn encode_head<'n>(name: &'n str, kind: TagKind, options: &Options, out: &mut String) -> &'n str {
    let owned = PrefixKind::owned_by(kind);
    if let Some(own) = owned
        .iter()
        .map(|&p| options.prefix(p))
        .find(|p| !p.is_empty() && name.starts_with(p))
    {
        out.push_str(own);
        return &name[own.len()..];
    }

    let collides = name.starts_with('!')
        || (kind.is_text() && name.starts_with('@'))
        || starts_with_foreign_prefix(name, owned, options);
    match name.chars().next() {
        Some(first) if collides => {
            let mut buf = [0; 4];
            for &b in first.encode_utf8(&mut buf).as_bytes() {
                push_escaped(out, b);
            }
            &name[first.len_utf8()..]
        }
        _ => name,
    }
}

fn starts_with_foreign_prefix(name: &str, owned: &[PrefixKind], options: &Options) -> bool {
    PrefixKind::ALL
        .into_iter()
        .filter(|p| !owned.contains(p))
        .map(|p| options.prefix(p))
        .any(|prefix| !prefix.is_empty() && name.starts_with(prefix))
}

fn is_printable(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

fn needs_escape(b: u8) -> bool {
    !is_printable(b) || b == b'%'
}

fn push_escaped(out: &mut String, b: u8) {
    out.push('%');
    out.push(HEX[usize::from(b >> 4)] as char);
    out.push(HEX[usize::from(b & 0x0f)] as char);
}
