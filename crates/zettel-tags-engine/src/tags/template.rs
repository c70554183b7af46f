//! Output format strings.
//!
//! A template is literal text with `%` directives: a single letter
//! (`%N`, `%n`, `%F`, `%K`, `%z`, `%k`, `%r`, `%R`, `%C`), a named field in
//! braces (`%{title}`, `%{ZettelMetadata.identifier}`, `%{*.summaryLine}`),
//! or `%%`. A directive may carry a width: `%-16N` pads on the right, `%4n`
//! on the left.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown format letter '%{0}'")]
    UnknownLetter(char),
    #[error("unknown format field '%{{{0}}}'")]
    UnknownField(String),
    #[error("unterminated '%{{' in format string")]
    Unterminated,
    #[error("format string ends with a bare '%'")]
    Dangling,
}

/// A value a template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateField {
    Name,
    Line,
    Input,
    Kind,
    KindLetter,
    Role,
    /// `D` for definitions, `R` for references.
    Marker,
    CompactLine,
    EncodedName,
    Summary,
    Identifier,
    Title,
}

impl TemplateField {
    fn from_letter(c: char) -> Option<Self> {
        Some(match c {
            'N' => TemplateField::Name,
            'n' => TemplateField::Line,
            'F' => TemplateField::Input,
            'K' | 'z' => TemplateField::Kind,
            'k' => TemplateField::KindLetter,
            'r' => TemplateField::Role,
            'R' => TemplateField::Marker,
            'C' => TemplateField::CompactLine,
            _ => return None,
        })
    }

    fn from_name(name: &str) -> Option<Self> {
        // `Language.field` and `*.field` qualifiers are accepted and ignored.
        let bare = name.rsplit('.').next().unwrap_or(name);
        Some(match bare {
            "name" => TemplateField::Name,
            "line" => TemplateField::Line,
            "input" => TemplateField::Input,
            "kind" => TemplateField::Kind,
            "roles" | "role" => TemplateField::Role,
            "compact" => TemplateField::CompactLine,
            "encodedTagName" => TemplateField::EncodedName,
            "summaryLine" | "summary" => TemplateField::Summary,
            "identifier" => TemplateField::Identifier,
            "title" => TemplateField::Title,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Width {
    left_align: bool,
    columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field {
        field: TemplateField,
        width: Option<Width>,
    },
}

/// A parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(format: &str) -> Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let left_align = chars.next_if_eq(&'-').is_some();
            let mut digits = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                digits.push(d);
            }
            let width = digits.parse().ok().map(|columns| Width {
                left_align,
                columns,
            });

            let field = match chars.next() {
                None => return Err(TemplateError::Dangling),
                Some('%') if width.is_none() && !left_align => {
                    literal.push('%');
                    continue;
                }
                Some('{') => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            None => return Err(TemplateError::Unterminated),
                            Some('}') => break,
                            Some(c) => name.push(c),
                        }
                    }
                    TemplateField::from_name(&name).ok_or(TemplateError::UnknownField(name))?
                }
                Some(c) => TemplateField::from_letter(c).ok_or(TemplateError::UnknownLetter(c))?,
            };

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Field { field, width });
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// Renders the template, asking `resolve` for each field value.
    pub fn render<'v>(&self, mut resolve: impl FnMut(TemplateField) -> Cow<'v, str>) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field { field, width } => {
                    let value = resolve(*field);
                    match *width {
                        None => out.push_str(&value),
                        Some(Width {
                            left_align: true,
                            columns,
                        }) => out.push_str(&format!("{value:<columns$}")),
                        Some(Width {
                            left_align: false,
                            columns,
                        }) => out.push_str(&format!("{value:>columns$}")),
                    }
                }
            }
        }
        out
    }
}
