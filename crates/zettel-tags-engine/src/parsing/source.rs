/// Byte offsets of every line start, for offset → line lookups.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// 1-based line number of the byte at `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    /// Text of a 1-based line, without its line ending.
    pub fn line_text<'t>(&self, text: &'t str, line: usize) -> Option<&'t str> {
        let start = *self.starts.get(line.checked_sub(1)?)?;
        if start > text.len() {
            return None;
        }
        let end = self
            .starts
            .get(line)
            .map_or(text.len(), |next| next.saturating_sub(1));
        Some(text[start..end].trim_end_matches('\r'))
    }
}

/// Collapses a source line for display: leading whitespace dropped, every
/// whitespace run turned into one space, line ending removed.
pub fn compact_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;
    for c in line.trim_start().trim_end_matches(['\r', '\n']).chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_offsets() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 1);
        assert_eq!(index.line_of(3), 2);
        assert_eq!(index.line_of(6), 3);
        assert_eq!(index.line_of(7), 4);
        assert_eq!(index.line_of(9), 4);
    }

    #[test]
    fn line_text_strips_endings() {
        let text = "first\r\nsecond\nthird";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(text, 1), Some("first"));
        assert_eq!(index.line_text(text, 2), Some("second"));
        assert_eq!(index.line_text(text, 3), Some("third"));
        assert_eq!(index.line_text(text, 4), None);
        assert_eq!(index.line_text(text, 0), None);
    }

    #[test]
    fn compact_line_collapses_whitespace() {
        assert_eq!(compact_line("   see  [[z2]]\tand\t\t@doe \r\n"), "see [[z2]] and @doe");
        assert_eq!(compact_line(""), "");
        assert_eq!(compact_line(" \t "), "");
    }
}
