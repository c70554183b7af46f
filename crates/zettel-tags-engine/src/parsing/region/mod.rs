//! # Region scanner
//!
//! A pull-driven state machine over the note text. Each call to
//! [`RegionScanner::step`] applies exactly one rule of the current region's
//! table and reports what it found. Only the `Main` region yields
//! references; a closed metadata block is handed out whole.

pub mod table;

pub use table::{Action, Advance, Emit, Guard, Region, RegionTable, Rule};

use crate::parsing::source::LineIndex;

/// A reference found in the note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'t> {
    pub emit: Emit,
    /// The captured name, delimiters stripped.
    pub raw: &'t str,
    /// 1-based line of the start of the match.
    pub line: usize,
}

/// The lines strictly between a metadata block's delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock<'t> {
    pub text: &'t str,
    /// 1-based line of the first content line.
    pub first_line: usize,
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    Complete,
    /// End of input inside a region that needs a closing delimiter.
    Unterminated(Region),
    /// No usable rule at `line`; the rest of the text was skipped.
    Aborted { line: usize, region: Region },
}

impl ScanEnd {
    pub fn is_complete(self) -> bool {
        matches!(self, ScanEnd::Complete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned<'t> {
    /// Text was consumed without producing anything.
    Consumed,
    Reference(Occurrence<'t>),
    Metadata(MetadataBlock<'t>),
    Done(ScanEnd),
}

pub struct RegionScanner<'t, 'r> {
    table: &'r RegionTable,
    text: &'t str,
    lines: LineIndex,
    pos: usize,
    region: Region,
    metadata_start: usize,
    aborted: Option<(usize, Region)>,
    end: Option<ScanEnd>,
}

impl<'t, 'r> RegionScanner<'t, 'r> {
    pub fn new(table: &'r RegionTable, text: &'t str) -> Self {
        Self {
            table,
            text,
            lines: LineIndex::new(text),
            pos: 0,
            region: Region::Main,
            metadata_start: 0,
            aborted: None,
            end: None,
        }
    }

    /// Applies one rule. Once [`Scanned::Done`] has been returned, every
    /// further call returns it again.
    pub fn step(&mut self) -> Scanned<'t> {
        if let Some(end) = self.end {
            return Scanned::Done(end);
        }

        let text = self.text;
        let rest = &text[self.pos..];
        if rest.is_empty() {
            let end = self.finish();
            self.end = Some(end);
            return Scanned::Done(end);
        }

        let table = self.table;
        for rule in table.rules(self.region) {
            if !self.guard_holds(rule.guard) {
                continue;
            }
            let Some(caps) = rule.pattern.captures(rest) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let resume = match rule.advance {
                Advance::End => whole.end(),
                Advance::Start => whole.start(),
                Advance::CaptureEnd(name) => caps.name(name).map_or(whole.end(), |m| m.end()),
            };
            if resume == 0 && rule.action == Action::None {
                continue;
            }

            let start = self.pos;
            let scanned = match (rule.emit, rule.action) {
                (Some((emit, capture)), _) => match caps.name(capture) {
                    Some(m) => Scanned::Reference(Occurrence {
                        emit,
                        raw: m.as_str(),
                        line: self.lines.line_of(start),
                    }),
                    None => Scanned::Consumed,
                },
                (None, Action::EnterRegion(region)) => {
                    if region == Region::Metadata {
                        self.metadata_start = start + resume;
                    }
                    self.region = region;
                    Scanned::Consumed
                }
                (None, Action::LeaveRegion) => {
                    let left = std::mem::replace(&mut self.region, Region::Main);
                    if left == Region::Metadata {
                        Scanned::Metadata(MetadataBlock {
                            text: &text[self.metadata_start..start],
                            first_line: self.lines.line_of(self.metadata_start),
                        })
                    } else {
                        Scanned::Consumed
                    }
                }
                (None, Action::Abort) => {
                    let line = self.lines.line_of(start);
                    log::debug!("no rule for line {line} in {:?}, skipping the rest", self.region);
                    self.aborted = Some((line, self.region));
                    self.region = Region::Rest;
                    Scanned::Consumed
                }
                (None, Action::None) => Scanned::Consumed,
            };
            self.pos = start + resume;
            return scanned;
        }

        // Every table ends in a catch-all; this only guards against a
        // malformed table.
        let line = self.lines.line_of(self.pos);
        log::debug!("no rule matched at line {line} in {:?}", self.region);
        self.aborted.get_or_insert((line, self.region));
        self.region = Region::Rest;
        self.pos = self.text.len();
        Scanned::Consumed
    }

    fn finish(&self) -> ScanEnd {
        if let Some((line, region)) = self.aborted {
            return ScanEnd::Aborted { line, region };
        }
        match self.region {
            Region::Main | Region::Verbatim | Region::Rest => ScanEnd::Complete,
            Region::Metadata => {
                log::warn!(
                    "metadata block starting at line {} is not closed, ignoring it",
                    self.lines.line_of(self.metadata_start)
                );
                ScanEnd::Unterminated(Region::Metadata)
            }
            region => ScanEnd::Unterminated(region),
        }
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.text.as_bytes()[self.pos - 1] == b'\n'
    }

    fn guard_holds(&self, guard: Guard) -> bool {
        match guard {
            Guard::None => true,
            Guard::LineStart => self.at_line_start(),
            Guard::WordBoundary => self.text[..self.pos]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric()),
        }
    }
}

impl<'t> Iterator for RegionScanner<'t, '_> {
    type Item = Scanned<'t>;

    /// Yields everything but [`Scanned::Consumed`], ending after
    /// [`Scanned::Done`].
    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() {
            return None;
        }
        loop {
            match self.step() {
                Scanned::Consumed => continue,
                other => return Some(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(text: &str) -> (Vec<(Emit, String, usize)>, Vec<String>, ScanEnd) {
        let table = RegionTable::new().unwrap();
        let mut refs = Vec::new();
        let mut blocks = Vec::new();
        for item in RegionScanner::new(&table, text) {
            match item {
                Scanned::Reference(o) => refs.push((o.emit, o.raw.to_string(), o.line)),
                Scanned::Metadata(b) => blocks.push(b.text.to_string()),
                Scanned::Done(end) => return (refs, blocks, end),
                Scanned::Consumed => unreachable!(),
            }
        }
        unreachable!("scanner always finishes with Done")
    }

    fn names(text: &str) -> Vec<String> {
        scan(text).0.into_iter().map(|(_, n, _)| n).collect()
    }

    #[test]
    fn links_and_citations_in_prose() {
        let (refs, _, end) = scan("See [[z2]] and @doe99.\nAlso next:[[z3]].\n");
        assert_eq!(
            refs,
            vec![
                (Emit::WikiLink, "z2".to_string(), 1),
                (Emit::Citation, "doe99.".to_string(), 1),
                (Emit::ForwardLink, "z3".to_string(), 2),
            ]
        );
        assert_eq!(end, ScanEnd::Complete);
    }

    #[test]
    fn metadata_block_is_handed_over() {
        let (refs, blocks, end) = scan("---\nid: z1\ntitle: Hello\n...\n[[z2]]\n");
        assert_eq!(blocks, vec!["id: z1\ntitle: Hello\n".to_string()]);
        assert_eq!(refs, vec![(Emit::WikiLink, "z2".to_string(), 5)]);
        assert_eq!(end, ScanEnd::Complete);
    }

    #[test]
    fn metadata_first_line() {
        let table = RegionTable::new().unwrap();
        let block = RegionScanner::new(&table, "intro\n\n---\nid: z1\n---\n")
            .find_map(|s| match s {
                Scanned::Metadata(b) => Some(b),
                _ => None,
            })
            .unwrap();
        assert_eq!(block.first_line, 4);
        assert_eq!(block.text, "id: z1\n");
    }

    #[test]
    fn unclosed_metadata_is_unterminated() {
        let (_, blocks, end) = scan("---\nid: z1\n[[z2]]\n");
        assert!(blocks.is_empty());
        assert_eq!(end, ScanEnd::Unterminated(Region::Metadata));
    }

    #[test]
    fn protected_regions_hide_references() {
        let text = "\
`[[a]]` ``[[b]]``
<!-- [[c]] -- still comment -->
~~~
[[d]]
~~~
```python
@e
```

    [[f]]
\t[[g]]

[[h]]
";
        assert_eq!(names(text), vec!["h".to_string()]);
    }

    #[test]
    fn indented_line_after_prose_is_verbatim() {
        assert!(names("para\n    [[z2]] code\n").is_empty());
        assert!(names("para\n\t[[z2]]\n").is_empty());
    }

    #[test]
    fn indentation_mid_line_is_prose() {
        assert_eq!(names("[    [[z2]]\n"), vec!["z2".to_string()]);
    }

    #[test]
    fn partial_line_in_verbatim_aborts() {
        let (refs, _, end) = scan("text\n\n    code");
        assert!(refs.is_empty());
        assert_eq!(
            end,
            ScanEnd::Aborted {
                line: 3,
                region: Region::Verbatim
            }
        );
    }

    #[test]
    fn verbatim_leaves_on_unindented_line() {
        let (refs, _, end) = scan("    code [[x]]\n  [[y]]\n");
        assert_eq!(refs, vec![(Emit::WikiLink, "y".to_string(), 2)]);
        assert_eq!(end, ScanEnd::Complete);
    }

    #[test]
    fn unterminated_fence_stops_references() {
        let (refs, _, end) = scan("[[before]]\n```\n[[inside]]\n");
        assert_eq!(refs, vec![(Emit::WikiLink, "before".to_string(), 1)]);
        assert_eq!(end, ScanEnd::Unterminated(Region::BacktickCode));
    }

    #[test]
    fn partial_line_in_fence_aborts() {
        let (refs, _, end) = scan("[[before]]\n~~~\ncode");
        assert_eq!(refs.len(), 1);
        assert_eq!(
            end,
            ScanEnd::Aborted {
                line: 3,
                region: Region::FencedCode
            }
        );
    }

    #[test]
    fn emails_and_examples_are_not_citations() {
        let text = "(@ex) mail <jane@example.org>, mailto:joe@example.org, joe@example.org @real\n";
        assert_eq!(names(text), vec!["real".to_string()]);
    }

    #[test]
    fn escaped_at_is_not_a_citation() {
        assert!(names("\\@doe\n").is_empty());
    }

    #[test]
    fn forward_link_is_not_double_counted() {
        let (refs, _, _) = scan("next:[[z3]]\n");
        assert_eq!(refs, vec![(Emit::ForwardLink, "z3".to_string(), 1)]);
    }

    #[test]
    fn setext_underline_after_link_is_not_metadata() {
        let (refs, blocks, end) = scan("[[z2]]\n---\nid: nope\n");
        assert_eq!(refs, vec![(Emit::WikiLink, "z2".to_string(), 1)]);
        assert!(blocks.is_empty());
        assert_eq!(end, ScanEnd::Complete);
    }

    #[test]
    fn last_line_without_newline() {
        let (refs, _, end) = scan("see [[z2]]");
        assert_eq!(refs, vec![(Emit::WikiLink, "z2".to_string(), 1)]);
        assert_eq!(end, ScanEnd::Complete);
    }

    #[test]
    fn done_is_sticky() {
        let table = RegionTable::new().unwrap();
        let mut scanner = RegionScanner::new(&table, "");
        assert_eq!(scanner.step(), Scanned::Done(ScanEnd::Complete));
        assert_eq!(scanner.step(), Scanned::Done(ScanEnd::Complete));
        assert_eq!(scanner.next(), None);
    }
}
