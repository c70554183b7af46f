//! The region state machine, as data.
//!
//! Every region owns an ordered list of [`Rule`]s. The scanner tries them in
//! order at the current position and applies the first one that matches;
//! there is no backtracking across rules.

use regex::Regex;

use crate::parsing::links::kinds::{Citation, Email, ForwardLink, NumberedExample, WikiLink};

/// A lexical mode of the scanner. Only [`Region::Main`] produces references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Main,
    Metadata,
    Verbatim,
    FencedCode,
    BacktickCode,
    Comment,
    /// Terminal state after an abort; remaining lines are skipped.
    Rest,
}

/// Context a rule needs beyond its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// Only at the start of a line.
    LineStart,
    /// Not directly after an alphanumeric character.
    WordBoundary,
}

/// The reference a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    ForwardLink,
    WikiLink,
    Citation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    EnterRegion(Region),
    LeaveRegion,
    Abort,
}

/// Where scanning resumes after a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// After the whole match.
    End,
    /// At the start of the match, so the next region rescans it.
    Start,
    /// After the named capture group.
    CaptureEnd(&'static str),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub guard: Guard,
    /// The reference and the capture group holding its name.
    pub emit: Option<(Emit, &'static str)>,
    pub action: Action,
    pub advance: Advance,
}

impl Rule {
    fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            guard: Guard::None,
            emit: None,
            action: Action::None,
            advance: Advance::End,
        })
    }

    fn guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    fn emit(mut self, emit: Emit, capture: &'static str) -> Self {
        self.emit = Some((emit, capture));
        self
    }

    fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    fn advance(mut self, advance: Advance) -> Self {
        self.advance = advance;
        self
    }
}

const METADATA_OPEN: &str = "open";

/// Compiled rules for every region.
#[derive(Debug, Clone)]
pub struct RegionTable {
    main: Vec<Rule>,
    metadata: Vec<Rule>,
    verbatim: Vec<Rule>,
    fenced_code: Vec<Rule>,
    backtick_code: Vec<Rule>,
    comment: Vec<Rule>,
    rest: Vec<Rule>,
}

impl RegionTable {
    pub fn new() -> Result<Self, regex::Error> {
        use Action::{Abort, EnterRegion, LeaveRegion};

        let main = vec![
            // A metadata block opens on `---` followed by a non-blank line.
            Rule::new(r"^(?P<open>---(?:[ \t][^\n]*)?\n)[ \t]*[^ \t\n]")?
                .guard(Guard::LineStart)
                .action(EnterRegion(Region::Metadata))
                .advance(Advance::CaptureEnd(METADATA_OPEN)),
            Rule::new(r"^    [^\n]*(?:\n|\z)")?
                .guard(Guard::LineStart)
                .action(EnterRegion(Region::Verbatim))
                .advance(Advance::Start),
            Rule::new(r"^\t[^\n]*(?:\n|\z)")?
                .guard(Guard::LineStart)
                .action(EnterRegion(Region::Verbatim))
                .advance(Advance::Start),
            Rule::new(r"^[ \t]*~~~~*[^~\n]*\n")?
                .guard(Guard::LineStart)
                .action(EnterRegion(Region::FencedCode)),
            Rule::new(r"^[ \t]*````*[^`\n]*\n")?
                .guard(Guard::LineStart)
                .action(EnterRegion(Region::BacktickCode)),
            Rule::new(r"^``(?:[^\n]|\n[^\n])+?``(?:\n-+\n)?")?,
            Rule::new(r"^`(?:[^`\n]|\n[^`\n])+`(?:\n-+\n)?")?,
            Rule::new(r"^<!--")?.action(EnterRegion(Region::Comment)),
            Rule::new(ForwardLink::PATTERN)?.emit(Emit::ForwardLink, WikiLink::ID),
            Rule::new(WikiLink::PATTERN)?.emit(Emit::WikiLink, WikiLink::ID),
            Rule::new(NumberedExample::PATTERN)?,
            Rule::new(Email::BRACKETED)?,
            Rule::new(Email::MAILTO)?,
            Rule::new(Citation::PATTERN)?
                .guard(Guard::WordBoundary)
                .emit(Emit::Citation, Citation::KEY),
            Rule::new(r"^\\[^\n](?:\n-+\n)?")?,
            Rule::new(r"^[\[<`mn@\\](?:\n-+\n)?")?,
            Rule::new(r"^[^\[<`mn@\\\n]+(?:\n-+\n)?")?,
            Rule::new(r"^[^\n]*\n")?,
            Rule::new(r"^[^\n]+")?.action(Abort),
        ];

        let metadata = vec![
            Rule::new(r"^---(?:[ \t][^\n]*)?(?:\n|\z)")?.action(LeaveRegion),
            Rule::new(r"^\.\.\.(?:[ \t][^\n]*)?(?:\n|\z)")?.action(LeaveRegion),
            Rule::new(r"^[^\n]*\n")?,
            Rule::new(r"^[^\n]+")?.action(Abort),
        ];

        let verbatim = vec![
            Rule::new(r"^ {0,3}[^ \t\n][^\n]*(?:\n|\z)")?
                .action(LeaveRegion)
                .advance(Advance::Start),
            Rule::new(r"^ {4}[^\n]*\n")?,
            Rule::new(r"^\t[^\n]*\n")?,
            Rule::new(r"^[ \t]*\n")?,
            Rule::new(r"^[ \t]+[^\n]*")?.action(Abort),
        ];

        let fenced_code = vec![
            Rule::new(r"^[ \t]*~~~~*[ \t]*(?:\n|\z)")?.action(LeaveRegion),
            Rule::new(r"^[^\n]*\n")?,
            Rule::new(r"^[^\n]+")?.action(Abort),
        ];

        let backtick_code = vec![
            Rule::new(r"^[ \t]*````*[ \t]*(?:\n|\z)")?.action(LeaveRegion),
            Rule::new(r"^[^\n]*\n")?,
            Rule::new(r"^[^\n]+")?.action(Abort),
        ];

        let comment = vec![
            Rule::new(r"^--[ \t]*>(?:\n-+\n)?")?.action(LeaveRegion),
            Rule::new(r"^[^-]+")?,
            Rule::new(r"^-+")?,
        ];

        let rest = vec![Rule::new(r"^[^\n]*\n")?, Rule::new(r"^[^\n]+")?];

        Ok(Self {
            main,
            metadata,
            verbatim,
            fenced_code,
            backtick_code,
            comment,
            rest,
        })
    }

    pub fn rules(&self, region: Region) -> &[Rule] {
        match region {
            Region::Main => &self.main,
            Region::Metadata => &self.metadata,
            Region::Verbatim => &self.verbatim,
            Region::FencedCode => &self.fenced_code,
            Region::BacktickCode => &self.backtick_code,
            Region::Comment => &self.comment,
            Region::Rest => &self.rest,
        }
    }
}
