use relative_path::{RelativePath, RelativePathBuf};

/// How a note file is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoteFormat {
    /// Markdown with optional metadata blocks.
    Markdown,
    /// A standalone YAML metadata file.
    Yaml,
}

impl NoteFormat {
    pub const MARKDOWN_EXTENSIONS: &'static [&'static str] = &["md", "markdown"];
    pub const YAML_EXTENSIONS: &'static [&'static str] = &["yaml", "yml"];

    /// The format for a file extension, if it is a note at all.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if Self::MARKDOWN_EXTENSIONS.contains(&ext.as_str()) {
            Some(NoteFormat::Markdown)
        } else if Self::YAML_EXTENSIONS.contains(&ext.as_str()) {
            Some(NoteFormat::Yaml)
        } else {
            None
        }
    }
}

/// A note file, addressed relative to the notes root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteFile {
    relative_path: RelativePathBuf,
    format: NoteFormat,
}

impl NoteFile {
    /// Returns `None` when the extension is not a note extension
    pub fn new(relative_path: RelativePathBuf) -> Option<Self> {
        let format = NoteFormat::from_extension(relative_path.extension()?)?;
        Some(Self {
            relative_path,
            format,
        })
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    pub fn format(&self) -> NoteFormat {
        self.format
    }
}
