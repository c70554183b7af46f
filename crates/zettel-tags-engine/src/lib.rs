pub mod io;
pub mod models;
pub mod options;
pub mod parsing;
pub mod tags;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::*;
pub use models::*;
pub use options::*;
pub use parsing::{NoteScan, NoteScanner, ScanError};
pub use tags::{Renderer, Role, TagKind, TagSink, TagTable};
