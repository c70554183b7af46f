//! # Tags
//!
//! The tag model and everything that happens to a tag after a scanner has
//! created it.
//!
//! - [`kind`]: tag kinds, per-kind roles, extras
//! - [`store`]: the [`TagSink`] seam the scanners write to, and the
//!   in-memory [`TagTable`]
//! - [`encode`]: output-safe tag names
//! - [`template`], [`summary`], [`render`]: summary lines, tags files and
//!   cross-reference listings

pub mod encode;
pub mod kind;
pub mod render;
pub mod store;
pub mod summary;
pub mod template;

pub use encode::encode_name;
pub use kind::{CitekeyRole, Extra, KeywordRole, NextlinkRole, Role, TagKind, WikilinkRole};
pub use render::Renderer;
pub use store::{NewTag, Origin, SourceFile, SourceId, TagEntry, TagHandle, TagSink, TagTable};
pub use summary::SummarySelector;
pub use template::{Template, TemplateError, TemplateField};
