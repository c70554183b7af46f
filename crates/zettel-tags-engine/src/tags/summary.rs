use crate::options::Options;

use super::store::TagEntry;
use super::template::{Template, TemplateError};

/// Picks the summary template for a tag: the reference template for tags
/// carrying a role, the definition template otherwise.
///
/// Both templates are parsed once when the selector is built.
#[derive(Debug, Clone)]
pub struct SummarySelector {
    definition: Template,
    reference: Template,
}

impl SummarySelector {
    pub fn new(options: &Options) -> Result<Self, TemplateError> {
        Ok(Self {
            definition: Template::parse(&options.definition_format)?,
            reference: Template::parse(options.reference_format())?,
        })
    }

    pub fn select(&self, entry: &TagEntry) -> &Template {
        if entry.is_reference() {
            &self.reference
        } else {
            &self.definition
        }
    }
}
