/// Keys recognised at the top level of a metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopKey {
    Id,
    Title,
    Keywords,
    Nocite,
    Next,
    References,
}

impl TopKey {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "id" => TopKey::Id,
            "title" => TopKey::Title,
            "keywords" => TopKey::Keywords,
            "nocite" => TopKey::Nocite,
            "next" => TopKey::Next,
            "references" => TopKey::References,
            _ => return None,
        })
    }
}

/// Keys recognised inside an entry of the `references` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKey {
    Id,
    Title,
}

impl ReferenceKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(ReferenceKey::Id),
            "title" => Some(ReferenceKey::Title),
            _ => None,
        }
    }
}

/// What the next scalar means for one key vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<K> {
    None,
    /// A `Key` event was seen; the next node is the key itself.
    KeyPending,
    /// The key was recognised; scalars are its values.
    Value(K),
}

/// Nesting state of the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldScope {
    pub mapping_depth: usize,
    pub sequence_depth: usize,
    /// Set by a top-level `references` key, cleared by the next top-level
    /// key or when the references list closes.
    pub in_reference: bool,
}

impl FieldScope {
    pub fn at_top_level_key(&self) -> bool {
        self.mapping_depth == 1 && self.sequence_depth == 0
    }

    pub fn at_top_level_value(&self) -> bool {
        self.mapping_depth == 1
    }

    pub fn at_reference_entry(&self) -> bool {
        self.in_reference && self.mapping_depth == 2 && self.sequence_depth < 2
    }
}

/// Last-seen identifier and title of one scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scratch {
    pub identifier: Option<String>,
    pub title: Option<String>,
}

impl Scratch {
    pub fn clear(&mut self) {
        self.identifier = None;
        self.title = None;
    }

    /// Overwrites the fields `other` carries.
    pub fn update_from(&mut self, other: &Scratch) {
        if let Some(identifier) = &other.identifier {
            self.identifier = Some(identifier.clone());
        }
        if let Some(title) = &other.title {
            self.title = Some(title.clone());
        }
    }
}
