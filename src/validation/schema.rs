use crate::types::ResourceKind;

/// JSON type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
        }
    }
}

/// One row of the constraint table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub required: bool,
    pub kind: FieldKind,
    /// Minimum character count; empty strings are rejected regardless
    pub min_len: usize,
}

impl FieldRule {
    pub fn string(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: false,
            kind: FieldKind::String,
            min_len: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }
}

/// Ordered constraint table; rules are checked top to bottom
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Write-body schema of a resource kind: a single required label string
    pub fn for_kind(kind: &ResourceKind) -> Self {
        Self::new().rule(FieldRule::string(kind.label_field).required().min(kind.min_len))
    }
}
