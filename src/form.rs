//! Form model — templates, sections, fields, and submissions.
//!
//! ARCHITECTURE
//! ============
//! Everything Formboard stores or renders is built from these types. A
//! `Template` is an ordered list of `Section`s, each holding an ordered list
//! of typed `Field`s. A `Submission` is one filled instance of a template:
//! a flat mapping of field id to value plus a timestamp.
//!
//! DESIGN
//! ======
//! - Flat data: a submission payload is always `Map<Uuid, Value>`, never
//!   nested. A value is a string, or a list of strings for checkbox fields.
//! - Ids are v4 UUIDs assigned at construction; uniqueness within a template
//!   follows from that and is re-checked before a draft is saved.
//! - Options serialize as either plain strings or `{label, value}` pairs so
//!   the stored JSON matches both static choice fields and resident
//!   dropdowns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

/// Flat field-id-to-value payload of a filled form. Alias to reduce noise in
/// signatures.
pub type Data = HashMap<Uuid, serde_json::Value>;

/// The kind of input a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Input,
    Textarea,
    Select,
    Checkbox,
    Radio,
    ResidentDropdown,
}

impl FieldType {
    /// Static choice fields carry their options in the template itself.
    /// Resident dropdowns get options injected from the directory at fill
    /// time and are deliberately excluded.
    #[must_use]
    pub fn has_static_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Checkbox | FieldType::Radio)
    }

    /// Checkbox values are lists of selected options; everything else is a
    /// single string.
    #[must_use]
    pub fn is_multi_value(self) -> bool {
        matches!(self, FieldType::Checkbox)
    }
}

/// One selectable option of a choice field.
///
/// Static choice fields store plain strings (the label doubles as the value).
/// Resident dropdowns store `{label, value}` pairs where the value is the
/// resident id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Plain(String),
    Labeled { label: String, value: String },
}

impl FieldOption {
    /// The value submitted when this option is chosen.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Plain(v) => v,
            FieldOption::Labeled { value, .. } => value,
        }
    }

    /// The text shown next to this option.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            FieldOption::Plain(v) => v,
            FieldOption::Labeled { label, .. } => label,
        }
    }
}

/// A single input definition inside a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub options: Vec<FieldOption>,
}

impl Field {
    /// Create a blank field of the given type. The builder opens it for
    /// editing immediately after, so label and placeholder start empty.
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: Uuid::new_v4(),
            field_type,
            label: String::new(),
            placeholder: String::new(),
            required: false,
            options: Vec::new(),
        }
    }
}

/// Responsive column counts for a section, one per breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub sm: u8,
    pub md: u8,
    pub lg: u8,
}

/// Column counts outside this range render badly; the section editor caps
/// its inputs the same way.
pub const COLUMN_MIN: u8 = 1;
pub const COLUMN_MAX: u8 = 6;

impl ColumnLayout {
    /// Clamp every breakpoint into the supported `1..=6` range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            sm: self.sm.clamp(COLUMN_MIN, COLUMN_MAX),
            md: self.md.clamp(COLUMN_MIN, COLUMN_MAX),
            lg: self.lg.clamp(COLUMN_MIN, COLUMN_MAX),
        }
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self { sm: 1, md: 2, lg: 3 }
    }
}

/// A named group of fields with a responsive column layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub name: String,
    pub columns: ColumnLayout,
    pub fields: Vec<Field>,
}

impl Section {
    /// Create an empty section with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: ColumnLayout) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            columns: columns.clamped(),
            fields: Vec::new(),
        }
    }
}

/// A reusable form definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub sections: Vec<Section>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Template {
    /// Assemble a finished template from builder output. Stamps a fresh id
    /// and the creation time.
    #[must_use]
    pub fn new(name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sections,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Iterate all fields across all sections in render order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// True when any field pulls its options from the resident directory.
    #[must_use]
    pub fn has_resident_fields(&self) -> bool {
        self.fields()
            .any(|f| f.field_type == FieldType::ResidentDropdown)
    }
}

/// One filled instance of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub template_id: Uuid,
    pub data: Data,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

impl Submission {
    /// Wrap validated form data in a new submission record.
    #[must_use]
    pub fn new(template_id: Uuid, data: Data) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id,
            data,
            submitted_at: OffsetDateTime::now_utc(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
