//! Renderer service — form views and required-field validation.
//!
//! DESIGN
//! ======
//! Rendering is a pure function of (template, mode, initial data): no I/O,
//! no shared state. The produced `FormView` carries resolved per-field values
//! so a client can paint the form without re-deriving anything. Validation
//! walks the same template shape and returns a per-field error map; an empty
//! map means the form may be submitted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{ColumnLayout, Data, Field, FieldOption, FieldType, Template};

// =============================================================================
// TYPES
// =============================================================================

/// How a form is being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    /// Blank form; submitting creates a new submission.
    Create,
    /// Pre-filled form; submitting updates the existing submission.
    Edit,
    /// Pre-filled and read-only; no submit.
    View,
}

impl FormMode {
    /// View mode never submits.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        matches!(self, FormMode::View)
    }
}

/// A template resolved against initial data, ready to paint.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub template_id: Uuid,
    pub template_name: String,
    pub mode: FormMode,
    pub read_only: bool,
    pub sections: Vec<SectionView>,
    /// Transient notices (e.g. a failed resident fetch). Empty on the happy
    /// path.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub id: Uuid,
    pub name: String,
    pub columns: ColumnLayout,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub options: Vec<FieldOption>,
    /// Resolved value: the initial data's entry, or a blank of the right
    /// shape (empty string, or empty list for checkboxes).
    pub value: serde_json::Value,
}

// =============================================================================
// RENDER
// =============================================================================

/// Render a template as a form view. Create mode starts blank; edit and view
/// modes resolve values from the initial data.
#[must_use]
pub fn render(template: &Template, mode: FormMode, initial: &Data) -> FormView {
    let sections = template
        .sections
        .iter()
        .map(|section| SectionView {
            id: section.id,
            name: section.name.clone(),
            columns: section.columns,
            fields: section
                .fields
                .iter()
                .map(|field| field_view(field, mode, initial))
                .collect(),
        })
        .collect();

    FormView {
        template_id: template.id,
        template_name: template.name.clone(),
        mode,
        read_only: mode.is_read_only(),
        sections,
        warnings: Vec::new(),
    }
}

fn field_view(field: &Field, mode: FormMode, initial: &Data) -> FieldView {
    let value = match mode {
        FormMode::Create => blank_value(field.field_type),
        FormMode::Edit | FormMode::View => initial
            .get(&field.id)
            .cloned()
            .unwrap_or_else(|| blank_value(field.field_type)),
    };

    FieldView {
        id: field.id,
        field_type: field.field_type,
        label: field.label.clone(),
        placeholder: field.placeholder.clone(),
        required: field.required,
        options: field.options.clone(),
        value,
    }
}

fn blank_value(field_type: FieldType) -> serde_json::Value {
    if field_type.is_multi_value() {
        serde_json::Value::Array(Vec::new())
    } else {
        serde_json::Value::String(String::new())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check every required field for a non-empty value. Checkbox fields need at
/// least one selected option; everything else needs a non-empty trimmed
/// string. Returns a field-id-to-message map; empty means valid.
#[must_use]
pub fn validate(template: &Template, data: &Data) -> HashMap<Uuid, String> {
    let mut errors = HashMap::new();
    for field in template.fields() {
        if !field.required {
            continue;
        }
        if is_empty_value(field.field_type, data.get(&field.id)) {
            errors.insert(field.id, required_message(field));
        }
    }
    errors
}

fn is_empty_value(field_type: FieldType, value: Option<&serde_json::Value>) -> bool {
    let Some(value) = value else {
        return true;
    };
    if field_type.is_multi_value() {
        return value.as_array().is_none_or(Vec::is_empty);
    }
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn required_message(field: &Field) -> String {
    let label = if field.label.trim().is_empty() { "This field" } else { &field.label };
    format!("{label} is required.")
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;
