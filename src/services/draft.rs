//! Draft service — template composition and save.
//!
//! DESIGN
//! ======
//! A draft is the builder's in-memory working copy of a template. Section and
//! field mutations update the draft map in shared state immediately; nothing
//! touches the store until the draft is saved. Saving validates the draft as
//! a whole, appends a finished template to the store, and drops the draft.
//!
//! Field reordering is a splice-based move within one section; cross-section
//! moves are not supported.

use tracing::info;
use uuid::Uuid;

use crate::form::{ColumnLayout, Field, FieldOption, FieldType, Section, Template};
use crate::state::{AppState, DraftState};
use crate::store::StoreError;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft not found: {0}")]
    DraftNotFound(Uuid),
    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("section not found: {0}")]
    SectionNotFound(Uuid),
    #[error("field not found: {0}")]
    FieldNotFound(Uuid),
    #[error("template name is empty")]
    NameRequired,
    #[error("section name is empty")]
    SectionNameRequired,
    #[error("template has no sections")]
    NoSections,
    #[error("choice field has no options: {label}")]
    EmptyOptions { label: String },
    #[error("duplicate id within template: {0}")]
    DuplicateId(Uuid),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Partial update for one field, applied over its current values.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    /// Option lines from the editor, one string per option. Applied only to
    /// static choice fields; entries are trimmed and blanks dropped.
    pub options: Option<Vec<String>>,
}

// =============================================================================
// DRAFT LIFECYCLE
// =============================================================================

/// Open a new draft, blank or seeded from a saved template
/// (duplicate-and-edit; saving always appends a new template).
///
/// # Errors
///
/// Returns `TemplateNotFound` if a seed template id does not resolve.
pub async fn create_draft(
    state: &AppState,
    from_template: Option<Uuid>,
) -> Result<(Uuid, DraftState), DraftError> {
    let draft = match from_template {
        Some(template_id) => {
            let template = state
                .store
                .template(template_id)
                .await
                .ok_or(DraftError::TemplateNotFound(template_id))?;
            DraftState { name: template.name, sections: template.sections }
        }
        None => DraftState::new(),
    };

    let draft_id = Uuid::new_v4();
    let mut drafts = state.drafts.write().await;
    drafts.insert(draft_id, draft.clone());
    info!(%draft_id, seeded = from_template.is_some(), "draft opened");
    Ok((draft_id, draft))
}

/// Fetch a snapshot of one draft.
///
/// # Errors
///
/// Returns `DraftNotFound` if the draft does not exist.
pub async fn draft(state: &AppState, draft_id: Uuid) -> Result<DraftState, DraftError> {
    let drafts = state.drafts.read().await;
    drafts
        .get(&draft_id)
        .cloned()
        .ok_or(DraftError::DraftNotFound(draft_id))
}

/// Rename a draft. The name is validated at save, not here, so the builder
/// can hold an empty name while composing.
///
/// # Errors
///
/// Returns `DraftNotFound` if the draft does not exist.
pub async fn rename_draft(state: &AppState, draft_id: Uuid, name: String) -> Result<DraftState, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;
    draft.name = name;
    Ok(draft.clone())
}

/// Drop a draft without saving. Idempotent.
pub async fn discard_draft(state: &AppState, draft_id: Uuid) {
    let mut drafts = state.drafts.write().await;
    if drafts.remove(&draft_id).is_some() {
        info!(%draft_id, "draft discarded");
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Append a new empty section to a draft.
///
/// # Errors
///
/// Returns `SectionNameRequired` for a blank name.
pub async fn add_section(
    state: &AppState,
    draft_id: Uuid,
    name: &str,
    columns: Option<ColumnLayout>,
) -> Result<Section, DraftError> {
    if name.trim().is_empty() {
        return Err(DraftError::SectionNameRequired);
    }

    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;

    let section = Section::new(name, columns.unwrap_or_default());
    draft.sections.push(section.clone());
    Ok(section)
}

/// Update a section's name and/or column layout.
///
/// # Errors
///
/// Returns `SectionNameRequired` when the new name is blank.
pub async fn update_section(
    state: &AppState,
    draft_id: Uuid,
    section_id: Uuid,
    name: Option<String>,
    columns: Option<ColumnLayout>,
) -> Result<Section, DraftError> {
    if let Some(name) = &name {
        if name.trim().is_empty() {
            return Err(DraftError::SectionNameRequired);
        }
    }

    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;
    let section = section_mut(draft, section_id)?;

    if let Some(name) = name {
        section.name = name;
    }
    if let Some(columns) = columns {
        section.columns = columns.clamped();
    }
    Ok(section.clone())
}

/// Remove a section and every field in it.
///
/// # Errors
///
/// Returns `SectionNotFound` if the section does not exist.
pub async fn delete_section(state: &AppState, draft_id: Uuid, section_id: Uuid) -> Result<(), DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;

    let before = draft.sections.len();
    draft.sections.retain(|s| s.id != section_id);
    if draft.sections.len() == before {
        return Err(DraftError::SectionNotFound(section_id));
    }
    Ok(())
}

// =============================================================================
// FIELDS
// =============================================================================

/// Append a blank field of the given type to a section and return it. The
/// builder opens the returned field for editing.
///
/// # Errors
///
/// Returns `DraftNotFound` or `SectionNotFound`.
pub async fn add_field(
    state: &AppState,
    draft_id: Uuid,
    section_id: Uuid,
    field_type: FieldType,
) -> Result<Field, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;
    let section = section_mut(draft, section_id)?;

    let field = Field::new(field_type);
    section.fields.push(field.clone());
    Ok(field)
}

/// Apply a partial update to one field. Options are only applied to static
/// choice fields; resident dropdowns keep theirs empty until fill time, and
/// plain inputs have none.
///
/// # Errors
///
/// Returns `DraftNotFound`, `SectionNotFound`, or `FieldNotFound`.
pub async fn update_field(
    state: &AppState,
    draft_id: Uuid,
    section_id: Uuid,
    field_id: Uuid,
    patch: FieldPatch,
) -> Result<Field, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;
    let section = section_mut(draft, section_id)?;
    let field = section
        .fields
        .iter_mut()
        .find(|f| f.id == field_id)
        .ok_or(DraftError::FieldNotFound(field_id))?;

    if let Some(label) = patch.label {
        field.label = label;
    }
    if let Some(placeholder) = patch.placeholder {
        field.placeholder = placeholder;
    }
    if let Some(required) = patch.required {
        field.required = required;
    }
    if let Some(options) = patch.options {
        if field.field_type.has_static_options() {
            field.options = options
                .iter()
                .map(|o| o.trim())
                .filter(|o| !o.is_empty())
                .map(|o| FieldOption::Plain(o.to_owned()))
                .collect();
        }
    }

    Ok(field.clone())
}

/// Remove a field from a section.
///
/// # Errors
///
/// Returns `DraftNotFound`, `SectionNotFound`, or `FieldNotFound`.
pub async fn delete_field(
    state: &AppState,
    draft_id: Uuid,
    section_id: Uuid,
    field_id: Uuid,
) -> Result<(), DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;
    let section = section_mut(draft, section_id)?;

    let before = section.fields.len();
    section.fields.retain(|f| f.id != field_id);
    if section.fields.len() == before {
        return Err(DraftError::FieldNotFound(field_id));
    }
    Ok(())
}

/// Splice-move a field to a new position within its section. The target
/// index is clamped to the list length; membership and length are preserved.
/// Returns the section's new field order.
///
/// # Errors
///
/// Returns `DraftNotFound`, `SectionNotFound`, or `FieldNotFound`.
pub async fn move_field(
    state: &AppState,
    draft_id: Uuid,
    section_id: Uuid,
    field_id: Uuid,
    to_index: usize,
) -> Result<Vec<Field>, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;
    let section = section_mut(draft, section_id)?;

    let from_index = section
        .fields
        .iter()
        .position(|f| f.id == field_id)
        .ok_or(DraftError::FieldNotFound(field_id))?;

    let field = section.fields.remove(from_index);
    let to_index = to_index.min(section.fields.len());
    section.fields.insert(to_index, field);

    Ok(section.fields.clone())
}

// =============================================================================
// SAVE
// =============================================================================

/// Validate a draft and persist it as a finished template. On success the
/// draft is dropped and the new template returned; on failure the draft is
/// left untouched.
///
/// # Errors
///
/// Returns a validation error (`NameRequired`, `NoSections`, `EmptyOptions`,
/// `DuplicateId`) or a storage error from the blob write.
pub async fn save_draft(
    state: &AppState,
    draft_id: Uuid,
    name: Option<String>,
) -> Result<Template, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or(DraftError::DraftNotFound(draft_id))?;

    if let Some(name) = name {
        draft.name = name;
    }
    validate_draft(draft)?;

    let template = Template::new(draft.name.trim(), draft.sections.clone());
    state.store.insert_template(template.clone()).await?;
    drafts.remove(&draft_id);

    info!(
        template_id = %template.id,
        name = %template.name,
        sections = template.sections.len(),
        "template saved"
    );
    Ok(template)
}

/// Check the save-time invariants: non-empty name, at least one section,
/// non-empty options on static choice fields, unique section and field ids.
fn validate_draft(draft: &DraftState) -> Result<(), DraftError> {
    if draft.name.trim().is_empty() {
        return Err(DraftError::NameRequired);
    }
    if draft.sections.is_empty() {
        return Err(DraftError::NoSections);
    }

    let mut seen = std::collections::HashSet::new();
    for section in &draft.sections {
        if !seen.insert(section.id) {
            return Err(DraftError::DuplicateId(section.id));
        }
        for field in &section.fields {
            if !seen.insert(field.id) {
                return Err(DraftError::DuplicateId(field.id));
            }
            if field.field_type.has_static_options() && field.options.is_empty() {
                let label = if field.label.trim().is_empty() {
                    "This field".to_owned()
                } else {
                    field.label.clone()
                };
                return Err(DraftError::EmptyOptions { label });
            }
        }
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn section_mut(draft: &mut DraftState, section_id: Uuid) -> Result<&mut Section, DraftError> {
    draft
        .sections
        .iter_mut()
        .find(|s| s.id == section_id)
        .ok_or(DraftError::SectionNotFound(section_id))
}

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;
