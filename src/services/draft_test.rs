use super::*;
use crate::state::test_helpers;

#[tokio::test]
async fn create_draft_starts_blank() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let (draft_id, draft) = create_draft(&state, None).await.unwrap();
    assert!(draft.name.is_empty());
    assert!(draft.sections.is_empty());

    let drafts = state.drafts.read().await;
    assert!(drafts.contains_key(&draft_id));
}

#[tokio::test]
async fn create_draft_seeded_from_template() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let template = test_helpers::seed_template(&state).await;

    let (_, draft) = create_draft(&state, Some(template.id)).await.unwrap();
    assert_eq!(draft.name, template.name);
    assert_eq!(draft.sections.len(), template.sections.len());
    assert_eq!(
        draft.sections[0].fields.len(),
        template.sections[0].fields.len()
    );
}

#[tokio::test]
async fn create_draft_unknown_seed_fails() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let result = create_draft(&state, Some(Uuid::new_v4())).await;
    assert!(matches!(result.unwrap_err(), DraftError::TemplateNotFound(_)));
}

#[tokio::test]
async fn rename_and_fetch_draft() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;

    rename_draft(&state, draft_id, "Incident Report".into())
        .await
        .unwrap();
    let snapshot = draft(&state, draft_id).await.unwrap();
    assert_eq!(snapshot.name, "Incident Report");
}

#[tokio::test]
async fn fetch_unknown_draft_fails() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let result = draft(&state, Uuid::new_v4()).await;
    assert!(matches!(result.unwrap_err(), DraftError::DraftNotFound(_)));
}

#[tokio::test]
async fn discard_draft_is_idempotent() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;

    discard_draft(&state, draft_id).await;
    assert!(draft(&state, draft_id).await.is_err());
    // Second discard is a no-op.
    discard_draft(&state, draft_id).await;
}

#[tokio::test]
async fn add_section_appends_in_order() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;

    add_section(&state, draft_id, "Contact", None).await.unwrap();
    add_section(&state, draft_id, "Medical", Some(ColumnLayout { sm: 2, md: 2, lg: 4 }))
        .await
        .unwrap();

    let snapshot = draft(&state, draft_id).await.unwrap();
    assert_eq!(snapshot.sections.len(), 2);
    assert_eq!(snapshot.sections[0].name, "Contact");
    assert_eq!(snapshot.sections[0].columns, ColumnLayout::default());
    assert_eq!(snapshot.sections[1].name, "Medical");
    assert_eq!(snapshot.sections[1].columns, ColumnLayout { sm: 2, md: 2, lg: 4 });
}

#[tokio::test]
async fn add_section_rejects_blank_name() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let result = add_section(&state, draft_id, "   ", None).await;
    assert!(matches!(result.unwrap_err(), DraftError::SectionNameRequired));
}

#[tokio::test]
async fn add_section_clamps_columns() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Wide", Some(ColumnLayout { sm: 0, md: 3, lg: 12 }))
        .await
        .unwrap();
    assert_eq!(section.columns, ColumnLayout { sm: 1, md: 3, lg: 6 });
}

#[tokio::test]
async fn update_section_partial() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    let updated = update_section(&state, draft_id, section.id, Some("Contact Info".into()), None)
        .await
        .unwrap();
    assert_eq!(updated.name, "Contact Info");
    assert_eq!(updated.columns, section.columns);

    let updated = update_section(
        &state,
        draft_id,
        section.id,
        None,
        Some(ColumnLayout { sm: 1, md: 1, lg: 2 }),
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Contact Info");
    assert_eq!(updated.columns, ColumnLayout { sm: 1, md: 1, lg: 2 });
}

#[tokio::test]
async fn delete_section_removes_it() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    delete_section(&state, draft_id, section.id).await.unwrap();
    let snapshot = draft(&state, draft_id).await.unwrap();
    assert!(snapshot.sections.is_empty());

    let result = delete_section(&state, draft_id, section.id).await;
    assert!(matches!(result.unwrap_err(), DraftError::SectionNotFound(_)));
}

#[tokio::test]
async fn add_field_appends_blank_field() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    let field = add_field(&state, draft_id, section.id, FieldType::Input)
        .await
        .unwrap();
    assert_eq!(field.field_type, FieldType::Input);
    assert!(field.label.is_empty());
    assert!(!field.required);

    let snapshot = draft(&state, draft_id).await.unwrap();
    assert_eq!(snapshot.sections[0].fields.len(), 1);
    assert_eq!(snapshot.sections[0].fields[0].id, field.id);
}

#[tokio::test]
async fn add_field_unknown_section_fails() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let result = add_field(&state, draft_id, Uuid::new_v4(), FieldType::Input).await;
    assert!(matches!(result.unwrap_err(), DraftError::SectionNotFound(_)));
}

#[tokio::test]
async fn update_field_partial_fields() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();
    let field = add_field(&state, draft_id, section.id, FieldType::Input)
        .await
        .unwrap();

    let patch = FieldPatch { label: Some("Full Name".into()), ..FieldPatch::default() };
    let updated = update_field(&state, draft_id, section.id, field.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.label, "Full Name");
    assert!(updated.placeholder.is_empty()); // unchanged
    assert!(!updated.required); // unchanged

    let patch = FieldPatch { required: Some(true), ..FieldPatch::default() };
    let updated = update_field(&state, draft_id, section.id, field.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.label, "Full Name");
    assert!(updated.required);
}

#[tokio::test]
async fn update_field_options_trimmed_and_filtered() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();
    let field = add_field(&state, draft_id, section.id, FieldType::Select)
        .await
        .unwrap();

    let patch = FieldPatch {
        options: Some(vec!["  Nursing ".into(), String::new(), "Admin".into(), "   ".into()]),
        ..FieldPatch::default()
    };
    let updated = update_field(&state, draft_id, section.id, field.id, patch)
        .await
        .unwrap();
    assert_eq!(
        updated.options,
        vec![FieldOption::Plain("Nursing".into()), FieldOption::Plain("Admin".into())]
    );
}

#[tokio::test]
async fn update_field_options_ignored_for_non_choice_types() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    for field_type in [FieldType::Input, FieldType::Textarea, FieldType::ResidentDropdown] {
        let field = add_field(&state, draft_id, section.id, field_type).await.unwrap();
        let patch = FieldPatch { options: Some(vec!["A".into(), "B".into()]), ..FieldPatch::default() };
        let updated = update_field(&state, draft_id, section.id, field.id, patch)
            .await
            .unwrap();
        assert!(updated.options.is_empty());
    }
}

#[tokio::test]
async fn delete_field_removes_it() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();
    let field = add_field(&state, draft_id, section.id, FieldType::Input)
        .await
        .unwrap();

    delete_field(&state, draft_id, section.id, field.id).await.unwrap();
    let snapshot = draft(&state, draft_id).await.unwrap();
    assert!(snapshot.sections[0].fields.is_empty());

    let result = delete_field(&state, draft_id, section.id, field.id).await;
    assert!(matches!(result.unwrap_err(), DraftError::FieldNotFound(_)));
}

#[tokio::test]
async fn move_field_preserves_membership_and_length() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    let a = add_field(&state, draft_id, section.id, FieldType::Input).await.unwrap();
    let b = add_field(&state, draft_id, section.id, FieldType::Textarea).await.unwrap();
    let c = add_field(&state, draft_id, section.id, FieldType::Radio).await.unwrap();

    let order = move_field(&state, draft_id, section.id, a.id, 2).await.unwrap();
    let ids: Vec<Uuid> = order.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![b.id, c.id, a.id]);
    assert_eq!(order.len(), 3);

    let mut sorted_before = vec![a.id, b.id, c.id];
    let mut sorted_after = ids.clone();
    sorted_before.sort();
    sorted_after.sort();
    assert_eq!(sorted_before, sorted_after);
}

#[tokio::test]
async fn move_field_to_front() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    let a = add_field(&state, draft_id, section.id, FieldType::Input).await.unwrap();
    let b = add_field(&state, draft_id, section.id, FieldType::Textarea).await.unwrap();

    let order = move_field(&state, draft_id, section.id, b.id, 0).await.unwrap();
    let ids: Vec<Uuid> = order.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[tokio::test]
async fn move_field_clamps_out_of_range_index() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();

    let a = add_field(&state, draft_id, section.id, FieldType::Input).await.unwrap();
    let b = add_field(&state, draft_id, section.id, FieldType::Textarea).await.unwrap();

    let order = move_field(&state, draft_id, section.id, a.id, 99).await.unwrap();
    let ids: Vec<Uuid> = order.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[tokio::test]
async fn move_field_unknown_field_fails() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let section = add_section(&state, draft_id, "Contact", None).await.unwrap();
    let result = move_field(&state, draft_id, section.id, Uuid::new_v4(), 0).await;
    assert!(matches!(result.unwrap_err(), DraftError::FieldNotFound(_)));
}

#[tokio::test]
async fn save_draft_rejects_empty_name() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id =
        test_helpers::seed_draft_with_sections(&state, "", vec![test_helpers::dummy_section()]).await;
    let result = save_draft(&state, draft_id, None).await;
    assert!(matches!(result.unwrap_err(), DraftError::NameRequired));
    // Draft survives the failed save.
    assert!(draft(&state, draft_id).await.is_ok());
}

#[tokio::test]
async fn save_draft_rejects_no_sections() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id = test_helpers::seed_draft(&state).await;
    let result = save_draft(&state, draft_id, Some("Intake".into())).await;
    assert!(matches!(result.unwrap_err(), DraftError::NoSections));
}

#[tokio::test]
async fn save_draft_rejects_choice_field_without_options() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let mut section = test_helpers::dummy_section();
    section.fields.push(test_helpers::dummy_field(FieldType::Select, "Department"));
    let draft_id = test_helpers::seed_draft_with_sections(&state, "Intake", vec![section]).await;

    let result = save_draft(&state, draft_id, None).await;
    match result.unwrap_err() {
        DraftError::EmptyOptions { label } => assert_eq!(label, "Department"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn save_draft_allows_resident_dropdown_without_options() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let mut section = test_helpers::dummy_section();
    section
        .fields
        .push(test_helpers::dummy_field(FieldType::ResidentDropdown, "Resident"));
    let draft_id = test_helpers::seed_draft_with_sections(&state, "Intake", vec![section]).await;

    assert!(save_draft(&state, draft_id, None).await.is_ok());
}

#[tokio::test]
async fn save_draft_persists_and_drops_draft() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id =
        test_helpers::seed_draft_with_sections(&state, "Intake", vec![test_helpers::dummy_section()])
            .await;

    let template = save_draft(&state, draft_id, None).await.unwrap();
    assert_eq!(template.name, "Intake");
    assert_eq!(template.sections.len(), 1);

    // Draft is gone; template is in the store.
    assert!(draft(&state, draft_id).await.is_err());
    let stored = state.store.template(template.id).await.unwrap();
    assert_eq!(stored.name, "Intake");
}

#[tokio::test]
async fn save_draft_name_override_trims() {
    let (state, _dir) = test_helpers::test_app_state().await;
    let draft_id =
        test_helpers::seed_draft_with_sections(&state, "", vec![test_helpers::dummy_section()]).await;

    let template = save_draft(&state, draft_id, Some("  Intake  ".into())).await.unwrap();
    assert_eq!(template.name, "Intake");
}
