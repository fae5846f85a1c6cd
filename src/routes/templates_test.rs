use super::*;
use crate::state::test_helpers::dummy_template;

#[test]
fn summary_carries_listing_fields() {
    let template = dummy_template();
    let summary = to_summary(&template);
    assert_eq!(summary.id, template.id);
    assert_eq!(summary.name, template.name);
    assert_eq!(summary.created_at, template.created_at);
    assert_eq!(summary.section_count, template.sections.len());
}

#[test]
fn summary_serializes_rfc3339_timestamp() {
    let template = dummy_template();
    let json = serde_json::to_value(to_summary(&template)).unwrap();
    let created_at = json.get("created_at").and_then(|v| v.as_str()).unwrap();
    assert!(created_at.contains('T'));
    assert!(time::OffsetDateTime::parse(created_at, &time::format_description::well_known::Rfc3339).is_ok());
}
