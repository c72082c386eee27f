//! Tests for schema parsing.

use formbridge::schema::{Choice, FieldKind, FormDefinition};
use formbridge::ConfigurationError;
use serde_json::json;

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_full_schema() {
    let definition = FormDefinition::from_value(json!({
        "id": "contact",
        "action": "https://example.com/post",
        "params": "token=abc&mode=edit",
        "fields": {
            "submit": "Send",
            "sections": [
                {
                    "title": "You",
                    "fields": [
                        {"type": "text", "name": "name", "required": "true", "maxlength": 40},
                        {"type": "number", "name": "age", "min": 18, "max": "99"},
                        {"type": "select", "name": "color", "optionvalues": "r|g|b", "optionlabels": "Red|Green"}
                    ]
                }
            ]
        }
    }))
    .unwrap();

    assert_eq!(definition.id.as_deref(), Some("contact"));
    assert_eq!(definition.submit_label(), Some("Send"));
    assert_eq!(definition.hidden_params().len(), 2);

    let fields = &definition.sections()[0].fields;
    assert!(fields[0].is_required());
    assert_eq!(fields[0].maxlength(), Some("40"));
    assert_eq!(fields[1].kind().unwrap(), FieldKind::Number);
    assert_eq!(fields[1].min(), Some("18"));
    assert_eq!(fields[1].max(), Some("99"));
    assert_eq!(
        fields[2].choices(),
        vec![
            Choice::new("r", "Red"),
            Choice::new("g", "Green"),
            Choice::new("b", "b"),
        ]
    );
}

#[test]
fn test_schema_without_fields() {
    let definition = FormDefinition::from_json(r#"{"id": "empty"}"#).unwrap();
    assert!(definition.sections().is_empty());
    assert_eq!(definition.submit_label(), None);
    assert!(definition.hidden_params().is_empty());
}

#[test]
fn test_malformed_schema_is_configuration_error() {
    let result = FormDefinition::from_json(r#"{"fields": {"sections": "nope"}}"#);
    assert!(matches!(result, Err(ConfigurationError::InvalidSchema(_))));
}

#[test]
fn test_required_accepts_loose_forms() {
    let definition = FormDefinition::from_value(json!({
        "fields": {"sections": [{"fields": [
            {"type": "text", "name": "a", "required": true},
            {"type": "text", "name": "b", "required": 1},
            {"type": "text", "name": "c", "required": "false"}
        ]}]}
    }))
    .unwrap();
    let fields = &definition.sections()[0].fields;
    assert!(fields[0].is_required());
    assert!(fields[1].is_required());
    assert!(!fields[2].is_required());
}

// =============================================================================
// Field kinds
// =============================================================================

#[test]
fn test_field_kind_tags() {
    for tag in [
        "text", "password", "number", "tel", "email", "hidden", "date", "time", "file",
        "textarea", "range", "select", "radio", "checkbox", "phoneitem", "link", "name",
    ] {
        let kind = FieldKind::from_tag(tag).unwrap();
        assert_eq!(kind.tag(), tag);
    }
    assert_eq!(FieldKind::from_tag("phone-item"), Some(FieldKind::PhoneItem));
    assert_eq!(FieldKind::from_tag("color"), None);
}

#[test]
fn test_metadata_only_section() {
    let definition = FormDefinition::from_value(json!({
        "fields": {"sections": [
            {"fields": [{"type": "name", "name": "meta"}]},
            {"fields": [{"type": "text", "name": "a"}]}
        ]}
    }))
    .unwrap();
    assert!(definition.sections()[0].is_metadata_only());
    assert!(!definition.sections()[1].is_metadata_only());
}

#[test]
fn test_years_diff_override() {
    let definition = FormDefinition::from_value(json!({
        "fields": {"sections": [{"fields": [
            {"type": "date", "name": "d", "yearsDiff": "5", "dateformat": "mm/dd/yyyy"}
        ]}]}
    }))
    .unwrap();
    let field = &definition.sections()[0].fields[0];
    assert_eq!(field.years_diff().unwrap(), Some(5));
    assert_eq!(field.dateformat.as_deref(), Some("mm/dd/yyyy"));
}
