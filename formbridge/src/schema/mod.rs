//! Declarative form schema.
//!
//! The schema is the JSON document a host hands to the engine. It is parsed
//! once into [`FormDefinition`] and never mutated afterwards; repeatable
//! fields share their [`FieldDefinition`] through an `Arc`.
//!
//! Most attributes are deliberately lenient: hosts send numbers as strings,
//! flags as `"true"` or `1`, and so on. See [`Flag`] and [`Scalar`].

mod flags;
mod options;

pub use flags::{Flag, Scalar};
pub use options::{Choice, pipe_choices};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ConfigurationError;

/// Marker suffix for repeatable field names.
pub const REPEAT_SUFFIX: &str = "[]";

/// Widest year span a composite date picker accepts on either side.
pub const MAX_YEARS_DIFF: u32 = 1000;

/// A complete form schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormDefinition {
    /// Form identity (overridden by the host's `formId` parameter).
    pub id: Option<String>,
    /// Post action URI for the native submission fallback.
    pub action: Option<String>,
    /// Hidden name/value pairs, `k=v&k=v`.
    pub params: Option<String>,
    /// Sections and the optional submit label.
    pub fields: Option<FieldsBlock>,
}

impl FormDefinition {
    /// Parse a schema from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Hidden name/value pairs from `params`, in declaration order.
    ///
    /// Pairs without `=` become a name with an empty value.
    pub fn hidden_params(&self) -> Vec<(String, String)> {
        let Some(params) = self.params.as_deref() else {
            return Vec::new();
        };
        params
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    }

    /// Declared sections (empty when the schema has none).
    pub fn sections(&self) -> &[SectionDefinition] {
        self.fields
            .as_ref()
            .map(|block| block.sections.as_slice())
            .unwrap_or_default()
    }

    /// Submit label, if the schema asks for a submit affordance.
    pub fn submit_label(&self) -> Option<&str> {
        self.fields.as_ref().and_then(|block| block.submit.as_deref())
    }
}

/// The `fields` block of a schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldsBlock {
    pub submit: Option<String>,
    pub sections: Vec<SectionDefinition>,
}

/// An ordered group of fields with an optional title.
///
/// Field entries are parsed one at a time; an entry that does not fit
/// [`FieldDefinition`] lands in `rejected` instead of failing the schema.
#[derive(Debug, Clone, Default)]
pub struct SectionDefinition {
    pub title: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub rejected: Vec<RejectedField>,
}

/// A field entry that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedField {
    /// Index of the entry within its section.
    pub position: usize,
    pub reason: String,
}

impl RejectedField {
    pub fn to_error(&self) -> ConfigurationError {
        ConfigurationError::MalformedField {
            position: self.position,
            reason: self.reason.clone(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawSection {
    title: Option<String>,
    fields: Vec<Value>,
}

impl<'de> Deserialize<'de> for SectionDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSection::deserialize(deserializer)?;
        let mut section = Self {
            title: raw.title,
            ..Default::default()
        };
        for (position, entry) in raw.fields.into_iter().enumerate() {
            match serde_json::from_value::<FieldDefinition>(entry) {
                Ok(field) => section.fields.push(field),
                Err(e) => section.rejected.push(RejectedField {
                    position,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(section)
    }
}

impl SectionDefinition {
    /// A section holding a single name-only field carries metadata, not
    /// controls, and is rendered without a grouping wrapper.
    pub fn is_metadata_only(&self) -> bool {
        matches!(
            self.fields.as_slice(),
            [only] if matches!(only.kind(), Ok(FieldKind::NameOnly))
        )
    }
}

/// Closed set of field variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Password,
    Number,
    Tel,
    Email,
    Hidden,
    Date,
    Time,
    File,
    Textarea,
    Range,
    Select,
    Radio,
    Checkbox,
    PhoneItem,
    Link,
    /// Metadata-only marker; never rendered.
    NameOnly,
}

impl FieldKind {
    /// Map a schema type tag to a variant.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "text" => Self::Text,
            "password" => Self::Password,
            "number" => Self::Number,
            "tel" => Self::Tel,
            "email" => Self::Email,
            "hidden" => Self::Hidden,
            "date" => Self::Date,
            "time" => Self::Time,
            "file" => Self::File,
            "textarea" => Self::Textarea,
            "range" => Self::Range,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "phoneitem" | "phone-item" => Self::PhoneItem,
            "link" => Self::Link,
            "name" => Self::NameOnly,
            _ => return None,
        };
        Some(kind)
    }

    /// The schema type tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Email => "email",
            Self::Hidden => "hidden",
            Self::Date => "date",
            Self::Time => "time",
            Self::File => "file",
            Self::Textarea => "textarea",
            Self::Range => "range",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::PhoneItem => "phoneitem",
            Self::Link => "link",
            Self::NameOnly => "name",
        }
    }

    /// Variants that carry the numeric bound check.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }
}

/// Declarative description of one form control.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub name: Option<Scalar>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub required: Flag,
    /// Regular expression source the whole value must match.
    pub filter: Option<String>,
    /// Message shown while the field is in error.
    pub error: Option<String>,
    pub max: Option<Scalar>,
    pub min: Option<Scalar>,
    pub maxlength: Option<Scalar>,
    pub placeholder: Option<String>,
    pub value: Option<Scalar>,
    pub widthpercent: Option<Scalar>,
    pub optionvalues: Option<String>,
    pub optionlabels: Option<String>,
    pub dateformat: Option<String>,
    #[serde(rename = "yearsDiff")]
    pub years_diff: Option<Scalar>,
    pub step: Option<Scalar>,
    /// Initial checkbox state; only `true` and `"true"` check the box.
    pub checked: Option<Value>,
    pub nametype: Option<String>,
    pub namephone: Option<String>,
    pub phonetypevalues: Option<String>,
    pub phonetypelabels: Option<String>,
    pub onclick: Option<String>,
    pub event: Option<String>,
    pub textalign: Option<String>,
}

impl FieldDefinition {
    /// Resolve the variant, failing on a missing or unrecognized tag.
    pub fn kind(&self) -> Result<FieldKind, ConfigurationError> {
        let Some(tag) = self.field_type.as_deref() else {
            return Err(ConfigurationError::MissingFieldType {
                name: self.name().to_string(),
            });
        };
        FieldKind::from_tag(tag).ok_or_else(|| ConfigurationError::UnknownFieldType {
            name: self.name().to_string(),
            field_type: tag.to_string(),
        })
    }

    /// Submission key (empty when absent).
    pub fn name(&self) -> &str {
        self.name.as_ref().map(Scalar::as_str).unwrap_or_default()
    }

    /// Name without the repeat marker.
    pub fn base_name(&self) -> &str {
        let name = self.name();
        name.strip_suffix(REPEAT_SUFFIX).unwrap_or(name)
    }

    /// True when the name ends with the open-ended list marker.
    pub fn is_repeatable(&self) -> bool {
        let name = self.name();
        name.len() > REPEAT_SUFFIX.len() && name.ends_with(REPEAT_SUFFIX)
    }

    pub fn is_required(&self) -> bool {
        self.required.is_set()
    }

    pub fn min(&self) -> Option<&str> {
        Scalar::present(&self.min)
    }

    pub fn max(&self) -> Option<&str> {
        Scalar::present(&self.max)
    }

    pub fn value(&self) -> Option<&str> {
        Scalar::present(&self.value)
    }

    pub fn maxlength(&self) -> Option<&str> {
        Scalar::present(&self.maxlength)
    }

    pub fn step(&self) -> Option<&str> {
        Scalar::present(&self.step)
    }

    pub fn is_checked(&self) -> bool {
        match &self.checked {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    /// Per-field year span override for composite date pickers.
    ///
    /// Fails when the override is not an integer within
    /// [`MAX_YEARS_DIFF`] of zero.
    pub fn years_diff(&self) -> Result<Option<i32>, ConfigurationError> {
        let Some(text) = Scalar::present(&self.years_diff) else {
            return Ok(None);
        };
        match text.trim().parse::<i32>() {
            Ok(diff) if diff.unsigned_abs() <= MAX_YEARS_DIFF => Ok(Some(diff)),
            _ => Err(ConfigurationError::InvalidYearsDiff {
                name: self.name().to_string(),
                value: text.to_string(),
            }),
        }
    }

    /// Error message, if a non-empty one is configured.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.is_empty())
    }

    /// True when the field declares any rule the validator can check.
    pub fn declares_rules(&self) -> bool {
        self.filter.is_some() || self.is_required() || self.min().is_some() || self.max().is_some()
    }

    pub fn choices(&self) -> Vec<Choice> {
        pipe_choices(self.optionvalues.as_deref(), self.optionlabels.as_deref())
    }

    pub fn phone_type_choices(&self) -> Vec<Choice> {
        pipe_choices(
            self.phonetypevalues.as_deref(),
            self.phonetypelabels.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_params_split() {
        let def = FormDefinition {
            params: Some("token=abc&mode=edit&flag".into()),
            ..Default::default()
        };
        assert_eq!(
            def.hidden_params(),
            vec![
                ("token".to_string(), "abc".to_string()),
                ("mode".to_string(), "edit".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_repeatable_marker_must_be_suffix() {
        let field = |name: &str| FieldDefinition {
            name: Some(name.into()),
            ..Default::default()
        };
        assert!(field("emails[]").is_repeatable());
        assert!(!field("emails[]x").is_repeatable());
        assert!(!field("[]").is_repeatable());
        assert_eq!(field("emails[]").base_name(), "emails");
    }

    #[test]
    fn test_kind_errors() {
        let missing = FieldDefinition::default();
        assert!(matches!(
            missing.kind(),
            Err(ConfigurationError::MissingFieldType { .. })
        ));

        let unknown = FieldDefinition {
            field_type: Some("color".into()),
            name: Some("shade".into()),
            ..Default::default()
        };
        assert!(matches!(
            unknown.kind(),
            Err(ConfigurationError::UnknownFieldType { .. })
        ));
    }

    #[test]
    fn test_years_diff_bounds() {
        let field = |diff: &str| FieldDefinition {
            name: Some("born".into()),
            years_diff: Some(diff.into()),
            ..Default::default()
        };
        assert_eq!(field("5").years_diff().unwrap(), Some(5));
        assert_eq!(field("-1000").years_diff().unwrap(), Some(-1000));
        assert_eq!(FieldDefinition::default().years_diff().unwrap(), None);
        for bad in ["1001", "2147483647", "-2147483648", "99999999999", "ten"] {
            assert!(matches!(
                field(bad).years_diff(),
                Err(ConfigurationError::InvalidYearsDiff { .. })
            ));
        }
    }

    #[test]
    fn test_malformed_entry_is_rejected_alone() {
        let section: SectionDefinition = serde_json::from_value(serde_json::json!({
            "title": "Contact",
            "fields": [
                {"type": "text", "name": 7},
                {"type": "number", "name": "age", "max": [1]},
                {"type": "text", "name": "city"}
            ]
        }))
        .unwrap();
        let names: Vec<_> = section.fields.iter().map(FieldDefinition::name).collect();
        assert_eq!(names, vec!["7", "city"]);
        assert_eq!(section.rejected.len(), 1);
        assert_eq!(section.rejected[0].position, 1);
        assert!(matches!(
            section.rejected[0].to_error(),
            ConfigurationError::MalformedField { position: 1, .. }
        ));
    }

    #[test]
    fn test_checked_accepts_only_true_forms() {
        let field = |checked: Value| FieldDefinition {
            checked: Some(checked),
            ..Default::default()
        };
        assert!(field(Value::Bool(true)).is_checked());
        assert!(field(Value::String("true".into())).is_checked());
        assert!(!field(serde_json::json!(1)).is_checked());
        assert!(!field(Value::String("1".into())).is_checked());
        assert!(!FieldDefinition::default().is_checked());
    }
}
