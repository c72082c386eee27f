use chrono::NaiveDate;
use log::warn;
use regex::Regex;

use super::bounds::{calendar_date, char_slice, parse_int, strip_separators};
use crate::error::ConfigurationError;
use crate::schema::{FieldDefinition, FieldKind};

/// Outcome of checking one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Required but empty. Clears any shown error without raising a new one;
    /// submission is blocked by the required-field scan instead.
    Missing,
    Invalid,
}

impl Verdict {
    pub fn is_invalid(self) -> bool {
        self == Self::Invalid
    }
}

/// Type-specific bound checks layered on top of the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Bounds {
    #[default]
    None,
    Numeric {
        min: Option<i64>,
        max: Option<i64>,
    },
    Time {
        min: Option<String>,
        max: Option<String>,
    },
    Date {
        min: Option<String>,
        max: Option<String>,
    },
}

/// Everything the validator checks for one field definition.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub pattern: Option<Regex>,
    pub required: bool,
    pub bounds: Bounds,
    /// Message shown while in error.
    pub message: Option<String>,
}

impl ValidationRule {
    /// Derive the rule for a field, or `None` when the field declares no
    /// checks. Date and time fields are always checked for well-formedness;
    /// hidden inputs and links never are.
    ///
    /// A pattern that fails to compile is logged and dropped; the rest of the
    /// rule still applies.
    pub fn derive(def: &FieldDefinition, kind: FieldKind) -> Option<Self> {
        let intrinsic = matches!(kind, FieldKind::Date | FieldKind::Time);
        if matches!(kind, FieldKind::Link | FieldKind::Hidden) || !(def.declares_rules() || intrinsic)
        {
            return None;
        }

        let pattern = def.filter.as_deref().and_then(|source| {
            Regex::new(&format!("^(?:{})$", source))
                .map_err(|source_err| ConfigurationError::InvalidPattern {
                    name: def.name().to_string(),
                    pattern: source.to_string(),
                    source: source_err,
                })
                .inspect_err(|e| warn!("{}; pattern ignored", e))
                .ok()
        });

        let bound = |value: Option<&str>| value.map(str::to_string);
        let bounds = match kind {
            k if k.is_numeric() => Bounds::Numeric {
                min: def.min().and_then(parse_int),
                max: def.max().and_then(parse_int),
            },
            FieldKind::Time => Bounds::Time {
                min: bound(def.min()),
                max: bound(def.max()),
            },
            FieldKind::Date => Bounds::Date {
                min: bound(def.min()),
                max: bound(def.max()),
            },
            _ => Bounds::None,
        };

        Some(Self {
            pattern,
            required: def.is_required(),
            bounds,
            message: def.error_message().map(str::to_string),
        })
    }

    /// Check a value against the rule.
    pub fn check(&self, value: &str) -> Verdict {
        if value.is_empty() {
            return if self.required {
                Verdict::Missing
            } else {
                Verdict::Valid
            };
        }
        if self.pattern.as_ref().is_some_and(|p| !p.is_match(value)) {
            return Verdict::Invalid;
        }
        if self.within_bounds(value) {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }

    fn within_bounds(&self, value: &str) -> bool {
        match &self.bounds {
            Bounds::None => true,
            Bounds::Numeric { min, max } => {
                let Some(n) = parse_int(value) else {
                    return true;
                };
                !max.is_some_and(|max| n > max) && !min.is_some_and(|min| n < min)
            }
            Bounds::Time { min, max } => {
                let hours = parse_int(&char_slice(value, 0, 2));
                let minutes = parse_int(&char_slice(value, 3, 5));
                if !matches!(hours, Some(0..=23)) || !matches!(minutes, Some(0..=59)) {
                    return false;
                }
                let flat = |text: &str| parse_int(&strip_separators(text));
                let Some(n) = flat(value) else {
                    return false;
                };
                let below = min.as_deref().and_then(flat).is_some_and(|min| n < min);
                let above = max.as_deref().and_then(flat).is_some_and(|max| n > max);
                !below && !above
            }
            Bounds::Date { min, max } => {
                let Some(date) = calendar_date(value) else {
                    return false;
                };
                let bound = |text: &Option<String>| {
                    text.as_deref()
                        .and_then(|t| NaiveDate::parse_from_str(t, "%Y-%m-%d").ok())
                };
                let below = bound(min).is_some_and(|min| date < min);
                let above = bound(max).is_some_and(|max| date > max);
                !below && !above
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Scalar;

    fn field(kind: &str) -> FieldDefinition {
        FieldDefinition {
            field_type: Some(kind.into()),
            name: Some("f".into()),
            ..Default::default()
        }
    }

    fn rule(def: &FieldDefinition) -> ValidationRule {
        ValidationRule::derive(def, def.kind().unwrap()).unwrap()
    }

    #[test]
    fn test_no_rules_no_validator() {
        assert!(ValidationRule::derive(&field("text"), FieldKind::Text).is_none());
        assert!(ValidationRule::derive(&field("date"), FieldKind::Date).is_some());
        let hidden = FieldDefinition {
            required: true.into(),
            ..field("hidden")
        };
        assert!(ValidationRule::derive(&hidden, FieldKind::Hidden).is_none());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let def = FieldDefinition {
            filter: Some("[0-9]+".into()),
            ..field("text")
        };
        let rule = rule(&def);
        assert_eq!(rule.check("123"), Verdict::Valid);
        assert_eq!(rule.check("12a"), Verdict::Invalid);
        assert_eq!(rule.check(""), Verdict::Valid);
    }

    #[test]
    fn test_invalid_pattern_is_dropped() {
        let def = FieldDefinition {
            filter: Some("([".into()),
            required: true.into(),
            ..field("text")
        };
        let rule = rule(&def);
        assert!(rule.pattern.is_none());
        assert_eq!(rule.check("anything"), Verdict::Valid);
        assert_eq!(rule.check(""), Verdict::Missing);
    }

    #[test]
    fn test_numeric_bounds() {
        let def = FieldDefinition {
            min: Some(Scalar::new("5")),
            max: Some(Scalar::new("10")),
            ..field("number")
        };
        let rule = rule(&def);
        assert_eq!(rule.check("4"), Verdict::Invalid);
        assert_eq!(rule.check("5"), Verdict::Valid);
        assert_eq!(rule.check("10"), Verdict::Valid);
        assert_eq!(rule.check("11"), Verdict::Invalid);
    }

    #[test]
    fn test_time_bounds() {
        let def = FieldDefinition {
            min: Some(Scalar::new("08:00")),
            max: Some(Scalar::new("17:30")),
            ..field("time")
        };
        let rule = rule(&def);
        assert_eq!(rule.check("25:00"), Verdict::Invalid);
        assert_eq!(rule.check("07:59"), Verdict::Invalid);
        assert_eq!(rule.check("12:00"), Verdict::Valid);
        assert_eq!(rule.check("17:31"), Verdict::Invalid);
    }

    #[test]
    fn test_date_max_compares_against_max() {
        let def = FieldDefinition {
            min: Some(Scalar::new("2020-01-01")),
            max: Some(Scalar::new("2020-12-31")),
            ..field("date")
        };
        let rule = rule(&def);
        assert_eq!(rule.check("2019-12-31"), Verdict::Invalid);
        assert_eq!(rule.check("2020-06-15"), Verdict::Valid);
        assert_eq!(rule.check("2021-01-01"), Verdict::Invalid);
        assert_eq!(rule.check("2020-02-30"), Verdict::Invalid);
    }
}
