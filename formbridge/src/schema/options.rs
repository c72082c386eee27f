//! Pipe-delimited option lists.

/// One value/label pair of a select, radio group or phone type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Pair `a|b|c` values positionally with `A|B` labels.
///
/// Labels that run short fall back to the value itself. A missing value list
/// yields no choices.
pub fn pipe_choices(values: Option<&str>, labels: Option<&str>) -> Vec<Choice> {
    let Some(values) = values else {
        return Vec::new();
    };
    let labels: Vec<&str> = labels.map(|l| l.split('|').collect()).unwrap_or_default();
    values
        .split('|')
        .enumerate()
        .map(|(i, value)| {
            let label = labels.get(i).copied().unwrap_or(value);
            Choice::new(value, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_fall_back_to_values() {
        let choices = pipe_choices(Some("a|b|c"), Some("A|B"));
        assert_eq!(
            choices,
            vec![
                Choice::new("a", "A"),
                Choice::new("b", "B"),
                Choice::new("c", "c"),
            ]
        );
    }

    #[test]
    fn test_missing_values() {
        assert!(pipe_choices(None, Some("A")).is_empty());
        assert_eq!(pipe_choices(Some("x"), None), vec![Choice::new("x", "x")]);
    }
}
