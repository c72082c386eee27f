//! Schema configuration errors

/// Problems found while compiling a schema.
///
/// Field-level variants cause only that field to be omitted from the tree.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The field's type tag is not one of the supported variants.
    #[error("invalid field type `{field_type}` for field `{name}`")]
    UnknownFieldType { name: String, field_type: String },

    /// The field has no type tag at all.
    #[error("missing field type for field `{name}`")]
    MissingFieldType { name: String },

    /// The field has no name to submit under.
    #[error("missing name for `{field_type}` field")]
    MissingName { field_type: String },

    /// The `filter` expression does not compile.
    #[error("invalid pattern `{pattern}` for field `{name}`: {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A field entry whose attributes have the wrong shape.
    #[error("malformed field #{position}: {reason}")]
    MalformedField { position: usize, reason: String },

    /// The `yearsDiff` override is not a year count a picker can span.
    #[error("invalid yearsDiff `{value}` for field `{name}`")]
    InvalidYearsDiff { name: String, value: String },

    /// The schema or configuration document is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}
