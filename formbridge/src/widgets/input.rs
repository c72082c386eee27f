//! Single-element text-like inputs.

/// The element type of a [`TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Password,
    Number,
    Tel,
    Email,
    Hidden,
    Date,
    Time,
    Textarea,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Email => "email",
            Self::Hidden => "hidden",
            Self::Date => "date",
            Self::Time => "time",
            Self::Textarea => "textarea",
        }
    }
}

/// Host-level hints carried alongside the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputAttrs {
    pub placeholder: Option<String>,
    pub maxlength: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub text_align: Option<String>,
}

/// A text input, textarea or native date/time control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub kind: InputKind,
    pub value: String,
    pub attrs: InputAttrs,
}

impl TextInput {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            value: String::new(),
            attrs: InputAttrs::default(),
        }
    }

    pub fn with_value(mut self, value: Option<&str>) -> Self {
        self.value = value.unwrap_or_default().to_string();
        self
    }

    pub fn with_attrs(mut self, attrs: InputAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A file chooser. Only the chosen file's name is tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    pub size_hint: Option<String>,
    pub chosen: Option<String>,
}

impl FileInput {
    pub fn new(size_hint: Option<&str>) -> Self {
        Self {
            size_hint: size_hint.map(str::to_string),
            chosen: None,
        }
    }

    /// Record the user's choice. There is no programmatic equivalent.
    pub fn choose(&mut self, file_name: impl Into<String>) {
        let file_name = file_name.into();
        self.chosen = (!file_name.is_empty()).then_some(file_name);
    }

    pub fn value(&self) -> &str {
        self.chosen.as_deref().unwrap_or_default()
    }
}
