//! Navigation-only links.

/// A clickable affordance that never submits and is never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    /// Tag sent to the host when the link is activated.
    pub event: Option<String>,
    /// Inline click script carried through for hosts that run one.
    pub onclick: Option<String>,
}
