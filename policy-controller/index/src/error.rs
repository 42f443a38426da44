/// Errors surfaced by model mutations.
///
/// Flow checks never raise: evaluation over a structurally valid index always
/// yields a verdict.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The entity is malformed or incomplete.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The identifying key already exists.
    #[error("{kind} {key} already exists")]
    Conflict { kind: &'static str, key: String },

    /// The operation referenced an absent key.
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    /// A delete was blocked by live dependents.
    #[error("{kind} {key} has dependents: {dependents:?}")]
    Dependency {
        kind: &'static str,
        key: String,
        dependents: Vec<String>,
    },

    /// A rule populated more than one selector class on a direction side.
    #[error("rule {0} selector is ambiguous")]
    AmbiguousSelector(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn conflict(kind: &'static str, key: impl ToString) -> Self {
        Self::Conflict {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}
