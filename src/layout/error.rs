use thiserror::Error;

/// Input the engine refuses to lay out.
///
/// Everything else is repaired and reported through [`super::Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("person {child} has {} recorded parents ({}); at most two are supported", parents.len(), parents.join(", "))]
    TooManyParents { child: String, parents: Vec<String> },
}
