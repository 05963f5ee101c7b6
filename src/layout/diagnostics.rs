use serde::Serialize;
use std::fmt;

/// A recoverable data problem met while laying out a chart.
///
/// None of these abort the computation. They are returned alongside the
/// layout and also logged at WARN level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    RootNotFound {
        person_id: String,
    },
    DuplicatePerson {
        person_id: String,
    },
    UnknownPerson {
        relationship_id: String,
        person_id: String,
    },
    SelfRelationship {
        relationship_id: String,
        person_id: String,
    },
    /// The parent index did not confirm the recorded direction of a
    /// parent_child relationship; the recorded order was used.
    ParentDirectionFallback {
        relationship_id: String,
        parent_id: String,
        child_id: String,
    },
    DroppedParentLink {
        relationship_id: String,
        parent_id: String,
        child_id: String,
        parent_generation: usize,
        child_generation: usize,
    },
    LaneCollision {
        family_id: String,
        lane: i64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RootNotFound { person_id } => {
                write!(f, "root person {person_id} is not in the people list")
            }
            Diagnostic::DuplicatePerson { person_id } => {
                write!(f, "person {person_id} appears more than once; first record kept")
            }
            Diagnostic::UnknownPerson {
                relationship_id,
                person_id,
            } => write!(
                f,
                "relationship {relationship_id} references unknown person {person_id}"
            ),
            Diagnostic::SelfRelationship {
                relationship_id,
                person_id,
            } => write!(
                f,
                "relationship {relationship_id} links person {person_id} to itself"
            ),
            Diagnostic::ParentDirectionFallback {
                relationship_id,
                parent_id,
                child_id,
            } => write!(
                f,
                "relationship {relationship_id}: parent index disagrees, using recorded order {parent_id} -> {child_id}"
            ),
            Diagnostic::DroppedParentLink {
                relationship_id,
                parent_id,
                child_id,
                parent_generation,
                child_generation,
            } => write!(
                f,
                "relationship {relationship_id}: dropped link {parent_id} (gen {parent_generation}) -> {child_id} (gen {child_generation})"
            ),
            Diagnostic::LaneCollision { family_id, lane } => {
                write!(f, "family {family_id} forced into occupied lane {lane}")
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(diagnostic = %diagnostic, "pedigree layout data inconsistency");
        self.items.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }
}
