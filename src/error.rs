use thiserror::Error;

use crate::{handle::PosetHandle, poset::ElementId};

/// Reasons a poset operation is refused.
///
/// None of these are fatal: the registry turns them into `false`/`0` results
/// and a diagnostic trace, and the poset is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PosetError {
    /// The handle is out of range or its slot is empty.
    #[error("poset {0} does not exist")]
    HandleNotFound(PosetHandle),

    /// A required element name was empty.
    #[error("invalid value (empty name)")]
    InvalidArgument,

    /// The named element is not in the poset.
    #[error("element \"{0}\" does not exist")]
    NameNotFound(String),

    /// The name is already taken within the poset.
    #[error("element \"{0}\" already exists")]
    DuplicateName(String),

    /// The pair is already ordered one way or the other.
    #[error("relation (\"{lesser}\", \"{greater}\") cannot be added: elements are already comparable")]
    AlreadyComparable { lesser: String, greater: String },

    /// `lesser <= greater` does not hold, so there is nothing to delete.
    #[error("relation (\"{lesser}\", \"{greater}\") cannot be deleted: elements are not related")]
    NotRelated { lesser: String, greater: String },

    /// The pair is related through some intermediate element, or is reflexive.
    #[error("relation (\"{lesser}\", \"{greater}\") cannot be deleted: not a covering pair")]
    NotCoveringRelation { lesser: String, greater: String },
}

/// A broken partial order invariant, reported by
/// [`Poset::check_invariants`](crate::Poset::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("element {0} is not related to itself")]
    Reflexivity(ElementId),

    #[error("elements {0} and {1} are ordered both ways")]
    Antisymmetry(ElementId, ElementId),

    #[error("{0} <= {1} <= {2} but not {0} <= {2}")]
    Transitivity(ElementId, ElementId, ElementId),

    #[error("element {0} lies on a cycle")]
    Cycle(ElementId),

    #[error("element {0} is in the relation but has no name")]
    Dangling(ElementId),

    #[error("element {0} is named more than once")]
    SharedId(ElementId),
}
