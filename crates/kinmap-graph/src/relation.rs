//! Relationship triples.
//!
//! Relations are how people are linked from the outside: a loader hands
//! them to the builder, and [`FamilyTree::export_relations`] hands them back
//! so the caller can persist them.
//!
//! [`FamilyTree::export_relations`]: crate::FamilyTree::export_relations

use kinmap_core::PersonId;
use serde::{Deserialize, Serialize};

/// The type of relationship between two family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// `from` is a child of `to`.
    Parent,

    /// `from` and `to` are married. Symmetric.
    Spouse,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Parent => "parent",
            Self::Spouse => "spouse",
        };
        write!(f, "{}", s)
    }
}

/// A single relationship between two people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub from: PersonId,
    pub to: PersonId,
}

impl Relation {
    /// `child` has `parent` as one of its parents.
    pub fn parent(child: impl Into<PersonId>, parent: impl Into<PersonId>) -> Self {
        Self {
            kind: RelationKind::Parent,
            from: child.into(),
            to: parent.into(),
        }
    }

    /// `a` and `b` are spouses.
    pub fn spouse(a: impl Into<PersonId>, b: impl Into<PersonId>) -> Self {
        Self {
            kind: RelationKind::Spouse,
            from: a.into(),
            to: b.into(),
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.kind, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Relation::parent("kid", "mom").to_string(), "kid -[parent]-> mom");
        assert_eq!(RelationKind::Spouse.to_string(), "spouse");
    }

    #[test]
    fn test_serde_kind_is_snake_case() {
        let json = serde_json::to_string(&Relation::spouse("a", "b")).unwrap();
        assert_eq!(json, r#"{"kind":"spouse","from":"a","to":"b"}"#);
    }
}
