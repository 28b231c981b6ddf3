//! Integrity errors reported by the opt-in validation checks.
//!
//! Mutations never return these. Callers run the checks before mutating
//! when they want to reject bad input.

use crate::person::PersonId;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Unknown person: {0}")]
    UnknownPerson(PersonId),

    #[error("National id {national_id} is already used by {existing}")]
    DuplicateNationalId {
        national_id: String,
        existing: PersonId,
    },

    #[error("Person {0} cannot be their own parent")]
    SelfParent(PersonId),

    #[error("Person {child} already has {count} parents")]
    TooManyParents { child: PersonId, count: usize },

    #[error("Person {parent} is already a parent of {child}")]
    DuplicateParent { child: PersonId, parent: PersonId },

    #[error("Person {id} died on {death}, not after birth on {birth}")]
    DeathBeforeBirth {
        id: PersonId,
        birth: NaiveDate,
        death: NaiveDate,
    },

    #[error("Person {0} is marked deceased without a death date")]
    MissingDeathDate(PersonId),

    #[error("Parent link {parent} -> {child} is not mirrored")]
    AsymmetricParentLink { child: PersonId, parent: PersonId },

    #[error("Spouse link {from} -> {to} is not mirrored")]
    AsymmetricSpouseLink { from: PersonId, to: PersonId },

    #[error("Person {from} references missing person {missing}")]
    DanglingReference { from: PersonId, missing: PersonId },
}

pub type Result<T> = std::result::Result<T, IntegrityError>;
