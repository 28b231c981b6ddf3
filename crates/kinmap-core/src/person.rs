//! The family member entity.
//!
//! A Person carries identity, vital data, a residence and the ids of its
//! relatives. The relationship sets are only ever kept consistent by the
//! owning family tree; a lone Person does not know whether its ids resolve.

use crate::error::{IntegrityError, Result};
use crate::geo::Coordinate;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

/// Opaque, immutable identifier of a family member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for PersonId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PersonId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The parts of a person's name. Second name and second last name are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameParts {
    pub first: String,
    #[serde(default)]
    pub second: String,
    pub first_last: String,
    #[serde(default)]
    pub second_last: String,
}

impl NameParts {
    pub fn new(first: impl Into<String>, first_last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            first_last: first_last.into(),
            ..Self::default()
        }
    }

    /// Splits a whitespace-separated full name into at most four parts.
    ///
    /// Parts are assigned in order: first, second, first last, second last.
    /// Anything past the fourth word is appended to the second last name.
    pub fn parse(full_name: &str) -> Self {
        let mut words = full_name.split_whitespace();
        let mut next = || words.next().unwrap_or_default().to_string();
        let first = next();
        let second = next();
        let first_last = next();
        let mut second_last = next();
        for rest in full_name.split_whitespace().skip(4) {
            second_last.push(' ');
            second_last.push_str(rest);
        }
        Self {
            first,
            second,
            first_last,
            second_last,
        }
    }

    /// Joins the non-empty parts with single spaces.
    pub fn full_name(&self) -> String {
        [
            &self.first,
            &self.second,
            &self.first_last,
            &self.second_last,
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// A family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: NameParts,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub is_alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Age in whole years. Derived; refresh with [`Person::refresh_age`].
    #[serde(default)]
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub parent_ids: BTreeSet<PersonId>,
    #[serde(default)]
    pub spouse_ids: BTreeSet<PersonId>,
    #[serde(default)]
    pub children_ids: BTreeSet<PersonId>,
}

impl Person {
    /// Creates a living person with no relatives.
    pub fn new(
        id: impl Into<PersonId>,
        name: NameParts,
        national_id: impl Into<String>,
        birth_date: NaiveDate,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name,
            national_id: national_id.into(),
            birth_date,
            is_alive: true,
            death_date: None,
            age: 0,
            photo_ref: None,
            coordinate,
            address: String::new(),
            parent_ids: BTreeSet::new(),
            spouse_ids: BTreeSet::new(),
            children_ids: BTreeSet::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_photo(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    pub fn with_death_date(mut self, date: NaiveDate) -> Self {
        self.mark_deceased(date);
        self
    }

    pub fn full_name(&self) -> String {
        self.name.full_name()
    }

    /// Marks the person as deceased on the given date.
    pub fn mark_deceased(&mut self, date: NaiveDate) {
        self.is_alive = false;
        self.death_date = Some(date);
    }

    /// Whole years lived as of `reference`, or as of the death date when the
    /// person is deceased.
    pub fn age_on(&self, reference: NaiveDate) -> u32 {
        let reference = match (self.is_alive, self.death_date) {
            (false, Some(death)) => death,
            _ => reference,
        };

        let mut years = reference.year() - self.birth_date.year();
        if (reference.month(), reference.day()) < (self.birth_date.month(), self.birth_date.day())
        {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    /// Recomputes and stores [`Person::age`].
    pub fn refresh_age(&mut self, today: NaiveDate) {
        self.age = self.age_on(today);
    }

    pub fn has_parents(&self) -> bool {
        !self.parent_ids.is_empty()
    }

    /// Checks that the vital dates are coherent.
    ///
    /// A deceased person must carry a death date, and a death date must fall
    /// strictly after the birth date.
    pub fn check_vital_dates(&self) -> Result<()> {
        match self.death_date {
            Some(death) if death <= self.birth_date => Err(IntegrityError::DeathBeforeBirth {
                id: self.id.clone(),
                birth: self.birth_date,
                death,
            }),
            None if !self.is_alive => Err(IntegrityError::MissingDeathDate(self.id.clone())),
            _ => Ok(()),
        }
    }
}
