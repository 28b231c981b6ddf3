//! Opt-in integrity checks.
//!
//! The mutation operations never reject input. Callers that want to keep a
//! population clean run these checks first, or audit the whole tree after a
//! load with [`FamilyTree::check_integrity`].

use crate::tree::FamilyTree;
use kinmap_core::{IntegrityError, Person, PersonId, Result};
use std::collections::HashMap;

/// Most parents a person may have.
pub const MAX_PARENTS: usize = 2;

impl FamilyTree {
    /// Checks a person before [`add_person`](Self::add_person).
    ///
    /// Rejects national ids already used by someone else and incoherent
    /// vital dates.
    pub fn check_new_person(&self, person: &Person) -> Result<()> {
        if let Some(existing) = self.find_by_national_id(&person.national_id) {
            if existing.id != person.id {
                return Err(IntegrityError::DuplicateNationalId {
                    national_id: person.national_id.clone(),
                    existing: existing.id.clone(),
                });
            }
        }
        person.check_vital_dates()
    }

    /// Checks a parent link before
    /// [`add_parent_relation`](Self::add_parent_relation).
    pub fn check_parent_relation(&self, child_id: &str, parent_id: &str) -> Result<()> {
        let child = self
            .get_person(child_id)
            .ok_or_else(|| IntegrityError::UnknownPerson(PersonId::new(child_id)))?;
        if !self.contains(parent_id) {
            return Err(IntegrityError::UnknownPerson(PersonId::new(parent_id)));
        }

        if child_id == parent_id {
            return Err(IntegrityError::SelfParent(child.id.clone()));
        }
        if child.parent_ids.contains(parent_id) {
            return Err(IntegrityError::DuplicateParent {
                child: child.id.clone(),
                parent: PersonId::new(parent_id),
            });
        }
        if child.parent_ids.len() >= MAX_PARENTS {
            return Err(IntegrityError::TooManyParents {
                child: child.id.clone(),
                count: child.parent_ids.len(),
            });
        }
        Ok(())
    }

    /// Audits every member and returns all violations found, in member order.
    pub fn check_integrity(&self) -> Vec<IntegrityError> {
        let mut errors = Vec::new();
        let mut national_ids: HashMap<&str, &PersonId> = HashMap::new();

        for person in self.members() {
            if let Some(existing) = national_ids.insert(&person.national_id, &person.id) {
                errors.push(IntegrityError::DuplicateNationalId {
                    national_id: person.national_id.clone(),
                    existing: existing.clone(),
                });
                // Keep pointing at the first user.
                national_ids.insert(&person.national_id, existing);
            }

            if let Err(error) = person.check_vital_dates() {
                errors.push(error);
            }

            if person.parent_ids.contains(&person.id) {
                errors.push(IntegrityError::SelfParent(person.id.clone()));
            }
            if person.parent_ids.len() > MAX_PARENTS {
                errors.push(IntegrityError::TooManyParents {
                    child: person.id.clone(),
                    count: person.parent_ids.len(),
                });
            }

            self.audit_links(person, &mut errors);
        }

        errors
    }

    fn audit_links(&self, person: &Person, errors: &mut Vec<IntegrityError>) {
        let dangling = |missing: &PersonId| IntegrityError::DanglingReference {
            from: person.id.clone(),
            missing: missing.clone(),
        };

        for parent_id in &person.parent_ids {
            match self.get_person(parent_id) {
                None => errors.push(dangling(parent_id)),
                Some(parent) if !parent.children_ids.contains(&person.id) => {
                    errors.push(IntegrityError::AsymmetricParentLink {
                        child: person.id.clone(),
                        parent: parent_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for child_id in &person.children_ids {
            match self.get_person(child_id) {
                None => errors.push(dangling(child_id)),
                Some(child) if !child.parent_ids.contains(&person.id) => {
                    errors.push(IntegrityError::AsymmetricParentLink {
                        child: child_id.clone(),
                        parent: person.id.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for spouse_id in &person.spouse_ids {
            match self.get_person(spouse_id) {
                None => errors.push(dangling(spouse_id)),
                Some(spouse) if !spouse.spouse_ids.contains(&person.id) => {
                    errors.push(IntegrityError::AsymmetricSpouseLink {
                        from: person.id.clone(),
                        to: spouse_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }
}
