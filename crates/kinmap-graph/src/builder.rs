//! Builder for loading a whole family at once.
//!
//! The builder takes Person records and relationship triples from an
//! external loader and turns them into a consistent FamilyTree.

use crate::relation::Relation;
use crate::tree::FamilyTree;
use kinmap_core::Person;
use tracing::info;

/// Builds a FamilyTree from people and relations.
///
/// The builder handles the two-pass process:
/// 1. Add all people to the tree
/// 2. Resolve relations into links on both sides
///
/// Links already present on incoming Person records (`parent_ids` and
/// `spouse_ids`) are lifted into relations, so a previously exported
/// population can be fed straight back in. `children_ids` are derived from
/// parent links and are ignored on input.
#[derive(Debug, Default)]
pub struct FamilyTreeBuilder {
    people: Vec<Person>,
    relations: Vec<Relation>,
}

impl FamilyTreeBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one person.
    pub fn add_person(&mut self, person: Person) -> &mut Self {
        for parent_id in &person.parent_ids {
            self.relations
                .push(Relation::parent(person.id.clone(), parent_id.clone()));
        }
        for spouse_id in &person.spouse_ids {
            self.relations
                .push(Relation::spouse(person.id.clone(), spouse_id.clone()));
        }
        self.people.push(person);
        self
    }

    /// Queues people in order. Order is kept as member order in the tree.
    pub fn add_people(&mut self, people: impl IntoIterator<Item = Person>) -> &mut Self {
        for person in people {
            self.add_person(person);
        }
        self
    }

    pub fn add_relation(&mut self, relation: Relation) -> &mut Self {
        self.relations.push(relation);
        self
    }

    pub fn add_relations(&mut self, relations: impl IntoIterator<Item = Relation>) -> &mut Self {
        self.relations.extend(relations);
        self
    }

    /// Finishes building and returns the tree.
    ///
    /// Duplicate ids keep the first record. Relations naming unknown people
    /// are dropped, like any other relation call. The distance graph is
    /// built once at the end.
    pub fn build(self) -> FamilyTree {
        let mut tree = FamilyTree::new();

        let offered = self.people.len();
        for person in self.people {
            tree.insert_member(person);
        }

        let mut linked = 0usize;
        for relation in &self.relations {
            if tree.apply_relation(relation) {
                linked += 1;
            }
        }

        tree.refresh_distances();

        info!(
            members = tree.len(),
            duplicates = offered - tree.len(),
            relations = self.relations.len(),
            linked,
            "family tree loaded"
        );

        tree
    }
}
