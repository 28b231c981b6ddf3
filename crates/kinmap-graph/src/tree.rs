//! The family relationship graph.
//!
//! The FamilyTree owns every Person and is the only thing allowed to touch
//! their relationship sets. Every mutation leaves these invariants intact:
//!
//! - parent/child links are mirrored on both people
//! - spouse links are mirrored on both people
//! - no relationship set mentions a person who is not in the tree
//!
//! Unknown ids are never an error. Lookups return nothing and mutations do
//! nothing; callers are expected to pick ids from [`FamilyTree::members`].
//! Membership-level rules (unique national ids, at most two parents, no self
//! parenting, coherent dates) are not enforced here; see the checks in the
//! `validate` module.

use crate::distance::DistanceGraph;
use crate::relation::{Relation, RelationKind};
use chrono::NaiveDate;
use kinmap_core::{Person, PersonId};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// The family relationship graph.
///
/// Members are kept in insertion order. The derived [`DistanceGraph`] is
/// rebuilt immediately after any change to membership or residences.
#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    /// All members by id.
    pub(crate) members: HashMap<PersonId, Person>,

    /// Member ids in insertion order.
    order: Vec<PersonId>,

    /// Maps national ids to the members using them.
    national_id_index: HashMap<String, Vec<PersonId>>,

    /// Pairwise distances over the current members.
    distances: DistanceGraph,
}

impl FamilyTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a person to the tree.
    ///
    /// The person joins with empty relationship sets; links are made with
    /// [`add_parent_relation`](Self::add_parent_relation) and
    /// [`add_spouse_relation`](Self::add_spouse_relation). Returns `false`
    /// and leaves the tree untouched if the id is already present.
    pub fn add_person(&mut self, person: Person) -> bool {
        if !self.insert_member(person) {
            return false;
        }
        self.refresh_distances();
        true
    }

    /// Inserts without rebuilding the distance graph. Used for bulk loads.
    pub(crate) fn insert_member(&mut self, mut person: Person) -> bool {
        if self.members.contains_key(&person.id) {
            trace!(id = %person.id, "person already present, ignoring add");
            return false;
        }

        person.parent_ids.clear();
        person.spouse_ids.clear();
        person.children_ids.clear();

        let id = person.id.clone();
        debug!(id = %id, name = %person.full_name(), "adding person");

        self.national_id_index
            .entry(person.national_id.clone())
            .or_default()
            .push(id.clone());
        self.order.push(id.clone());
        self.members.insert(id, person);
        true
    }

    /// Replaces the stored data of an existing person.
    ///
    /// Vital data, name, residence and everything else is taken from
    /// `person`; the relationship sets stay as they are in the tree. Returns
    /// `false` if no person with that id exists.
    pub fn update_person(&mut self, mut person: Person) -> bool {
        let Some(existing) = self.members.get_mut(&person.id) else {
            trace!(id = %person.id, "unknown person, ignoring update");
            return false;
        };

        person.parent_ids = std::mem::take(&mut existing.parent_ids);
        person.spouse_ids = std::mem::take(&mut existing.spouse_ids);
        person.children_ids = std::mem::take(&mut existing.children_ids);

        let old_national_id = std::mem::replace(existing, person).national_id;
        let (id, new_national_id) = (existing.id.clone(), existing.national_id.clone());
        debug!(id = %id, "updating person");

        if old_national_id != new_national_id {
            self.unindex_national_id(&old_national_id, &id);
            self.national_id_index
                .entry(new_national_id)
                .or_default()
                .push(id);
        }

        self.refresh_distances();
        true
    }

    /// Removes a person and every reference to them.
    ///
    /// Parents lose the child, spouses lose the spouse and children lose
    /// the parent before the person is dropped. Returns the removed person.
    pub fn remove_person(&mut self, id: &str) -> Option<Person> {
        let Some(person) = self.members.remove(id) else {
            trace!(id, "unknown person, ignoring remove");
            return None;
        };

        for parent_id in &person.parent_ids {
            if let Some(parent) = self.members.get_mut(parent_id) {
                parent.children_ids.remove(id);
            }
        }
        for spouse_id in &person.spouse_ids {
            if let Some(spouse) = self.members.get_mut(spouse_id) {
                spouse.spouse_ids.remove(id);
            }
        }
        for child_id in &person.children_ids {
            if let Some(child) = self.members.get_mut(child_id) {
                child.parent_ids.remove(id);
            }
        }

        self.order.retain(|member| member.as_str() != id);
        self.unindex_national_id(&person.national_id, &person.id);

        debug!(
            id,
            parents = person.parent_ids.len(),
            spouses = person.spouse_ids.len(),
            children = person.children_ids.len(),
            "removed person"
        );

        self.refresh_distances();
        Some(person)
    }

    /// Records `parent_id` as a parent of `child_id`, on both people.
    ///
    /// Does nothing if either person is missing. Returns `true` if either
    /// side changed.
    pub fn add_parent_relation(&mut self, child_id: &str, parent_id: &str) -> bool {
        if !self.members.contains_key(child_id) || !self.members.contains_key(parent_id) {
            trace!(child_id, parent_id, "unknown person, ignoring parent relation");
            return false;
        }

        let mut changed = false;
        if let Some(child) = self.members.get_mut(child_id) {
            changed |= child.parent_ids.insert(PersonId::new(parent_id));
        }
        if let Some(parent) = self.members.get_mut(parent_id) {
            changed |= parent.children_ids.insert(PersonId::new(child_id));
        }

        if changed {
            debug!(child_id, parent_id, "added parent relation");
        }
        changed
    }

    /// Records `id1` and `id2` as spouses, on both people.
    ///
    /// Does nothing if either person is missing. Returns `true` if either
    /// side changed.
    pub fn add_spouse_relation(&mut self, id1: &str, id2: &str) -> bool {
        if !self.members.contains_key(id1) || !self.members.contains_key(id2) {
            trace!(id1, id2, "unknown person, ignoring spouse relation");
            return false;
        }

        let mut changed = false;
        if let Some(first) = self.members.get_mut(id1) {
            changed |= first.spouse_ids.insert(PersonId::new(id2));
        }
        if let Some(second) = self.members.get_mut(id2) {
            changed |= second.spouse_ids.insert(PersonId::new(id1));
        }

        if changed {
            debug!(id1, id2, "added spouse relation");
        }
        changed
    }

    /// Applies a relationship triple.
    pub fn apply_relation(&mut self, relation: &Relation) -> bool {
        match relation.kind {
            RelationKind::Parent => self.add_parent_relation(&relation.from, &relation.to),
            RelationKind::Spouse => self.add_spouse_relation(&relation.from, &relation.to),
        }
    }

    /// Marks a person as deceased. Does nothing for an unknown id.
    pub fn mark_deceased(&mut self, id: &str, date: NaiveDate) -> bool {
        match self.members.get_mut(id) {
            Some(person) => {
                person.mark_deceased(date);
                debug!(id, %date, "marked deceased");
                true
            }
            None => {
                trace!(id, "unknown person, ignoring mark deceased");
                false
            }
        }
    }

    /// Recomputes every member's age as of `today`.
    pub fn refresh_ages(&mut self, today: NaiveDate) {
        for person in self.members.values_mut() {
            person.refresh_age(today);
        }
    }

    /// Removes everyone and resets the distance graph.
    pub fn clear(&mut self) {
        debug!(members = self.members.len(), "clearing family tree");
        self.members.clear();
        self.order.clear();
        self.national_id_index.clear();
        self.distances = DistanceGraph::new();
    }

    /// Rebuilds the distance graph from the current members and swaps it in.
    pub(crate) fn refresh_distances(&mut self) {
        let distances = DistanceGraph::build(
            self.members()
                .into_iter()
                .map(|person| (person.id.clone(), person.coordinate)),
        );
        self.distances = distances;
    }

    fn unindex_national_id(&mut self, national_id: &str, id: &PersonId) {
        if let Some(ids) = self.national_id_index.get_mut(national_id) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                self.national_id_index.remove(national_id);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────

    /// Gets a person by id.
    pub fn get_person(&self, id: &str) -> Option<&Person> {
        self.members.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members in insertion order.
    pub fn members(&self) -> Vec<&Person> {
        self.order
            .iter()
            .filter_map(|id| self.members.get(id))
            .collect()
    }

    /// Members without any recorded parent.
    pub fn root_members(&self) -> Vec<&Person> {
        self.members()
            .into_iter()
            .filter(|person| !person.has_parents())
            .collect()
    }

    /// Members still alive.
    pub fn living_members(&self) -> Vec<&Person> {
        self.members()
            .into_iter()
            .filter(|person| person.is_alive)
            .collect()
    }

    /// Gets the parents of a person. Empty for an unknown id.
    pub fn parents(&self, id: &str) -> Vec<&Person> {
        self.resolve(id, |person| &person.parent_ids)
    }

    /// Gets the children of a person. Empty for an unknown id.
    pub fn children(&self, id: &str) -> Vec<&Person> {
        self.resolve(id, |person| &person.children_ids)
    }

    /// Gets the spouses of a person. Empty for an unknown id.
    pub fn spouses(&self, id: &str) -> Vec<&Person> {
        self.resolve(id, |person| &person.spouse_ids)
    }

    fn resolve<'a, F>(&'a self, id: &str, relatives: F) -> Vec<&'a Person>
    where
        F: Fn(&'a Person) -> &'a BTreeSet<PersonId>,
    {
        self.members
            .get(id)
            .map(|person| {
                relatives(person)
                    .iter()
                    .filter_map(|relative| self.members.get(relative))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds the first member, in insertion order, with a national id.
    pub fn find_by_national_id(&self, national_id: &str) -> Option<&Person> {
        self.national_id_index
            .get(national_id)?
            .iter()
            .find_map(|id| self.members.get(id))
    }

    /// Members whose full name contains the query, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Person> {
        let query_lower = query.to_lowercase();
        self.members()
            .into_iter()
            .filter(|person| person.full_name().to_lowercase().contains(&query_lower))
            .collect()
    }

    /// The pairwise distance graph over the current members.
    pub fn distance_graph(&self) -> &DistanceGraph {
        &self.distances
    }

    /// Every relationship as triples, for persistence.
    ///
    /// Each parent link appears once as `child -> parent`, each marriage
    /// once with the smaller id first. Order follows member insertion order.
    pub fn export_relations(&self) -> Vec<Relation> {
        let mut relations = Vec::new();
        for person in self.members() {
            for parent_id in &person.parent_ids {
                relations.push(Relation::parent(person.id.clone(), parent_id.clone()));
            }
            for spouse_id in &person.spouse_ids {
                if person.id <= *spouse_id {
                    relations.push(Relation::spouse(person.id.clone(), spouse_id.clone()));
                }
            }
        }
        relations
    }
}
