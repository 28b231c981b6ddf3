//! Generation levels.
//!
//! Every member gets an integer level: founders sit at 0, children one below
//! their deepest leveled parent, and spouses share the level of whoever
//! reached them first. Members with no path back to a founder get
//! [`UNCONNECTED_LEVEL`].
//!
//! Founder detection is a naming convention rather than a general rule. If
//! any parentless member's id contains the configured marker (`gen0` by
//! default), exactly those members are the founders. Otherwise the two
//! earliest-born parentless members are assumed to be the founding couple.
//!
//! With several disconnected founder components the result is not unique.

use crate::tree::FamilyTree;
use kinmap_core::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Level given to members not connected to any founder.
pub const UNCONNECTED_LEVEL: i32 = -1;

/// Configuration for the generation assigner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Substring of a founder id that marks it as an explicit level-0 seed.
    pub founder_marker: String,
    /// How many earliest-born parentless members to use when no id is marked.
    pub fallback_founders: usize,
    /// Upper bound on relaxation passes.
    pub max_passes: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            founder_marker: "gen0".into(),
            fallback_founders: 2,
            max_passes: 20,
        }
    }
}

/// Assigns generation levels to the members of a family tree.
#[derive(Debug, Clone, Default)]
pub struct GenerationAssigner {
    config: GenerationConfig,
}

impl GenerationAssigner {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Picks the members treated as level 0.
    pub fn founders<'a>(&self, tree: &'a FamilyTree) -> Vec<&'a Person> {
        let mut candidates = tree.root_members();

        let marker = self.config.founder_marker.as_str();
        if !marker.is_empty() {
            let explicit: Vec<&Person> = candidates
                .iter()
                .copied()
                .filter(|person| person.id.contains(marker))
                .collect();
            if !explicit.is_empty() {
                return explicit;
            }
        }

        // Stable: members born the same day keep insertion order.
        candidates.sort_by_key(|person| person.birth_date);
        candidates.truncate(self.config.fallback_founders);
        candidates
    }

    /// Labels every member of the tree with a generation level.
    pub fn assign(&self, tree: &FamilyTree) -> Generations {
        let members = tree.members();
        let mut levels: HashMap<PersonId, i32> = HashMap::with_capacity(members.len());
        if members.is_empty() {
            return Generations { levels };
        }

        for founder in self.founders(tree) {
            levels.insert(founder.id.clone(), 0);
            debug!(id = %founder.id, level = 0, "founder");
            Self::level_spouses(tree, founder, 0, &mut levels);
        }

        for pass in 0..self.config.max_passes {
            let mut changed = false;

            for person in &members {
                if levels.contains_key(&person.id) || !person.has_parents() {
                    continue;
                }

                let Some(deepest_parent) = person
                    .parent_ids
                    .iter()
                    .filter_map(|parent| levels.get(parent).copied())
                    .max()
                else {
                    continue;
                };

                let level = deepest_parent + 1;
                levels.insert(person.id.clone(), level);
                debug!(id = %person.id, level, "assigned generation level");
                Self::level_spouses(tree, person, level, &mut levels);
                changed = true;
            }

            if !changed {
                trace!(passes = pass + 1, "generation levels settled");
                break;
            }
        }

        for person in &members {
            levels.entry(person.id.clone()).or_insert_with(|| {
                debug!(id = %person.id, "not connected to any founder");
                UNCONNECTED_LEVEL
            });
        }

        Generations { levels }
    }

    /// Gives `level` to every spouse of `person` that has no level yet.
    fn level_spouses(
        tree: &FamilyTree,
        person: &Person,
        level: i32,
        levels: &mut HashMap<PersonId, i32>,
    ) {
        for spouse_id in &person.spouse_ids {
            if tree.contains(spouse_id) && !levels.contains_key(spouse_id) {
                levels.insert(spouse_id.clone(), level);
                debug!(id = %spouse_id, level, "assigned generation level to spouse");
            }
        }
    }
}

/// The generation level of every member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generations {
    levels: HashMap<PersonId, i32>,
}

impl Generations {
    /// The level of a member, if the member was present when assigned.
    pub fn level(&self, id: &str) -> Option<i32> {
        self.levels.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, i32)> {
        self.levels.iter().map(|(id, level)| (id, *level))
    }

    /// Member ids grouped by level, ascending. Ids within a level are sorted.
    pub fn layers(&self) -> BTreeMap<i32, Vec<PersonId>> {
        let mut layers: BTreeMap<i32, Vec<PersonId>> = BTreeMap::new();
        for (id, level) in &self.levels {
            layers.entry(*level).or_default().push(id.clone());
        }
        for ids in layers.values_mut() {
            ids.sort();
        }
        layers
    }

    /// Members not connected to any founder, sorted by id.
    pub fn unconnected(&self) -> Vec<PersonId> {
        self.layers()
            .remove(&UNCONNECTED_LEVEL)
            .unwrap_or_default()
    }

    /// Spouse-connected clusters within one level.
    ///
    /// Walks members of `level` in tree order and collects each one with
    /// every spouse reachable through spouses on the same level. These are
    /// the groups a tree view places side by side.
    pub fn family_groups(&self, level: i32, tree: &FamilyTree) -> Vec<Vec<PersonId>> {
        let mut groups = Vec::new();
        let mut processed: HashSet<&PersonId> = HashSet::new();

        for member in tree.members() {
            if self.level(&member.id) != Some(level) || processed.contains(&member.id) {
                continue;
            }

            let mut group = Vec::new();
            let mut queue = VecDeque::from([member]);
            while let Some(current) = queue.pop_front() {
                if !processed.insert(&current.id) {
                    continue;
                }
                group.push(current.id.clone());

                for spouse in tree.spouses(&current.id) {
                    if !processed.contains(&spouse.id) && self.level(&spouse.id) == Some(level) {
                        queue.push_back(spouse);
                    }
                }
            }
            groups.push(group);
        }

        groups
    }
}

impl FamilyTree {
    /// Assigns generation levels with the default configuration.
    pub fn generations(&self) -> Generations {
        GenerationAssigner::default().assign(self)
    }
}
