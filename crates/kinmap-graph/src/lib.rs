//! Kinmap Graph - Family relationships and geographic analytics
//!
//! This crate manages the family relationship graph and everything derived
//! from it: the complete geodesic distance graph between members, and the
//! generation levels used to stratify the family into layers.
//!
//! # Architecture
//!
//! The [`FamilyTree`] owns every person and keeps parent/child and spouse
//! links mirrored on both sides. After any change to membership or
//! residences it builds a fresh [`DistanceGraph`] (a petgraph `DiGraph`
//! with one weighted edge per ordered pair of members) and swaps it in.
//! Generation levels are computed on demand by the [`GenerationAssigner`].
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use kinmap_core::{Coordinate, NameParts, Person};
//! use kinmap_graph::FamilyTree;
//!
//! let born = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
//! let mut tree = FamilyTree::new();
//! tree.add_person(Person::new(
//!     "p1",
//!     NameParts::new("Juan", "Pérez"),
//!     "123456789",
//!     born,
//!     Coordinate::new(9.9281, -84.0907),
//! ));
//! tree.add_person(Person::new(
//!     "p3",
//!     NameParts::new("Carlos", "Rodríguez"),
//!     "456789123",
//!     born,
//!     Coordinate::new(9.9936, -84.0083),
//! ));
//! tree.add_parent_relation("p3", "p1");
//!
//! let closest = tree.distance_graph().closest_pair().unwrap();
//! assert!(closest.distance_km > 10.0 && closest.distance_km < 30.0);
//! assert_eq!(tree.children("p1").len(), 1);
//! ```

mod builder;
mod distance;
mod generation;
mod relation;
mod tree;
mod validate;

pub use builder::FamilyTreeBuilder;
pub use distance::{DistanceGraph, DistanceNode, DistanceSummary, PersonPair};
pub use generation::{GenerationAssigner, GenerationConfig, Generations, UNCONNECTED_LEVEL};
pub use relation::{Relation, RelationKind};
pub use tree::FamilyTree;
pub use validate::MAX_PARENTS;
