//! Complete geodesic distance graph.
//!
//! The DistanceGraph wraps a petgraph `DiGraph` with one node per family
//! member and one directed edge for every ordered pair of members, weighted
//! by the Haversine distance in kilometres. Weights are symmetric and stored
//! twice, once per direction.
//!
//! There is no incremental update path. The owning family tree builds a new
//! graph and swaps it in whenever membership or residences change, so a
//! reader never observes a half-built graph.
//!
//! Nodes are laid out in ascending id order, which makes every pair scan
//! deterministic: on ties, the pair that comes first lexicographically by
//! `(first id, second id)` wins.

use kinmap_core::{haversine_km, Coordinate, PersonId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A member as seen by the distance graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceNode {
    pub id: PersonId,
    pub coordinate: Coordinate,
}

/// Two members and the distance between them. `first` sorts before `second`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonPair {
    pub first: PersonId,
    pub second: PersonId,
    pub distance_km: f64,
}

/// The aggregate figures shown by a statistics view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceSummary {
    pub member_count: usize,
    pub farthest: Option<PersonPair>,
    pub closest: Option<PersonPair>,
    pub average_km: f64,
}

/// The complete weighted distance graph over all current members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceGraph {
    graph: DiGraph<DistanceNode, f64>,

    /// Maps person ids to graph node indexes.
    id_index: HashMap<PersonId, NodeIndex>,
}

impl DistanceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the complete graph for the given members.
    ///
    /// Duplicate ids keep their first coordinate.
    pub fn build<I>(members: I) -> Self
    where
        I: IntoIterator<Item = (PersonId, Coordinate)>,
    {
        let mut nodes: Vec<DistanceNode> = members
            .into_iter()
            .map(|(id, coordinate)| DistanceNode { id, coordinate })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes.dedup_by(|later, earlier| later.id == earlier.id);

        let n = nodes.len();
        let mut graph = DiGraph::with_capacity(n, n.saturating_mul(n.saturating_sub(1)));
        let mut id_index = HashMap::with_capacity(n);

        for node in nodes {
            let id = node.id.clone();
            let index = graph.add_node(node);
            id_index.insert(id, index);
        }

        // Edges are added source-major so edge order matches pair order.
        let indexes: Vec<NodeIndex> = graph.node_indices().collect();
        for &from in &indexes {
            for &to in &indexes {
                if from == to {
                    continue;
                }
                let weight = haversine_km(&graph[from].coordinate, &graph[to].coordinate);
                graph.add_edge(from, to, weight);
            }
        }

        debug!(
            members = graph.node_count(),
            edges = graph.edge_count(),
            "rebuilt distance graph"
        );

        Self { graph, id_index }
    }

    /// Replaces the whole graph with a freshly built one.
    pub fn rebuild<I>(&mut self, members: I)
    where
        I: IntoIterator<Item = (PersonId, Coordinate)>,
    {
        *self = Self::build(members);
    }

    /// Returns the number of members.
    pub fn member_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of directed edges, `n * (n - 1)`.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Iterates over all nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &DistanceNode> {
        self.graph.node_weights()
    }

    /// Distances from `id` to every other member. Empty if `id` is unknown.
    pub fn distances_from(&self, id: &str) -> HashMap<PersonId, f64> {
        let Some(&index) = self.id_index.get(id) else {
            return HashMap::new();
        };

        self.graph
            .edges(index)
            .map(|edge| (self.graph[edge.target()].id.clone(), *edge.weight()))
            .collect()
    }

    /// Distance between two members, if both are present and distinct.
    pub fn distance_between(&self, a: &str, b: &str) -> Option<f64> {
        let from = *self.id_index.get(a)?;
        let to = *self.id_index.get(b)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Iterates over each unordered pair once, in lexicographic pair order.
    fn unordered_pairs(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, f64)> + '_ {
        self.graph
            .edge_references()
            .filter(|edge| edge.source().index() < edge.target().index())
            .map(|edge| (edge.source(), edge.target(), *edge.weight()))
    }

    /// Scans all pairs, replacing the best one only when `better` says the
    /// candidate wins. With a strict comparison the earliest pair wins ties.
    fn select_pair(&self, better: impl Fn(f64, f64) -> bool) -> Option<PersonPair> {
        let mut pairs = self.unordered_pairs();
        let mut best = pairs.next()?;
        for candidate in pairs {
            if better(candidate.2, best.2) {
                best = candidate;
            }
        }

        let (first, second, distance_km) = best;
        Some(PersonPair {
            first: self.graph[first].id.clone(),
            second: self.graph[second].id.clone(),
            distance_km,
        })
    }

    /// The two members farthest apart. `None` with fewer than two members.
    pub fn farthest_pair(&self) -> Option<PersonPair> {
        self.select_pair(|candidate, best| candidate > best)
    }

    /// The two members closest together. `None` with fewer than two members.
    pub fn closest_pair(&self) -> Option<PersonPair> {
        self.select_pair(|candidate, best| candidate < best)
    }

    /// Mean distance over all unordered pairs. Zero with fewer than two members.
    pub fn average_distance(&self) -> f64 {
        let (total, count) = self
            .unordered_pairs()
            .fold((0.0, 0usize), |(total, count), (_, _, weight)| {
                (total + weight, count + 1)
            });

        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Computes every aggregate in one go.
    pub fn summary(&self) -> DistanceSummary {
        DistanceSummary {
            member_count: self.member_count(),
            farthest: self.farthest_pair(),
            closest: self.closest_pair(),
            average_km: self.average_distance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, lat: f64, lon: f64) -> (PersonId, Coordinate) {
        (PersonId::new(id), Coordinate::new(lat, lon))
    }

    #[test]
    fn test_empty_graph() {
        let graph = DistanceGraph::new();
        assert!(graph.is_empty());
        assert!(graph.farthest_pair().is_none());
        assert!(graph.closest_pair().is_none());
        assert_eq!(graph.average_distance(), 0.0);
        assert!(graph.distances_from("nobody").is_empty());
    }

    #[test]
    fn test_single_member() {
        let graph = DistanceGraph::build(vec![member("a", 9.9, -84.0)]);
        assert_eq!(graph.member_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.farthest_pair().is_none());
        assert!(graph.closest_pair().is_none());
        assert_eq!(graph.average_distance(), 0.0);
        assert!(graph.distances_from("a").is_empty());
    }

    #[test]
    fn test_complete_graph_edge_count() {
        let graph = DistanceGraph::build(vec![
            member("a", 0.0, 0.0),
            member("b", 1.0, 0.0),
            member("c", 2.0, 0.0),
            member("d", 3.0, 0.0),
        ]);
        assert_eq!(graph.edge_count(), 12);

        let from_a = graph.distances_from("a");
        assert_eq!(from_a.len(), 3);
        assert!(!from_a.contains_key("a"));
    }

    #[test]
    fn test_duplicate_ids_collapse() {
        let graph = DistanceGraph::build(vec![member("a", 0.0, 0.0), member("a", 5.0, 5.0)]);
        assert_eq!(graph.member_count(), 1);
    }

    #[test]
    fn test_distance_between() {
        let graph = DistanceGraph::build(vec![member("a", 0.0, 0.0), member("b", 0.0, 1.0)]);
        let ab = graph.distance_between("a", "b").unwrap();
        let ba = graph.distance_between("b", "a").unwrap();
        assert_eq!(ab, ba);
        assert!(graph.distance_between("a", "a").is_none());
        assert!(graph.distance_between("a", "zz").is_none());
    }

    #[test]
    fn test_closest_tie_resolves_by_id() {
        // Evenly spaced on the equator: a-b and b-c tie.
        let graph = DistanceGraph::build(vec![
            member("c", 0.0, 2.0),
            member("b", 0.0, 1.0),
            member("a", 0.0, 0.0),
        ]);

        let closest = graph.closest_pair().unwrap();
        assert_eq!(closest.first.as_str(), "a");
        assert_eq!(closest.second.as_str(), "b");
    }

    #[test]
    fn test_farthest_tie_resolves_by_id() {
        // b and c share a residence, so a-b and a-c tie.
        let graph = DistanceGraph::build(vec![
            member("c", 0.0, 10.0),
            member("b", 0.0, 10.0),
            member("a", 0.0, 0.0),
        ]);

        let farthest = graph.farthest_pair().unwrap();
        assert_eq!(farthest.first.as_str(), "a");
        assert_eq!(farthest.second.as_str(), "b");

        let closest = graph.closest_pair().unwrap();
        assert_eq!(closest.first.as_str(), "b");
        assert_eq!(closest.second.as_str(), "c");
        assert_eq!(closest.distance_km, 0.0);
    }

    #[test]
    fn test_coincident_members_still_form_a_pair() {
        let graph = DistanceGraph::build(vec![member("a", 5.0, 5.0), member("b", 5.0, 5.0)]);
        let farthest = graph.farthest_pair().unwrap();
        assert_eq!(farthest.distance_km, 0.0);
        assert_eq!(Some(farthest), graph.closest_pair());
    }

    #[test]
    fn test_rebuild_replaces_everything() {
        let mut graph = DistanceGraph::build(vec![member("a", 0.0, 0.0), member("b", 0.0, 1.0)]);
        graph.rebuild(vec![member("c", 0.0, 0.0)]);
        assert!(!graph.contains("a"));
        assert!(graph.contains("c"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_summary() {
        let graph = DistanceGraph::build(vec![
            member("a", 0.0, 0.0),
            member("b", 0.0, 1.0),
            member("c", 0.0, 3.0),
        ]);
        let summary = graph.summary();
        assert_eq!(summary.member_count, 3);
        assert_eq!(summary.farthest.unwrap().second.as_str(), "c");
        assert_eq!(summary.closest.unwrap().second.as_str(), "b");
        assert!(summary.average_km > 0.0);
    }
}
