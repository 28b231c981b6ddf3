//! Distance statistics over real residences.

use chrono::NaiveDate;
use kinmap_core::{Coordinate, NameParts, Person};
use kinmap_graph::FamilyTree;
use proptest::prelude::*;

fn resident(id: &str, name: &str, lat: f64, lon: f64, address: &str) -> Person {
    Person::new(
        id,
        NameParts::parse(name),
        format!("NID-{id}"),
        NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
        Coordinate::new(lat, lon),
    )
    .with_address(address)
}

fn costa_rica() -> FamilyTree {
    let mut tree = FamilyTree::new();
    tree.add_person(resident("p1", "Juan Pérez", 9.9281, -84.0907, "San José"));
    tree.add_person(resident("p2", "María González", 10.6318, -85.4376, "Liberia"));
    tree.add_person(resident("p3", "Carlos Rodríguez", 9.9936, -84.0083, "Cartago"));
    tree
}

#[test]
fn test_costa_rica_scenario() {
    let tree = costa_rica();
    let graph = tree.distance_graph();

    let closest = graph.closest_pair().unwrap();
    assert_eq!((closest.first.as_str(), closest.second.as_str()), ("p1", "p3"));
    assert!(closest.distance_km > 10.0 && closest.distance_km < 30.0);

    // Liberia sits slightly farther from Cartago than from San José.
    let farthest = graph.farthest_pair().unwrap();
    assert_eq!((farthest.first.as_str(), farthest.second.as_str()), ("p2", "p3"));
    assert!(farthest.distance_km > 150.0 && farthest.distance_km < 200.0);

    let san_jose_liberia = graph.distance_between("p1", "p2").unwrap();
    assert!(san_jose_liberia > 150.0 && san_jose_liberia < farthest.distance_km);

    let average = graph.average_distance();
    assert!(closest.distance_km < average && average < farthest.distance_km);

    let expected = (closest.distance_km + farthest.distance_km + san_jose_liberia) / 3.0;
    assert!((average - expected).abs() < 1e-9);
}

#[test]
fn test_distances_from_one_member() {
    let tree = costa_rica();
    let from_san_jose = tree.distance_graph().distances_from("p1");

    assert_eq!(from_san_jose.len(), 2);
    assert!(from_san_jose["p3"] < from_san_jose["p2"]);
    assert!(tree.distance_graph().distances_from("nobody").is_empty());
}

#[test]
fn test_two_members_degenerate() {
    let mut tree = FamilyTree::new();
    tree.add_person(resident("a", "Ana Vargas", 9.9281, -84.0907, "San José"));
    tree.add_person(resident("b", "Beto Solís", 10.6318, -85.4376, "Liberia"));

    let graph = tree.distance_graph();
    let farthest = graph.farthest_pair().unwrap();
    assert_eq!(Some(farthest.clone()), graph.closest_pair());
    assert_eq!(graph.average_distance(), farthest.distance_km);
}

#[test]
fn test_too_few_members_for_statistics() {
    let mut tree = FamilyTree::new();
    let summary = tree.distance_graph().summary();
    assert_eq!(summary.member_count, 0);
    assert!(summary.farthest.is_none());
    assert_eq!(summary.average_km, 0.0);

    tree.add_person(resident("a", "Ana Vargas", 9.9281, -84.0907, "San José"));
    let summary = tree.distance_graph().summary();
    assert_eq!(summary.member_count, 1);
    assert!(summary.closest.is_none());
    assert_eq!(summary.average_km, 0.0);
}

#[test]
fn test_statistics_follow_removal() {
    let mut tree = costa_rica();
    tree.remove_person("p2");

    let graph = tree.distance_graph();
    assert_eq!(graph.member_count(), 2);
    let farthest = graph.farthest_pair().unwrap();
    assert_eq!((farthest.first.as_str(), farthest.second.as_str()), ("p1", "p3"));
}

fn arb_residents() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 2..12)
}

fn tree_from(coordinates: &[(f64, f64)]) -> FamilyTree {
    let mut tree = FamilyTree::new();
    for (i, (lat, lon)) in coordinates.iter().enumerate() {
        tree.add_person(resident(&format!("m{i:02}"), "Some One", *lat, *lon, ""));
    }
    tree
}

proptest! {
    #[test]
    fn closest_average_farthest_are_ordered(coordinates in arb_residents()) {
        let tree = tree_from(&coordinates);
        let graph = tree.distance_graph();

        let closest = graph.closest_pair().unwrap().distance_km;
        let farthest = graph.farthest_pair().unwrap().distance_km;
        let average = graph.average_distance();

        prop_assert!(closest <= average + 1e-9);
        prop_assert!(average <= farthest + 1e-9);
    }

    #[test]
    fn pairwise_distances_are_symmetric(coordinates in arb_residents()) {
        let tree = tree_from(&coordinates);
        let graph = tree.distance_graph();

        for a in tree.members() {
            for (b, distance) in graph.distances_from(&a.id) {
                let back = graph.distances_from(&b)[&a.id];
                prop_assert!((distance - back).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn complete_graph_has_every_ordered_pair(coordinates in arb_residents()) {
        let tree = tree_from(&coordinates);
        let n = coordinates.len();
        prop_assert_eq!(tree.distance_graph().edge_count(), n * (n - 1));
    }
}
