//! Known-topology regression tests for HITS scoring.
//!
//! Each test uses a hand-crafted graph. Expected vectors were computed
//! independently and are hardcoded, so any change to the update order or
//! normalization that shifts the fixed point is caught.

use std::thread;

use nalgebra::{DMatrix, DVector};

use hubrank_core::matrix::{from_edges, from_graph, from_rows, sample_graph};
use hubrank_core::{HitsConfig, HitsError, ScoreVector, UpdateRule, compute_scores, hits};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NORM_EPS: f64 = 1e-9;
const VALUE_EPS: f64 = 1e-5;

fn assert_vec_close(label: &str, actual: &DVector<f64>, expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "{label}: length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() < tol,
            "{label}[{i}]: got {a}, expected {e} (tol {tol})"
        );
    }
}

fn assert_unit(label: &str, v: &DVector<f64>) {
    assert!(
        (v.norm() - 1.0).abs() < NORM_EPS,
        "{label} should have unit L2 norm, got {}",
        v.norm()
    );
}

fn run(a: &DMatrix<f64>, iterations: usize) -> hubrank_core::HitsResult {
    hits(a, &HitsConfig::with_iterations(iterations)).expect("graph should not degenerate")
}

// ===========================================================================
// Topology 1: six-node reference graph
//
//   0 → {1, 4}   1 → {5}   2 → {5}   3 → {2, 5}   4 → {3}   5 → {0, 1, 2, 4}
//
// Node 5 has the highest out-degree (4) and ends up the top hub. Nodes 1
// and 4 have identical in-neighbourhoods, as do hubs 1 and 2.
// ===========================================================================

const SAMPLE_AUTHORITIES: [f64; 6] = [0.352_579, 0.554_671, 0.473_486, 0.0, 0.554_671, 0.190_209];
const SAMPLE_HUBS: [f64; 6] = [0.473_486, 0.081_185, 0.081_185, 0.283_277, 0.0, 0.826_065];

#[test]
fn sample_graph_reference_run() {
    let (auth, hub) = compute_scores(&sample_graph(), 10_000).expect("non-degenerate");

    assert_unit("authorities", &auth);
    assert_unit("hubs", &hub);

    let top_hub = hub.imax();
    assert_eq!(top_hub, 5, "node 5 should be the strongest hub: {hub:?}");
    for (i, h) in hub.iter().enumerate() {
        if i != 5 {
            assert!(hub[5] > *h, "hub[5]={} should exceed hub[{i}]={h}", hub[5]);
        }
    }
}

#[test]
fn sample_graph_fixed_point() {
    let result = run(&sample_graph(), 1000);
    assert_vec_close("authorities", &result.authorities, &SAMPLE_AUTHORITIES, VALUE_EPS);
    assert_vec_close("hubs", &result.hubs, &SAMPLE_HUBS, VALUE_EPS);
}

#[test]
fn sample_graph_converged_results_are_stable() {
    let (a1, h1) = compute_scores(&sample_graph(), 1000).expect("1000 iterations");
    let (a2, h2) = compute_scores(&sample_graph(), 2000).expect("2000 iterations");
    assert!((&a1 - &a2).amax() < 1e-6, "authorities drifted");
    assert!((&h1 - &h2).amax() < 1e-6, "hubs drifted");
}

#[test]
fn sample_graph_ranking_stable_above_convergence() {
    let baseline = run(&sample_graph(), 100);
    assert_eq!(baseline.hub_ranking(), vec![5, 0, 3, 1, 2, 4]);
    assert_eq!(baseline.authority_ranking(), vec![1, 4, 2, 0, 5, 3]);

    for iterations in [500, 1000, 2000, 10_000] {
        let result = run(&sample_graph(), iterations);
        assert_eq!(result.hub_ranking(), baseline.hub_ranking(), "{iterations}");
        assert_eq!(
            result.authority_ranking(),
            baseline.authority_ranking(),
            "{iterations}"
        );
    }
}

#[test]
fn sample_graph_two_step_matches() {
    let config = HitsConfig {
        update: UpdateRule::TwoStep,
        ..HitsConfig::with_iterations(1000)
    };
    let result = hits(&sample_graph(), &config).expect("non-degenerate");
    assert_vec_close("authorities", &result.authorities, &SAMPLE_AUTHORITIES, VALUE_EPS);
    assert_vec_close("hubs", &result.hubs, &SAMPLE_HUBS, VALUE_EPS);
}

// ===========================================================================
// Topology 2: linear chain (0 → 1 → 2 → 3)
//
// Every node with an out-edge is an equal hub; every node with an in-edge
// is an equal authority.
// ===========================================================================

#[test]
fn chain_scores() {
    let a = from_edges(4, &[(0, 1), (1, 2), (2, 3)]).expect("valid edges");
    let result = run(&a, 100);
    let third = 1.0 / 3.0_f64.sqrt();

    assert_vec_close("authorities", &result.authorities, &[0.0, third, third, third], NORM_EPS);
    assert_vec_close("hubs", &result.hubs, &[third, third, third, 0.0], NORM_EPS);
}

// ===========================================================================
// Topology 3: two disjoint edges (0 → 1, 2 → 3)
// ===========================================================================

#[test]
fn disconnected_components_symmetric() {
    let a = from_edges(4, &[(0, 1), (2, 3)]).expect("valid edges");
    let result = run(&a, 100);
    let half = 1.0 / 2.0_f64.sqrt();

    assert_vec_close("authorities", &result.authorities, &[0.0, half, 0.0, half], NORM_EPS);
    assert_vec_close("hubs", &result.hubs, &[half, 0.0, half, 0.0], NORM_EPS);
}

// ===========================================================================
// Topology 4: complete graph on three nodes and a two-cycle
// ===========================================================================

#[test]
fn complete_graph_uniform() {
    let a = from_rows(&[[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]).expect("3x3");
    let result = run(&a, 5);
    let third = 1.0 / 3.0_f64.sqrt();

    assert_vec_close("authorities", &result.authorities, &[third; 3], NORM_EPS);
    assert_vec_close("hubs", &result.hubs, &[third; 3], NORM_EPS);
}

#[test]
fn two_cycle_uniform() {
    let a = from_edges(2, &[(0, 1), (1, 0)]).expect("valid edges");
    let result = run(&a, 10);
    let half = 1.0 / 2.0_f64.sqrt();

    assert_vec_close("authorities", &result.authorities, &[half, half], NORM_EPS);
    assert_vec_close("hubs", &result.hubs, &[half, half], NORM_EPS);
}

// ===========================================================================
// Topology 5: weighted edges
//
// 0 → 1 (weight 2), 0 → 2 (weight 1): node 1 outranks node 2 as authority.
// ===========================================================================

#[test]
fn weighted_edges_shift_authority() {
    let a = from_rows(&[[0.0, 2.0, 1.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).expect("3x3");
    let result = run(&a, 10);
    let s = 5.0_f64.sqrt();

    assert_vec_close("authorities", &result.authorities, &[0.0, 2.0 / s, 1.0 / s], NORM_EPS);
    assert_vec_close("hubs", &result.hubs, &[1.0, 0.0, 0.0], NORM_EPS);
}

// ===========================================================================
// Degenerate inputs
// ===========================================================================

#[test]
fn isolated_single_node_is_degenerate() {
    let a = from_rows(&[[0.0]]).expect("1x1");
    match compute_scores(&a, 10_000) {
        Err(HitsError::DegenerateVector {
            vector, iteration, ..
        }) => {
            assert_eq!(vector, ScoreVector::Authority);
            assert_eq!(iteration, 1);
        }
        other => panic!("expected DegenerateVector, got {other:?}"),
    }
}

#[test]
fn edgeless_graph_is_degenerate() {
    let a = from_edges(5, &[]).expect("5 nodes");
    assert!(matches!(
        compute_scores(&a, 1),
        Err(HitsError::DegenerateVector { .. })
    ));
}

#[test]
fn non_square_rejected_before_scoring() {
    let a = DMatrix::<f64>::zeros(3, 2);
    assert_eq!(
        compute_scores(&a, 0),
        Err(HitsError::Shape { rows: 3, cols: 2 })
    );
}

// ===========================================================================
// petgraph input and reentrancy
// ===========================================================================

#[test]
fn petgraph_input_matches_edge_list() {
    let mut g = petgraph::graph::DiGraph::<u32, ()>::new();
    let nodes: Vec<_> = (0..4).map(|i| g.add_node(i)).collect();
    g.add_edge(nodes[0], nodes[1], ());
    g.add_edge(nodes[1], nodes[2], ());
    g.add_edge(nodes[2], nodes[3], ());

    let from_pg = from_graph(&g).expect("non-empty");
    let from_list = from_edges(4, &[(0, 1), (1, 2), (2, 3)]).expect("valid edges");
    assert_eq!(from_pg, from_list);
    assert_eq!(run(&from_pg, 50), run(&from_list, 50));
}

#[test]
fn concurrent_calls_are_independent() {
    let graphs = vec![
        sample_graph(),
        from_edges(4, &[(0, 1), (1, 2), (2, 3)]).expect("valid edges"),
        from_edges(2, &[(0, 1), (1, 0)]).expect("valid edges"),
    ];
    let sequential: Vec<_> = graphs.iter().map(|g| run(g, 500)).collect();

    let parallel: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = graphs.iter().map(|g| s.spawn(move || run(g, 500))).collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("scoring thread panicked"))
            .collect()
    });

    assert_eq!(sequential, parallel);
}
