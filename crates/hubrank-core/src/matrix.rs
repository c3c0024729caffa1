//! Dense adjacency matrices.
//!
//! Entry `(i, j)` is the weight of the directed edge `i → j`. Weights must be
//! finite and non-negative; the reference graphs use 0/1. Every constructor
//! here returns a square matrix with between 1 and [`MAX_NODES`] nodes and
//! valid weights, so the result can go straight into [`crate::hits::hits`].
//! A matrix built by hand skips the weight check.

use nalgebra::DMatrix;
use petgraph::{EdgeType, Graph, graph::IndexType, visit::EdgeRef};

use crate::error::HitsError;

/// Dense adjacency matrix as accepted by [`crate::hits::hits`].
pub type Adjacency = DMatrix<f64>;

/// Largest node count the constructors will allocate a dense matrix for.
pub const MAX_NODES: usize = 16_384;

/// Number of nodes in the six-node reference graph.
pub const SAMPLE_NODES: usize = 6;

#[rustfmt::skip]
const SAMPLE_ROWS: [f64; SAMPLE_NODES * SAMPLE_NODES] = [
    0.0, 1.0, 0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    0.0, 0.0, 1.0, 0.0, 0.0, 1.0,
    0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
    1.0, 1.0, 1.0, 0.0, 1.0, 0.0,
];

/// Check that `adjacency` is square and non-empty, returning its node count.
///
/// # Errors
///
/// Returns [`HitsError::Shape`] when the row and column counts differ or the
/// matrix has no rows.
pub fn ensure_square(adjacency: &DMatrix<f64>) -> Result<usize, HitsError> {
    let (rows, cols) = adjacency.shape();
    if rows != cols || rows == 0 {
        return Err(HitsError::Shape { rows, cols });
    }
    Ok(rows)
}

fn ensure_node_budget(nodes: usize) -> Result<(), HitsError> {
    if nodes > MAX_NODES {
        return Err(HitsError::TooManyNodes {
            nodes,
            max: MAX_NODES,
        });
    }
    Ok(())
}

/// Build an adjacency matrix from row vectors.
///
/// # Errors
///
/// - [`HitsError::RaggedRows`] if any row differs in length from the first.
/// - [`HitsError::InvalidWeight`] for a negative or non-finite entry.
/// - [`HitsError::TooManyNodes`] for more than [`MAX_NODES`] rows.
/// - [`HitsError::Shape`] if there are no rows or the rows are not square.
pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<DMatrix<f64>, HitsError> {
    let Some(first) = rows.first() else {
        return Err(HitsError::Shape { rows: 0, cols: 0 });
    };
    let cols = first.as_ref().len();
    ensure_node_budget(rows.len())?;

    for (row, values) in rows.iter().enumerate() {
        let values = values.as_ref();
        if values.len() != cols {
            return Err(HitsError::RaggedRows {
                row,
                expected: cols,
                found: values.len(),
            });
        }
        if let Some((col, &weight)) = values
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(HitsError::InvalidWeight { row, col, weight });
        }
    }

    let matrix = DMatrix::from_fn(rows.len(), cols, |i, j| rows[i].as_ref()[j]);
    ensure_square(&matrix)?;
    Ok(matrix)
}

/// Build a 0/1 adjacency matrix with `nodes` nodes from an edge list.
///
/// Repeated edges collapse to a single unit entry.
///
/// # Errors
///
/// - [`HitsError::Shape`] if `nodes` is zero.
/// - [`HitsError::TooManyNodes`] if `nodes` exceeds [`MAX_NODES`].
/// - [`HitsError::NodeOutOfRange`] if an endpoint is `>= nodes`.
pub fn from_edges(nodes: usize, edges: &[(usize, usize)]) -> Result<DMatrix<f64>, HitsError> {
    if nodes == 0 {
        return Err(HitsError::Shape { rows: 0, cols: 0 });
    }
    ensure_node_budget(nodes)?;

    let mut adjacency = DMatrix::zeros(nodes, nodes);
    for &(from, to) in edges {
        for node in [from, to] {
            if node >= nodes {
                return Err(HitsError::NodeOutOfRange { node, nodes });
            }
        }
        adjacency[(from, to)] = 1.0;
    }
    Ok(adjacency)
}

/// Build a 0/1 adjacency matrix from a petgraph graph.
///
/// Row/column `i` corresponds to the node with index `i`. Undirected graphs
/// produce a symmetric matrix.
///
/// # Errors
///
/// - [`HitsError::Shape`] for a graph with no nodes.
/// - [`HitsError::TooManyNodes`] for more than [`MAX_NODES`] nodes.
pub fn from_graph<N, E, Ty, Ix>(graph: &Graph<N, E, Ty, Ix>) -> Result<DMatrix<f64>, HitsError>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    let n = graph.node_count();
    if n == 0 {
        return Err(HitsError::Shape { rows: 0, cols: 0 });
    }
    ensure_node_budget(n)?;

    let mut adjacency = DMatrix::zeros(n, n);
    for edge in graph.edge_references() {
        let u = edge.source().index();
        let v = edge.target().index();
        adjacency[(u, v)] = 1.0;
        if !graph.is_directed() {
            adjacency[(v, u)] = 1.0;
        }
    }
    Ok(adjacency)
}

/// Co-citation matrix `A · Aᵗ`: entry `(i, j)` counts the nodes that both
/// `i` and `j` point to.
#[must_use]
pub fn co_citation(adjacency: &DMatrix<f64>) -> DMatrix<f64> {
    adjacency * adjacency.transpose()
}

/// The six-node reference graph. Node 5 has the highest out-degree.
#[must_use]
pub fn sample_graph() -> DMatrix<f64> {
    DMatrix::from_row_slice(SAMPLE_NODES, SAMPLE_NODES, &SAMPLE_ROWS)
}
