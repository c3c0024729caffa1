//! HITS (Hyperlink-Induced Topic Search) over a dense adjacency matrix.
//!
//! # Overview
//!
//! HITS computes two scores for each node:
//!
//! - **Authority score**: how strongly a node is pointed to by good hubs.
//! - **Hub score**: how strongly a node points to good authorities.
//!
//! # Algorithm
//!
//! Power iteration for the dominant eigenvectors of `AᵗA` (authorities) and
//! `AAᵗ` (hubs):
//!
//! 1. Compute `Aᵗ` and, once, the co-citation matrix `M = A·Aᵗ`.
//! 2. Initialize hub and authority vectors to all ones.
//! 3. Authority update: `a ← Aᵗ·h`, using the hub vector of the previous
//!    iteration.
//! 4. Hub update: `h ← M·h`, which equals `A·a` for the `a` of step 3.
//! 5. Normalize both vectors to unit L2 norm. A pre-normalization norm at or
//!    below the degeneracy threshold aborts the run.
//! 6. Repeat exactly `iterations` times. There is no convergence check.
//!
//! Folding the two-step hub update into `M` costs one matrix product up front
//! and saves one matrix-vector product per iteration. [`UpdateRule::TwoStep`]
//! runs the unfused form; both reach the same vectors.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::error::{HitsError, ScoreVector};
use crate::matrix::{co_citation, ensure_square};
use crate::rank::rank_descending;

/// Iteration count used when the caller does not choose one.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Pre-normalization norm at or below which a score vector is degenerate.
pub const DEFAULT_DEGENERACY_THRESHOLD: f64 = 1e-5;

/// How the hub vector is updated each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateRule {
    /// `h ← (A·Aᵗ)·h` with the co-citation matrix computed once.
    #[default]
    CoCitation,
    /// `h ← A·(Aᵗ·h)`, two matrix-vector products per iteration.
    TwoStep,
}

impl UpdateRule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoCitation => "co-citation",
            Self::TwoStep => "two-step",
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "co-citation" | "cocitation" | "fused" => Ok(Self::CoCitation),
            "two-step" | "twostep" => Ok(Self::TwoStep),
            other => Err(format!(
                "unknown update rule '{other}', expected 'co-citation' or 'two-step'"
            )),
        }
    }
}

/// Parameters for [`hits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitsConfig {
    /// Exact number of iterations to run. Zero returns the all-ones vectors.
    pub iterations: usize,
    /// Norms at or below this value abort the run as degenerate.
    pub degeneracy_threshold: f64,
    /// Hub update formula.
    pub update: UpdateRule,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            degeneracy_threshold: DEFAULT_DEGENERACY_THRESHOLD,
            update: UpdateRule::default(),
        }
    }
}

impl HitsConfig {
    /// Default configuration with a specific iteration count.
    #[must_use]
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Check that the threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`HitsError::InvalidThreshold`] for a negative, infinite or
    /// `NaN` threshold.
    pub fn validate(&self) -> Result<(), HitsError> {
        let t = self.degeneracy_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(HitsError::InvalidThreshold(t));
        }
        Ok(())
    }
}

/// Result of the HITS algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct HitsResult {
    /// Authority scores, indexed by node.
    pub authorities: DVector<f64>,
    /// Hub scores, indexed by node.
    pub hubs: DVector<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Hub update formula used.
    pub update: UpdateRule,
}

impl HitsResult {
    /// Number of nodes scored.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.hubs.len()
    }

    /// Node indices by descending hub score.
    #[must_use]
    pub fn hub_ranking(&self) -> Vec<usize> {
        rank_descending(self.hubs.as_slice())
    }

    /// Node indices by descending authority score.
    #[must_use]
    pub fn authority_ranking(&self) -> Vec<usize> {
        rank_descending(self.authorities.as_slice())
    }

    /// Node with the highest hub score (lowest index on ties).
    #[must_use]
    pub fn top_hub(&self) -> Option<usize> {
        self.hub_ranking().first().copied()
    }

    /// Node with the highest authority score (lowest index on ties).
    #[must_use]
    pub fn top_authority(&self) -> Option<usize> {
        self.authority_ranking().first().copied()
    }

    /// Split into `(authorities, hubs)`.
    #[must_use]
    pub fn into_pair(self) -> (DVector<f64>, DVector<f64>) {
        (self.authorities, self.hubs)
    }
}

/// Compute `(authorities, hubs)` with the default threshold and update rule.
///
/// # Errors
///
/// - [`HitsError::Shape`] if `adjacency` is not square or is empty.
/// - [`HitsError::DegenerateVector`] if a score vector collapses toward zero.
pub fn compute_scores(
    adjacency: &DMatrix<f64>,
    iterations: usize,
) -> Result<(DVector<f64>, DVector<f64>), HitsError> {
    hits(adjacency, &HitsConfig::with_iterations(iterations)).map(HitsResult::into_pair)
}

/// Compute HITS hub and authority scores.
///
/// The input is only read. The shape is checked before any multiplication.
/// Weights are used as given; the [`crate::matrix`] constructors are the
/// place negative or non-finite entries get rejected.
///
/// # Errors
///
/// - [`HitsError::Shape`] if `adjacency` is not square or is empty.
/// - [`HitsError::InvalidThreshold`] if the configured threshold is unusable.
/// - [`HitsError::DegenerateVector`] if, at any iteration, the authority or
///   hub norm before normalization is at or below the threshold or is not
///   finite. The authority vector is checked first. No partial result is
///   returned.
#[instrument(skip(adjacency), fields(nodes = adjacency.nrows()))]
pub fn hits(adjacency: &DMatrix<f64>, config: &HitsConfig) -> Result<HitsResult, HitsError> {
    let n = ensure_square(adjacency)?;
    config.validate()?;

    let transposed = adjacency.transpose();
    let co_cited = match config.update {
        UpdateRule::CoCitation => Some(co_citation(adjacency)),
        UpdateRule::TwoStep => None,
    };

    let mut hub = DVector::from_element(n, 1.0);
    let mut auth = DVector::from_element(n, 1.0);

    debug!(
        iterations = config.iterations,
        update = %config.update,
        "starting HITS"
    );

    for iteration in 1..=config.iterations {
        // Both updates read the hub vector of the previous iteration.
        let mut new_auth = &transposed * &hub;
        let mut new_hub = match &co_cited {
            Some(m) => m * &hub,
            None => adjacency * &new_auth,
        };

        let auth_norm = new_auth.norm();
        let hub_norm = new_hub.norm();
        trace!(iteration, auth_norm, hub_norm, "HITS step");

        check_norm(ScoreVector::Authority, auth_norm, iteration, config)?;
        check_norm(ScoreVector::Hub, hub_norm, iteration, config)?;

        new_auth /= auth_norm;
        new_hub /= hub_norm;
        auth = new_auth;
        hub = new_hub;
    }

    debug!(iterations = config.iterations, "HITS finished");

    Ok(HitsResult {
        authorities: auth,
        hubs: hub,
        iterations: config.iterations,
        update: config.update,
    })
}

fn check_norm(
    vector: ScoreVector,
    norm: f64,
    iteration: usize,
    config: &HitsConfig,
) -> Result<(), HitsError> {
    let threshold = config.degeneracy_threshold;
    if norm.is_finite() && norm > threshold {
        return Ok(());
    }
    warn!(%vector, iteration, norm, threshold, "score vector degenerated");
    Err(HitsError::DegenerateVector {
        vector,
        iteration,
        norm,
        threshold,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
