#![forbid(unsafe_code)]
//! hubrank-core library.
//!
//! HITS hub and authority scores for a directed graph given as a dense
//! adjacency matrix.
//!
//! ```
//! use hubrank_core::{compute_scores, matrix::sample_graph};
//!
//! let (authorities, hubs) = compute_scores(&sample_graph(), 100).unwrap();
//! assert!((hubs.norm() - 1.0).abs() < 1e-9);
//! assert!((authorities.norm() - 1.0).abs() < 1e-9);
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`HitsError`] for scoring and matrix construction,
//!   `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod hits;
pub mod matrix;
pub mod rank;

pub use error::{ErrorCode, HitsError, ScoreVector};
pub use hits::{HitsConfig, HitsResult, UpdateRule, compute_scores, hits};
