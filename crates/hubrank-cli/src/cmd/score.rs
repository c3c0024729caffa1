//! `hubrank score` and `hubrank sample`: HITS scores for an inline graph.
//!
//! - `hubrank sample`: the six-node reference graph
//! - `hubrank score --row 0,1 --row 1,0`: a dense matrix, one row per flag
//! - `hubrank score --edge 0:1 --edge 1:2`: an edge list (optionally `--nodes N`)

use std::io::{self, Write};

use anyhow::Result;
use clap::{ArgGroup, Args};
use serde::Serialize;
use tracing::{debug, info};

use hubrank_core::matrix::{Adjacency, MAX_NODES, from_edges, from_rows, sample_graph};
use hubrank_core::{HitsConfig, HitsError, HitsResult, hits};

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Iteration count of the reference run on the sample graph.
pub const SAMPLE_ITERATIONS: usize = 10_000;

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

/// Arguments for `hubrank score`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("graph").required(true).args(["rows", "edges"])))]
pub struct ScoreArgs {
    /// One adjacency row as comma-separated weights. Repeat once per node.
    #[arg(long = "row", value_name = "W,W,...", value_parser = parse_row)]
    pub rows: Vec<Row>,

    /// Directed edge `FROM:TO` with unit weight. Repeatable.
    #[arg(
        long = "edge",
        value_name = "FROM:TO",
        value_parser = parse_edge,
        conflicts_with = "rows"
    )]
    pub edges: Vec<(usize, usize)>,

    /// Node count for `--edge` input (default: highest endpoint + 1).
    #[arg(long, requires = "edges")]
    pub nodes: Option<usize>,
}

/// One parsed `--row` value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<f64>);

impl AsRef<[f64]> for Row {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

fn parse_row(raw: &str) -> Result<Row, String> {
    raw.split(',')
        .map(|cell| {
            let cell = cell.trim();
            cell.parse::<f64>()
                .map_err(|_| format!("'{cell}' is not a number"))
        })
        .collect::<Result<Vec<f64>, String>>()
        .map(Row)
}

fn parse_edge(raw: &str) -> Result<(usize, usize), String> {
    let (from, to) = raw
        .split_once(':')
        .ok_or_else(|| format!("edge '{raw}' must look like FROM:TO"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{s}' is not a node index"))
    };
    Ok((parse(from)?, parse(to)?))
}

/// Node count implied by an edge list: highest endpoint plus one.
fn infer_node_count(edges: &[(usize, usize)]) -> Result<usize, HitsError> {
    let Some(highest) = edges.iter().map(|&(from, to)| from.max(to)).max() else {
        return Ok(0);
    };
    highest
        .checked_add(1)
        .filter(|&nodes| nodes <= MAX_NODES)
        .ok_or(HitsError::NodeOutOfRange {
            node: highest,
            nodes: MAX_NODES,
        })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Serializable summary of one scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub nodes: usize,
    pub iterations: usize,
    pub update: String,
    pub authorities: Vec<f64>,
    pub hubs: Vec<f64>,
    pub hub_ranking: Vec<usize>,
    pub authority_ranking: Vec<usize>,
}

impl From<&HitsResult> for ScoreReport {
    fn from(result: &HitsResult) -> Self {
        Self {
            nodes: result.node_count(),
            iterations: result.iterations,
            update: result.update.to_string(),
            authorities: result.authorities.as_slice().to_vec(),
            hubs: result.hubs.as_slice().to_vec(),
            hub_ranking: result.hub_ranking(),
            authority_ranking: result.authority_ranking(),
        }
    }
}

impl ScoreReport {
    /// 1-based rank of `node` in `ranking`.
    fn rank_of(ranking: &[usize], node: usize) -> usize {
        ranking.iter().position(|&n| n == node).map_or(0, |p| p + 1)
    }
}

fn render_text(report: &ScoreReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "node\tauthority\thub")?;
    for node in 0..report.nodes {
        writeln!(
            w,
            "{node}\t{:.6}\t{:.6}",
            report.authorities[node], report.hubs[node]
        )?;
    }
    Ok(())
}

fn render_pretty(report: &ScoreReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "HITS scores")?;
    pretty_kv(w, "Nodes", report.nodes.to_string())?;
    pretty_kv(w, "Iterations", report.iterations.to_string())?;
    pretty_kv(w, "Update", &report.update)?;
    writeln!(w)?;
    writeln!(
        w,
        "{:>6}  {:>12}  {:>6}  {:>12}  {:>6}",
        "node", "authority", "rank", "hub", "rank"
    )?;
    pretty_rule(w)?;
    for node in 0..report.nodes {
        writeln!(
            w,
            "{node:>6}  {:>12.6}  {:>6}  {:>12.6}  {:>6}",
            report.authorities[node],
            ScoreReport::rank_of(&report.authority_ranking, node),
            report.hubs[node],
            ScoreReport::rank_of(&report.hub_ranking, node),
        )?;
    }
    if let (Some(hub), Some(auth)) = (report.hub_ranking.first(), report.authority_ranking.first())
    {
        writeln!(w)?;
        pretty_kv(w, "Top hub", hub.to_string())?;
        pretty_kv(w, "Top auth", auth.to_string())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn score_and_render(
    adjacency: &Adjacency,
    config: &HitsConfig,
    output: OutputMode,
) -> Result<()> {
    let result = hits(adjacency, config)?;
    info!(
        nodes = result.node_count(),
        iterations = result.iterations,
        top_hub = ?result.top_hub(),
        top_authority = ?result.top_authority(),
        "scored graph"
    );
    let report = ScoreReport::from(&result);
    render_mode(output, &report, render_text, render_pretty)
}

/// Score the graph described by `args`.
///
/// # Errors
///
/// Returns an error if the matrix is malformed or a score vector degenerates.
pub fn run_score(args: &ScoreArgs, config: &HitsConfig, output: OutputMode) -> Result<()> {
    let adjacency = if args.rows.is_empty() {
        let nodes = match args.nodes {
            Some(nodes) => nodes,
            None => infer_node_count(&args.edges)?,
        };
        debug!(nodes, edges = args.edges.len(), "building matrix from edges");
        from_edges(nodes, &args.edges)?
    } else {
        debug!(rows = args.rows.len(), "building matrix from rows");
        from_rows(&args.rows)?
    };
    score_and_render(&adjacency, config, output)
}

/// Score the six-node reference graph.
///
/// # Errors
///
/// Returns an error if the configured threshold is invalid or rendering fails.
pub fn run_sample(config: &HitsConfig, output: OutputMode) -> Result<()> {
    score_and_render(&sample_graph(), config, output)
}
