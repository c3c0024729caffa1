use std::fmt;

/// Which score vector an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreVector {
    Authority,
    Hub,
}

impl ScoreVector {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authority => "authority",
            Self::Hub => "hub",
        }
    }
}

impl fmt::Display for ScoreVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from matrix construction and HITS scoring.
///
/// Every variant is terminal: retrying with the same input reproduces it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HitsError {
    /// The adjacency matrix is not square, or has no nodes at all.
    #[error("adjacency matrix must be square with at least one node, got {rows}x{cols}")]
    Shape { rows: usize, cols: usize },

    /// A row passed to [`crate::matrix::from_rows`] has the wrong length.
    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// An edge endpoint does not name a node of the graph.
    #[error("node {node} is out of range for a graph with {nodes} nodes")]
    NodeOutOfRange { node: usize, nodes: usize },

    /// The requested graph is too large to hold as a dense matrix.
    #[error("graph has {nodes} nodes, dense scoring supports at most {max}")]
    TooManyNodes { nodes: usize, max: usize },

    /// A matrix entry is negative, infinite or `NaN`.
    #[error("weight {weight} at ({row}, {col}) must be finite and non-negative")]
    InvalidWeight { row: usize, col: usize, weight: f64 },

    /// A score vector collapsed toward zero before normalization.
    #[error(
        "{vector} vector degenerated at iteration {iteration}: norm {norm:e} <= threshold {threshold:e}"
    )]
    DegenerateVector {
        vector: ScoreVector,
        iteration: usize,
        norm: f64,
        threshold: f64,
    },

    /// The degeneracy threshold is negative or not finite.
    #[error("degeneracy threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
}

impl HitsError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Shape { .. } => ErrorCode::NonSquareMatrix,
            Self::RaggedRows { .. } => ErrorCode::RaggedRows,
            Self::NodeOutOfRange { .. } => ErrorCode::NodeOutOfRange,
            Self::TooManyNodes { .. } => ErrorCode::GraphTooLarge,
            Self::InvalidWeight { .. } => ErrorCode::InvalidWeight,
            Self::DegenerateVector { .. } => ErrorCode::DegenerateVector,
            Self::InvalidThreshold(_) => ErrorCode::InvalidThreshold,
        }
    }
}

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NonSquareMatrix,
    RaggedRows,
    NodeOutOfRange,
    GraphTooLarge,
    InvalidWeight,
    DegenerateVector,
    InvalidThreshold,
    ConfigParseError,
    ConfigNotFound,
    ConfigReadError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NonSquareMatrix => "E1001",
            Self::RaggedRows => "E1002",
            Self::NodeOutOfRange => "E1003",
            Self::GraphTooLarge => "E1004",
            Self::InvalidWeight => "E1005",
            Self::DegenerateVector => "E2001",
            Self::InvalidThreshold => "E3001",
            Self::ConfigParseError => "E3002",
            Self::ConfigNotFound => "E3003",
            Self::ConfigReadError => "E3004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NonSquareMatrix => "Adjacency matrix is not square",
            Self::RaggedRows => "Adjacency rows have different lengths",
            Self::NodeOutOfRange => "Edge endpoint out of range",
            Self::GraphTooLarge => "Graph too large for dense scoring",
            Self::InvalidWeight => "Invalid edge weight",
            Self::DegenerateVector => "Score vector degenerated to zero",
            Self::InvalidThreshold => "Invalid degeneracy threshold",
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigNotFound => "Config file not found",
            Self::ConfigReadError => "Config file unreadable",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NonSquareMatrix => Some("Supply an N x N matrix with N >= 1."),
            Self::RaggedRows => Some("Give every row the same number of entries."),
            Self::NodeOutOfRange => Some("Use node indices in 0..N or raise --nodes."),
            Self::GraphTooLarge => Some("Split the graph or lower --nodes to at most 16384."),
            Self::InvalidWeight => Some("Use finite weights >= 0; 0/1 marks a plain edge."),
            Self::DegenerateVector => Some(
                "The graph has no hub/authority structure to rank; add edges or lower the threshold.",
            ),
            Self::InvalidThreshold => Some("Use a finite threshold >= 0, e.g. 1e-5."),
            Self::ConfigParseError => Some("Fix syntax in hubrank.toml and retry."),
            Self::ConfigNotFound => Some("Check the --config path or omit the flag."),
            Self::ConfigReadError => Some("Check that the path is a readable file."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
