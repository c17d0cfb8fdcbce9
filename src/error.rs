use thiserror::Error;

/// Errors returned by the estimation engine and the partitioners in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The observation store is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Observations in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch at observation {index}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Index of the first offending observation.
        index: usize,
        /// Dimensionality of observation 0.
        expected: usize,
        /// Dimensionality of the offending observation.
        found: usize,
    },

    /// An observation carries a NaN or infinite coordinate.
    #[error("observation {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending observation.
        index: usize,
    },

    /// Requested cluster count cannot be satisfied by the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_distinct} distinct points")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of distinct observations in the dataset.
        n_distinct: usize,
    },

    /// A partition breaks the partition invariant.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    /// Separation was requested on a partition with fewer than two clusters.
    #[error("separation is undefined for a partition with {clusters} cluster(s)")]
    DegenerateSeparation {
        /// Number of clusters in the partition.
        clusters: usize,
    },

    /// A silhouette value came out NaN or infinite.
    #[error("non-finite silhouette value {value} for observation {index}")]
    NumericDefect {
        /// Observation index.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Partitioning or scoring failed for one candidate k; the sweep was aborted.
    #[error("sweep aborted at k = {k}: {source}")]
    PartitionFailure {
        /// The candidate cluster count that failed.
        k: usize,
        /// Underlying cause.
        #[source]
        source: Box<Error>,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The candidate k a sweep failure refers to, if any.
    pub fn failed_k(&self) -> Option<usize> {
        match self {
            Error::PartitionFailure { k, .. } => Some(*k),
            _ => None,
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
