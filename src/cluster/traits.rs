use crate::error::Result;
use crate::observation::Observations;
use crate::partition::Partition;

/// The one capability the estimator needs from a clustering algorithm:
/// split a set of observations into exactly `k` groups.
///
/// Implementations must return `k` non-empty, non-overlapping clusters that
/// together cover every observation, or fail. Returning a degenerate
/// partition is a contract violation; the scorer rejects it.
pub trait Partitioner {
    /// Partition `data` into `k` clusters.
    fn partition(&self, data: &Observations, k: usize) -> Result<Partition>;

    /// Whether repeated calls with the same inputs return the same partition.
    ///
    /// Randomized algorithms without a fixed seed should return `false`.
    fn is_deterministic(&self) -> bool {
        false
    }
}

/// Plain functions and closures are deterministic partitioners.
impl<F> Partitioner for F
where
    F: Fn(&Observations, usize) -> Result<Partition>,
{
    fn partition(&self, data: &Observations, k: usize) -> Result<Partition> {
        self(data, k)
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}
