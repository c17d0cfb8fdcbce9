//! Silhouette coefficient (Rousseeuw, 1987).
//!
//! For an observation `p` in cluster `C`:
//!
//! ```text
//! a(p) = mean distance from p to the other members of C          (cohesion)
//! b(p) = min over C' != C of mean distance from p to members of C' (separation)
//! s(p) = (b(p) - a(p)) / max(a(p), b(p))
//! ```
//!
//! `s(p)` lies in `[-1, 1]`: close to 1 when `p` sits well inside its
//! cluster, near 0 on a boundary, negative when `p` is closer to another
//! cluster than to its own. The score of a partition is the mean of `s(p)`
//! over all observations.
//!
//! ## Conventions
//!
//! - A member of a singleton cluster has `a(p) = 0` and `s(p) = 0`.
//! - If `a(p) = b(p) = 0` (coincident points split across clusters), `s(p) = 0`.
//! - The neighbor cluster is the first cluster in partition order achieving
//!   the minimum mean distance.
//! - Distances are Euclidean.

use crate::cluster::euclidean;
use crate::error::{Error, Result};
use crate::observation::Observations;
use crate::partition::Partition;

/// Cohesion and separation of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohesionSeparation {
    /// Mean distance to the other members of the observation's own cluster.
    pub cohesion: f64,
    /// Mean distance to the members of the nearest other cluster.
    pub separation: f64,
    /// Index of the nearest other cluster.
    pub neighbor: usize,
}

/// Silhouette diagnostics for one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSilhouette {
    /// Observation index.
    pub index: usize,
    /// Cluster the observation belongs to.
    pub cluster: usize,
    /// `a(p)`.
    pub cohesion: f64,
    /// `b(p)`.
    pub separation: f64,
    /// Nearest other cluster.
    pub neighbor: usize,
    /// `s(p)`.
    pub value: f64,
}

fn mean_distance(data: &Observations, point: usize, members: &[usize]) -> (f64, usize) {
    let p = data.get(point);
    let mut sum = 0.0;
    let mut count = 0usize;
    for &m in members {
        if m == point {
            continue;
        }
        sum += euclidean(p, data.get(m));
        count += 1;
    }
    (sum, count)
}

/// Unchecked core: assumes a valid partition with at least two clusters.
fn spread(
    data: &Observations,
    partition: &Partition,
    cluster: usize,
    point: usize,
) -> CohesionSeparation {
    let (sum, count) = mean_distance(data, point, partition.cluster(cluster));
    let cohesion = if count == 0 { 0.0 } else { sum / count as f64 };

    let mut separation = f64::INFINITY;
    let mut neighbor = usize::MAX;
    for (c, members) in partition.clusters().iter().enumerate() {
        if c == cluster {
            continue;
        }
        let (sum, count) = mean_distance(data, point, members);
        if count == 0 {
            continue;
        }
        let mean = sum / count as f64;
        // Strict comparison keeps the first cluster on ties.
        if mean < separation {
            separation = mean;
            neighbor = c;
        }
    }

    CohesionSeparation {
        cohesion,
        separation,
        neighbor,
    }
}

/// Cohesion, separation and neighbor cluster of observation `point`, which
/// must be a member of cluster `cluster`.
///
/// # Errors
///
/// - [`Error::DegenerateSeparation`] if the partition has fewer than two clusters.
/// - [`Error::InvalidPartition`] if the partition does not cover `data` exactly
///   once with non-empty clusters, or `point` is not a member of `cluster`.
pub fn cohesion_separation(
    data: &Observations,
    partition: &Partition,
    cluster: usize,
    point: usize,
) -> Result<CohesionSeparation> {
    if partition.k() < 2 {
        return Err(Error::DegenerateSeparation {
            clusters: partition.k(),
        });
    }
    partition.validate(data.len(), partition.k())?;
    if cluster >= partition.k() || !partition.cluster(cluster).contains(&point) {
        return Err(Error::InvalidPartition(format!(
            "observation {point} is not a member of cluster {cluster}"
        )));
    }

    Ok(spread(data, partition, cluster, point))
}

/// `s = (b - a) / max(a, b)` for a member of a cluster of `cluster_size`.
///
/// Returns 0 for singleton clusters and when `a = b = 0`.
#[inline]
pub fn silhouette_value(cohesion: f64, separation: f64, cluster_size: usize) -> f64 {
    if cluster_size <= 1 {
        return 0.0;
    }
    let denom = cohesion.max(separation);
    if denom == 0.0 {
        return 0.0;
    }
    (separation - cohesion) / denom
}

/// Per-observation silhouette diagnostics, ordered by observation index.
///
/// # Errors
///
/// - [`Error::DegenerateSeparation`] if the partition has fewer than two clusters.
/// - [`Error::InvalidPartition`] if the partition does not cover `data` exactly once
///   with non-empty clusters.
/// - [`Error::NumericDefect`] if any value is not finite.
pub fn silhouette_samples(data: &Observations, partition: &Partition) -> Result<Vec<PointSilhouette>> {
    let k = partition.k();
    if k < 2 {
        return Err(Error::DegenerateSeparation { clusters: k });
    }
    partition.validate(data.len(), k)?;

    let mut out = Vec::with_capacity(data.len());
    for (cluster, members) in partition.clusters().iter().enumerate() {
        for &index in members {
            let cs = spread(data, partition, cluster, index);
            let value = silhouette_value(cs.cohesion, cs.separation, members.len());
            if !value.is_finite() {
                return Err(Error::NumericDefect { index, value });
            }
            out.push(PointSilhouette {
                index,
                cluster,
                cohesion: cs.cohesion,
                separation: cs.separation,
                neighbor: cs.neighbor,
                value,
            });
        }
    }
    out.sort_unstable_by_key(|s| s.index);
    Ok(out)
}

/// Mean silhouette value over all observations.
///
/// Values are summed in observation-index order, so the result does not
/// depend on cluster order.
///
/// # Errors
///
/// Same as [`silhouette_samples`].
pub fn silhouette_score(data: &Observations, partition: &Partition) -> Result<f64> {
    let samples = silhouette_samples(data, partition)?;
    let sum: f64 = samples.iter().map(|s| s.value).sum();
    Ok(sum / samples.len() as f64)
}
