//! Partitions: an ordered assignment of observations into `k` groups.
//!
//! A partition stores observation indices, not copies of the vectors. The
//! owning [`Observations`](crate::Observations) is always passed alongside.

use crate::error::{Error, Result};

/// Label given by [`Partition::labels`] to observations no cluster contains.
pub const UNASSIGNED: usize = usize::MAX;

/// An ordered collection of clusters, each a list of observation indices.
///
/// A valid partition over `n` observations with `k` clusters has exactly `k`
/// non-empty clusters and every index in `0..n` appears in exactly one of
/// them. Construction does not enforce this (a [`Partitioner`] may hand back
/// anything); [`Partition::validate`] does, and the silhouette scorer always
/// validates before scoring.
///
/// [`Partitioner`]: crate::Partitioner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    clusters: Vec<Vec<usize>>,
}

impl Partition {
    /// Wrap explicit member lists. Cluster order is preserved and is the
    /// order used for neighbor tie-breaking.
    pub fn from_clusters(clusters: Vec<Vec<usize>>) -> Self {
        Self { clusters }
    }

    /// Build a partition from one label per observation.
    ///
    /// Labels must lie in `0..k`; cluster `c` collects the indices labelled `c`
    /// in ascending order. Labels that leave a cluster empty are accepted here
    /// and rejected later by [`Partition::validate`].
    pub fn from_labels(labels: &[usize], k: usize) -> Result<Self> {
        let mut clusters = vec![Vec::new(); k];
        for (idx, &label) in labels.iter().enumerate() {
            let slot = clusters.get_mut(label).ok_or_else(|| {
                Error::InvalidPartition(format!(
                    "observation {idx} has label {label}, expected a label below {k}"
                ))
            })?;
            slot.push(idx);
        }
        Ok(Self { clusters })
    }

    /// Number of clusters.
    #[inline]
    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    /// Member indices of cluster `c`.
    ///
    /// # Panics
    ///
    /// Panics if `c >= self.k()`.
    #[inline]
    pub fn cluster(&self, c: usize) -> &[usize] {
        &self.clusters[c]
    }

    /// All clusters in partition order.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Cluster sizes in partition order.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }

    /// Per-observation label vector, the inverse of [`Partition::from_labels`].
    ///
    /// Observations missing from every cluster are labelled [`UNASSIGNED`];
    /// member indices at or above `n` are ignored. Both cannot happen for a
    /// partition that passes [`Partition::validate`] with the same `n`.
    pub fn labels(&self, n: usize) -> Vec<usize> {
        let mut out = vec![UNASSIGNED; n];
        for (c, members) in self.clusters.iter().enumerate() {
            for &i in members {
                if let Some(slot) = out.get_mut(i) {
                    *slot = c;
                }
            }
        }
        out
    }

    /// Check the partition invariant against `n` observations and an
    /// expected cluster count.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPartition`] describing the first violation found:
    /// wrong cluster count, an empty cluster, an out-of-range index, an index
    /// present twice, or an observation missing from every cluster.
    pub fn validate(&self, n: usize, expected_k: usize) -> Result<()> {
        if self.clusters.len() != expected_k {
            return Err(Error::InvalidPartition(format!(
                "expected {expected_k} clusters, got {}",
                self.clusters.len()
            )));
        }

        let mut seen = vec![false; n];
        for (c, members) in self.clusters.iter().enumerate() {
            if members.is_empty() {
                return Err(Error::InvalidPartition(format!("cluster {c} is empty")));
            }
            for &i in members {
                match seen.get_mut(i) {
                    None => {
                        return Err(Error::InvalidPartition(format!(
                            "cluster {c} references observation {i}, but only {n} exist"
                        )))
                    }
                    Some(true) => {
                        return Err(Error::InvalidPartition(format!(
                            "observation {i} assigned more than once"
                        )))
                    }
                    Some(flag) => *flag = true,
                }
            }
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Error::InvalidPartition(format!(
                "observation {missing} is not assigned to any cluster"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels_round_trip() {
        let labels = vec![1, 0, 1, 2, 0];
        let p = Partition::from_labels(&labels, 3).unwrap();
        assert_eq!(p.k(), 3);
        assert_eq!(p.cluster(0), &[1, 4]);
        assert_eq!(p.cluster(1), &[0, 2]);
        assert_eq!(p.cluster(2), &[3]);
        assert_eq!(p.sizes(), vec![2, 2, 1]);
        assert_eq!(p.labels(5), labels);
        p.validate(5, 3).unwrap();
    }

    #[test]
    fn test_labels_marks_unassigned() {
        let p = Partition::from_clusters(vec![vec![0], vec![2, 9]]);
        assert_eq!(p.labels(4), vec![0, UNASSIGNED, 1, UNASSIGNED]);
    }

    #[test]
    fn test_from_labels_out_of_range() {
        let err = Partition::from_labels(&[0, 3], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidPartition(_)));
    }

    #[test]
    fn test_validate_wrong_k() {
        let p = Partition::from_clusters(vec![vec![0, 1], vec![2]]);
        assert!(p.validate(3, 3).is_err());
        assert!(p.validate(3, 2).is_ok());
    }

    #[test]
    fn test_validate_empty_cluster() {
        let p = Partition::from_labels(&[0, 0, 0], 2).unwrap();
        let err = p.validate(3, 2).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_duplicate_member() {
        let p = Partition::from_clusters(vec![vec![0, 1], vec![1, 2]]);
        let err = p.validate(3, 2).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_missing_member() {
        let p = Partition::from_clusters(vec![vec![0], vec![2]]);
        let err = p.validate(3, 2).unwrap_err();
        assert!(err.to_string().contains("not assigned"));
    }

    #[test]
    fn test_validate_out_of_range_member() {
        let p = Partition::from_clusters(vec![vec![0, 1], vec![7]]);
        let err = p.validate(2, 2).unwrap_err();
        assert!(err.to_string().contains("only 2 exist"));
    }
}
