//! The k sweep: score every candidate `k` in `2..=kmax` and pick the best.
//!
//! Each candidate is evaluated independently from the same read-only
//! [`Observations`]: one [`Partitioner`] call, a partition check, then a
//! silhouette pass. Candidates can therefore run in any order or in
//! parallel ([`KSweep::run_parallel`]); results are always re-assembled in
//! increasing `k` before selection.
//!
//! ## Failure policy
//!
//! The sweep is fail-fast. If partitioning or scoring fails for some `k`
//! the whole sweep returns [`Error::PartitionFailure`] carrying that `k`;
//! a partial series is never returned, since a missing `k` would bias the
//! selection. In parallel mode the lowest failing `k` is reported.
//!
//! ## Selection
//!
//! Scores are scanned in increasing `k`; a later `k` replaces the current
//! best only if its score is higher by more than the tie tolerance. Equal
//! scores therefore resolve to the lowest `k`.

use crate::cluster::Partitioner;
use crate::error::{Error, Result};
use crate::observation::Observations;
use crate::report::{Estimate, KScore};
use crate::silhouette::silhouette_score;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Default tolerance under which two scores count as tied.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-9;

/// Sweep configuration.
#[derive(Debug, Clone)]
pub struct KSweep {
    kmax: usize,
    tie_tolerance: f64,
}

impl KSweep {
    /// Sweep `k = 2..=kmax`.
    pub fn new(kmax: usize) -> Self {
        Self {
            kmax,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
        }
    }

    /// Scores within `tol` of the current best do not replace it.
    pub fn with_tie_tolerance(mut self, tol: f64) -> Self {
        self.tie_tolerance = tol;
        self
    }

    /// Inclusive upper bound on k.
    pub fn kmax(&self) -> usize {
        self.kmax
    }

    fn check(&self, data: &Observations) -> Result<()> {
        if self.kmax < 2 {
            return Err(Error::InvalidParameter {
                name: "kmax",
                message: "must be at least 2",
            });
        }
        if !(self.tie_tolerance.is_finite() && self.tie_tolerance >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tie_tolerance",
                message: "must be finite and non-negative",
            });
        }
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(())
    }

    /// Evaluate every k in order on the calling thread, stopping at the
    /// first failure.
    pub fn run<P>(&self, data: &Observations, partitioner: &P) -> Result<Estimate>
    where
        P: Partitioner + ?Sized,
    {
        self.check(data)?;

        let mut scores = Vec::with_capacity(self.kmax - 1);
        for k in 2..=self.kmax {
            scores.push(score_k(data, partitioner, k)?);
        }
        self.finish(scores, partitioner.is_deterministic())
    }

    /// Evaluate all k concurrently on the rayon pool.
    ///
    /// Produces the same [`Estimate`] as [`KSweep::run`] for a deterministic
    /// partitioner. On failure, the error for the lowest failing k wins
    /// regardless of completion order.
    pub fn run_parallel<P>(&self, data: &Observations, partitioner: &P) -> Result<Estimate>
    where
        P: Partitioner + Sync + ?Sized,
    {
        self.check(data)?;

        let results: Vec<Result<KScore>> = (2..=self.kmax)
            .into_par_iter()
            .map(|k| score_k(data, partitioner, k))
            .collect();
        let scores = results.into_iter().collect::<Result<Vec<_>>>()?;
        self.finish(scores, partitioner.is_deterministic())
    }

    fn finish(&self, scores: Vec<KScore>, reproducible: bool) -> Result<Estimate> {
        let best = select_best(&scores, self.tie_tolerance)
            .ok_or_else(|| Error::Other("sweep produced no scores".to_string()))?;
        info!(
            best_k = best.k,
            best_score = best.score,
            candidates = scores.len(),
            reproducible,
            "k sweep complete"
        );
        Ok(Estimate {
            scores,
            best,
            reproducible,
        })
    }
}

/// Partition and score a single candidate `k`.
///
/// Any failure is wrapped in [`Error::PartitionFailure`] naming `k`.
pub fn score_k<P>(data: &Observations, partitioner: &P, k: usize) -> Result<KScore>
where
    P: Partitioner + ?Sized,
{
    let fail = move |source: Error| {
        warn!(k, error = %source, "candidate k failed");
        Error::PartitionFailure {
            k,
            source: Box::new(source),
        }
    };

    let partition = partitioner.partition(data, k).map_err(fail)?;
    partition.validate(data.len(), k).map_err(fail)?;
    let score = silhouette_score(data, &partition).map_err(fail)?;

    debug!(k, score, sizes = ?partition.sizes(), "scored candidate k");
    Ok(KScore { k, score })
}

/// Pick the best entry of a k-ordered score series.
///
/// A later entry wins only if it beats the current best by more than `tol`;
/// ties keep the earliest (lowest) k. Returns `None` for an empty series.
pub fn select_best(scores: &[KScore], tol: f64) -> Option<KScore> {
    let mut best: Option<KScore> = None;
    for s in scores {
        match best {
            Some(b) if s.score <= b.score + tol => {}
            _ => best = Some(*s),
        }
    }
    best
}

/// Estimate the number of clusters in `data`, sweeping `k = 2..=kmax`.
///
/// Shorthand for `KSweep::new(kmax).run(data, partitioner)`.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `kmax < 2`.
/// - [`Error::PartitionFailure`] naming the first `k` that could not be
///   partitioned or scored.
pub fn estimate_k<P>(data: &Observations, kmax: usize, partitioner: &P) -> Result<Estimate>
where
    P: Partitioner + ?Sized,
{
    KSweep::new(kmax).run(data, partitioner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;

    fn line(n: usize) -> Observations {
        Observations::new((0..n).map(|i| vec![i as f64]).collect()).unwrap()
    }

    /// Contiguous blocks of indices, deterministic.
    fn blocks(data: &Observations, k: usize) -> Result<Partition> {
        let n = data.len();
        if k > n {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_distinct: n,
            });
        }
        let labels: Vec<usize> = (0..n).map(|i| i * k / n).collect();
        Partition::from_labels(&labels, k)
    }

    #[test]
    fn test_select_best_prefers_lowest_k_on_tie() {
        let scores = vec![
            KScore { k: 2, score: 0.5 },
            KScore { k: 3, score: 0.7 },
            KScore { k: 4, score: 0.7 },
            KScore { k: 5, score: 0.7 + 1e-12 },
        ];
        let best = select_best(&scores, DEFAULT_TIE_TOLERANCE).unwrap();
        assert_eq!(best.k, 3);

        let best = select_best(&scores, 0.0).unwrap();
        assert_eq!(best.k, 5);
        assert!(select_best(&[], 0.0).is_none());
    }

    #[test]
    fn test_select_best_first_entry_even_if_negative() {
        let scores = vec![KScore { k: 2, score: -0.3 }, KScore { k: 3, score: -0.4 }];
        assert_eq!(select_best(&scores, 0.0).unwrap().k, 2);
    }

    #[test]
    fn test_kmax_below_two_is_config_error() {
        let data = line(5);
        for kmax in [0, 1] {
            let err = estimate_k(&data, kmax, &blocks).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "kmax", .. }));
        }
    }

    #[test]
    fn test_bad_tie_tolerance() {
        let data = line(5);
        let err = KSweep::new(3)
            .with_tie_tolerance(-1.0)
            .run(&data, &blocks)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "tie_tolerance",
                ..
            }
        ));
    }

    #[test]
    fn test_sweep_covers_every_k() {
        let data = line(8);
        let est = estimate_k(&data, 5, &blocks).unwrap();
        let ks: Vec<usize> = est.scores.iter().map(|s| s.k).collect();
        assert_eq!(ks, vec![2, 3, 4, 5]);
        assert!(est.reproducible);
        assert!(est.scores.iter().all(|s| (-1.0..=1.0).contains(&s.score)));
    }

    #[test]
    fn test_failure_names_k() {
        let data = line(4);
        let err = estimate_k(&data, 7, &blocks).unwrap_err();
        assert_eq!(err.failed_k(), Some(5));
        match err {
            Error::PartitionFailure { source, .. } => {
                assert!(matches!(*source, Error::InvalidClusterCount { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_partition_rejected() {
        let data = line(6);
        let lossy = |_: &Observations, k: usize| -> Result<Partition> {
            Ok(Partition::from_clusters(vec![vec![0]; k]))
        };
        let err = estimate_k(&data, 3, &lossy).unwrap_err();
        assert_eq!(err.failed_k(), Some(2));
    }

    #[test]
    fn test_wrong_cluster_count_rejected() {
        let data = line(6);
        let off_by_one = |d: &Observations, k: usize| blocks(d, k + 1);
        let err = estimate_k(&data, 3, &off_by_one).unwrap_err();
        assert_eq!(err.failed_k(), Some(2));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = line(12);
        let seq = KSweep::new(6).run(&data, &blocks).unwrap();
        let par = KSweep::new(6).run_parallel(&data, &blocks).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_parallel_reports_lowest_failing_k() {
        let data = line(6);
        let flaky = |d: &Observations, k: usize| {
            if k == 4 || k == 6 {
                Err(Error::Other(format!("refused k = {k}")))
            } else {
                blocks(d, k)
            }
        };
        let err = KSweep::new(7).run_parallel(&data, &flaky).unwrap_err();
        assert_eq!(err.failed_k(), Some(4));
    }
}
