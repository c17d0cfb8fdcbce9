//! K-means: a reference [`Partitioner`] for the k sweep.
//!
//! # The Algorithm (Lloyd, 1982; Arthur & Vassilvitskii, 2007)
//!
//! 1. **Seeding (k-means++)**: pick the first centroid uniformly at random,
//!    then each following centroid with probability proportional to its
//!    squared distance from the nearest centroid chosen so far.
//! 2. **Assignment**: label every point with its nearest centroid.
//! 3. **Update**: move every centroid to the mean of its points.
//! 4. Repeat 2–3 until no centroid moves more than `tol`, or `max_iter`.
//!
//! The whole procedure is restarted `n_init` times and the run with the
//! lowest inertia (within-cluster sum of squares) is kept.
//!
//! ## Partition guarantee
//!
//! A partitioner must hand back exactly `k` non-empty clusters. Plain Lloyd
//! iterations can empty a cluster, so after every assignment step each
//! empty cluster takes the point farthest from its own centroid, drawn from
//! a cluster that still has at least two members. Requests that cannot be
//! satisfied at all (`k == 0`, or `k` above the number of distinct points)
//! fail with [`Error::InvalidClusterCount`] up front.
//!
//! ## Determinism
//!
//! With a seed ([`Kmeans::with_seed`]) the result is a pure function of the
//! input. Without one, seeding draws from the thread-local RNG and
//! [`Partitioner::is_deterministic`] reports `false`.

use super::traits::Partitioner;
use super::util::{nearest_centroid, squared_euclidean};
use crate::error::{Error, Result};
use crate::observation::Observations;
use crate::partition::Partition;
use rand::prelude::*;

/// K-means clustering with k-means++ seeding.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    tol: f64,
    n_init: usize,
    seed: Option<u64>,
}

/// Output of a single [`Kmeans::fit`].
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster label per observation, in `0..k`.
    pub labels: Vec<usize>,
    /// Row-major `k x dim` centroid matrix.
    pub centroids: Vec<f64>,
    /// Centroid dimensionality.
    pub dim: usize,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the kept restart.
    pub iterations: usize,
}

impl KmeansFit {
    /// Centroid of cluster `c`.
    pub fn centroid(&self, c: usize) -> &[f64] {
        &self.centroids[c * self.dim..(c + 1) * self.dim]
    }
}

impl Kmeans {
    /// Create a k-means clusterer for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-6,
            n_init: 3,
            seed: None,
        }
    }

    /// Maximum Lloyd iterations per restart.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Convergence threshold on the largest centroid movement.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Number of independent restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Fix the RNG seed, making results reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configured cluster count.
    pub fn n_clusters(&self) -> usize {
        self.k
    }

    fn check_params(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.n_init == 0 {
            return Err(Error::InvalidParameter {
                name: "n_init",
                message: "must be at least 1",
            });
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Run k-means and return labels, centroids and inertia.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for a zero `max_iter`/`n_init` or a bad `tol`.
    /// - [`Error::InvalidClusterCount`] if `k` is zero or exceeds the number of
    ///   distinct observations.
    pub fn fit(&self, data: &Observations) -> Result<KmeansFit> {
        self.check_params()?;

        let n_distinct = data.n_distinct();
        if self.k == 0 || self.k > n_distinct {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_distinct,
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut best: Option<KmeansFit> = None;
        for _ in 0..self.n_init {
            let fit = self.lloyd(data, &mut rng)?;
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.ok_or_else(|| Error::Other("k-means produced no restart".to_string()))
    }

    /// Fit and return only the labels.
    pub fn fit_predict(&self, data: &Observations) -> Result<Vec<usize>> {
        self.fit(data).map(|f| f.labels)
    }

    fn lloyd<R: Rng>(&self, data: &Observations, rng: &mut R) -> Result<KmeansFit> {
        let n = data.len();
        let dim = data.dim();
        let k = self.k;

        let mut centroids = init_plus_plus(data, k, rng)?;
        let mut labels = vec![0usize; n];
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;

            for (i, point) in data.iter().enumerate() {
                labels[i] = nearest_centroid(point, &centroids, dim).0;
            }
            fill_empty_clusters(data, &mut labels, &centroids, k);

            let updated = centroid_means(data, &labels, k);
            let shift = centroids
                .chunks_exact(dim)
                .zip(updated.chunks_exact(dim))
                .map(|(old, new)| squared_euclidean(old, new))
                .fold(0.0_f64, f64::max);
            centroids = updated;

            if shift <= self.tol * self.tol {
                break;
            }
        }

        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(p, &c)| squared_euclidean(p, &centroids[c * dim..(c + 1) * dim]))
            .sum();

        Ok(KmeansFit {
            labels,
            centroids,
            dim,
            inertia,
            iterations,
        })
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Partitioner for Kmeans {
    /// Runs k-means with this configuration but the requested `k`.
    fn partition(&self, data: &Observations, k: usize) -> Result<Partition> {
        let model = Kmeans { k, ..self.clone() };
        let fit = model.fit(data)?;
        Partition::from_labels(&fit.labels, k)
    }

    fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }
}

/// k-means++ seeding. Requires at least `k` distinct points.
fn init_plus_plus<R: Rng>(data: &Observations, k: usize, rng: &mut R) -> Result<Vec<f64>> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k * data.dim());

    let first = rng.random_range(0..n);
    centroids.extend_from_slice(data.get(first));
    let mut d2: Vec<f64> = data
        .iter()
        .map(|p| squared_euclidean(p, data.get(first)))
        .collect();

    for chosen in 1..k {
        let total: f64 = d2.iter().sum();
        let fallback = d2.iter().rposition(|&w| w > 0.0);
        let Some(fallback) = fallback.filter(|_| total > 0.0) else {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_distinct: chosen,
            });
        };

        let mut target = rng.random::<f64>() * total;
        let mut next = fallback;
        for (i, &w) in d2.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if target < w {
                next = i;
                break;
            }
            target -= w;
        }

        let c = data.get(next);
        centroids.extend_from_slice(c);
        for (d, p) in d2.iter_mut().zip(data.iter()) {
            *d = d.min(squared_euclidean(p, c));
        }
    }

    Ok(centroids)
}

/// Give every empty cluster the point farthest from its centroid, taken from
/// a cluster with at least two members.
fn fill_empty_clusters(data: &Observations, labels: &mut [usize], centroids: &[f64], k: usize) {
    let dim = data.dim();
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = data
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] >= 2)
            .map(|(i, p)| {
                let c = labels[i];
                (i, squared_euclidean(p, &centroids[c * dim..(c + 1) * dim]))
            })
            .fold(None, |acc: Option<(usize, f64)>, (i, d)| match acc {
                Some((_, best)) if best >= d => acc,
                _ => Some((i, d)),
            });

        // n >= k guarantees a donor while any cluster is empty.
        if let Some((i, _)) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
        }
    }
}

fn centroid_means(data: &Observations, labels: &[usize], k: usize) -> Vec<f64> {
    let dim = data.dim();
    let mut sums = vec![0.0; k * dim];
    let mut counts = vec![0usize; k];
    for (p, &c) in data.iter().zip(labels) {
        counts[c] += 1;
        for (s, v) in sums[c * dim..(c + 1) * dim].iter_mut().zip(p) {
            *s += v;
        }
    }
    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            let inv = 1.0 / count as f64;
            for s in &mut sums[c * dim..(c + 1) * dim] {
                *s *= inv;
            }
        }
    }
    sums
}
