//! Estimate the number of clusters in a small 2D dataset.
//!
//! Run with `RUST_LOG=debug` to see per-k scoring.

use ksweep::{silhouette_samples, KSweep, Kmeans, Observations, Partitioner};
use tracing_subscriber::EnvFilter;

fn main() -> ksweep::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated clusters in 2D.
    let data = Observations::new(vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
    ])?;

    let kmeans = Kmeans::default().with_seed(42);
    let est = KSweep::new(8).run_parallel(&data, &kmeans)?;

    println!("=== Silhouette sweep (k = 2..=8) ===");
    println!("{est}");
    println!("reproducible: {}", est.reproducible);

    // Per-point view of the selected k.
    let partition = kmeans.partition(&data, est.best_k())?;
    println!("\n=== Points at k = {} ===", est.best_k());
    for s in silhouette_samples(&data, &partition)? {
        let p = data.get(s.index);
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => cluster {}  a={:.3} b={:.3} s={:.3}",
            s.index, p[0], p[1], s.cluster, s.cohesion, s.separation, s.value
        );
    }

    Ok(())
}
