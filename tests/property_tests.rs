use ksweep::cluster::{Kmeans, Partitioner};
use ksweep::{select_best, silhouette_samples, KScore, Observations, Partition};
use proptest::prelude::*;

fn observations(rows: Vec<Vec<f64>>) -> Observations {
    Observations::new(rows).unwrap()
}

proptest! {
    #[test]
    fn prop_silhouette_values_bounded(
        rows in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 2), 2..25),
        seed in 0u64..1000,
    ) {
        let data = observations(rows);
        let n = data.len();
        let k = 2 + (seed as usize) % (n - 1).max(1);
        let k = k.min(n);
        // Round-robin labels: always k non-empty clusters.
        let labels: Vec<usize> = (0..n).map(|i| (i + seed as usize) % k).collect();
        let partition = Partition::from_labels(&labels, k).unwrap();

        let samples = silhouette_samples(&data, &partition).unwrap();
        prop_assert_eq!(samples.len(), n);
        for s in &samples {
            prop_assert!(s.value.is_finite());
            prop_assert!(s.value >= -1.0 - 1e-9 && s.value <= 1.0 + 1e-9, "value {}", s.value);
            prop_assert!(s.neighbor != s.cluster);
            if partition.cluster(s.cluster).len() == 1 {
                prop_assert_eq!(s.value, 0.0);
            }
        }
    }

    #[test]
    fn prop_kmeans_partition_covers_input(
        rows in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 3), 2..30),
        k in 2usize..6,
        seed in 0u64..100,
    ) {
        let data = observations(rows);
        prop_assume!(k <= data.n_distinct());

        let partition = Kmeans::default().with_seed(seed).partition(&data, k).unwrap();
        prop_assert_eq!(partition.k(), k);
        prop_assert!(partition.validate(data.len(), k).is_ok());

        let mut members: Vec<usize> = partition.clusters().iter().flatten().copied().collect();
        members.sort_unstable();
        prop_assert_eq!(members, (0..data.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_tie_break_is_order_independent(
        mut raw in prop::collection::vec((2usize..20, 0u8..4), 1..12),
    ) {
        // Scores drawn from a tiny set so ties are common.
        raw.sort_by_key(|(k, _)| *k);
        raw.dedup_by_key(|(k, _)| *k);
        let scores: Vec<KScore> = raw
            .iter()
            .map(|&(k, s)| KScore { k, score: f64::from(s) * 0.25 })
            .collect();

        let best = select_best(&scores, 1e-9).unwrap();
        let max = scores.iter().map(|s| s.score).fold(f64::NEG_INFINITY, f64::max);
        let lowest_max_k = scores.iter().find(|s| s.score == max).unwrap().k;
        prop_assert_eq!(best.k, lowest_max_k);
        prop_assert_eq!(best.score, max);
    }
}
