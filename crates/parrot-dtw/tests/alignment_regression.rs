//! Alignment regression tests for parrot-dtw.
//!
//! Reference distances and paths are hardcoded so that changes to the
//! recurrence or the traceback tie-breaking are caught.

use parrot_dtw::{AlignError, Aligner, Metric, Move, Sequence, WarpingStep};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scalars(values: &[f64]) -> Sequence {
    Sequence::from_scalars(values.to_vec()).expect("valid test sequence")
}

fn frames(values: &[&[f64]]) -> Sequence {
    Sequence::from_frames(values).expect("valid test sequence")
}

fn random_sequence(rng: &mut ChaCha8Rng, max_len: usize, dim: usize) -> Sequence {
    let len = rng.gen_range(1..=max_len);
    let values: Vec<f64> = (0..len * dim).map(|_| rng.gen_range(-3.0..3.0)).collect();
    Sequence::from_flat(values, dim).expect("random values are finite")
}

// ---------------------------------------------------------------------------
// a) known distances and paths
// ---------------------------------------------------------------------------

#[test]
fn distances_and_paths_match_known_values() {
    let cases: Vec<(Sequence, Sequence, f64, Vec<(usize, usize)>)> = vec![
        // constant offset
        (scalars(&[0.0, 0.0, 0.0]), scalars(&[1.0, 1.0, 1.0]), 3.0, vec![(0, 0), (1, 1), (2, 2)]),
        // single peak
        (scalars(&[0.0, 1.0, 0.0]), scalars(&[0.0, 0.0, 0.0]), 1.0, vec![(0, 0), (1, 1), (2, 2)]),
        // reversed
        (scalars(&[1.0, 2.0, 3.0]), scalars(&[3.0, 2.0, 1.0]), 4.0, vec![(0, 0), (1, 1), (2, 2)]),
        // alternating, out of phase
        (
            scalars(&[0.0, 5.0, 0.0, 5.0]),
            scalars(&[5.0, 0.0, 5.0, 0.0]),
            10.0,
            vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 3)],
        ),
        // shifted peak
        (scalars(&[0.0, 0.0, 1.0]), scalars(&[1.0, 0.0, 0.0]), 2.0, vec![(0, 0), (1, 1), (2, 2)]),
        // late ramp
        (
            scalars(&[0.0, 1.0, 2.0, 3.0, 4.0]),
            scalars(&[0.0, 0.0, 0.0, 0.0, 4.0]),
            4.0,
            vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 4), (4, 4)],
        ),
        // tiny perturbation
        (
            scalars(&[10.0, 10.0, 10.0]),
            scalars(&[10.1, 9.9, 10.0]),
            0.2,
            vec![(0, 0), (1, 1), (2, 2)],
        ),
        // two-dimensional frames, 3-4-5 triangle steps
        (
            frames(&[&[0.0, 0.0], &[3.0, 4.0], &[6.0, 8.0]]),
            frames(&[&[0.0, 0.0], &[6.0, 8.0]]),
            5.0,
            vec![(0, 0), (1, 0), (2, 1)],
        ),
        // two-dimensional frames, unequal lengths
        (
            frames(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]),
            frames(&[&[1.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[0.0, 0.0]]),
            2.0 + 2.0_f64.sqrt(),
            vec![(0, 0), (1, 1), (2, 2), (2, 3)],
        ),
    ];

    let aligner = Aligner::euclidean();
    for (index, (a, b, expected_distance, expected_path)) in cases.iter().enumerate() {
        let alignment = aligner.align(a.as_view(), b.as_view()).expect("valid pair");
        let distance = alignment.distance().value();
        assert!(
            (distance - expected_distance).abs() < 1e-10,
            "case {index}: got {distance:.15}, expected {expected_distance:.15}"
        );
        assert_eq!(&alignment.path().to_pairs(), expected_path, "case {index}: path differs");
    }
}

// ---------------------------------------------------------------------------
// b) full cumulative matrix of the reference scalar scenario
// ---------------------------------------------------------------------------

#[test]
fn reference_scenario_cumulative_matrix() {
    let a = scalars(&[4.0, 3.0, 7.0, 0.0, 2.0, 6.0, 5.0]);
    let b = scalars(&[3.0, 7.0, 1.0, 6.0, 1.0, 5.0, 4.0, 4.0]);
    let alignment = Aligner::euclidean().align(a.as_view(), b.as_view()).unwrap();

    let expected: Vec<Vec<f64>> = vec![
        vec![1.0, 4.0, 7.0, 9.0, 12.0, 13.0, 13.0, 13.0],
        vec![1.0, 5.0, 6.0, 9.0, 11.0, 13.0, 14.0, 14.0],
        vec![5.0, 1.0, 7.0, 7.0, 13.0, 13.0, 16.0, 17.0],
        vec![8.0, 8.0, 2.0, 8.0, 8.0, 13.0, 17.0, 20.0],
        vec![9.0, 13.0, 3.0, 6.0, 7.0, 10.0, 12.0, 14.0],
        vec![12.0, 10.0, 8.0, 3.0, 8.0, 8.0, 10.0, 12.0],
        vec![14.0, 12.0, 12.0, 4.0, 7.0, 7.0, 8.0, 9.0],
    ];

    assert_eq!(alignment.cost_matrix().to_rows(), expected);
    assert_eq!(alignment.distance().value(), 9.0);
    assert_eq!(
        alignment.path().to_pairs(),
        vec![(0, 0), (1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (6, 4), (6, 5), (6, 6), (6, 7)]
    );
}

// ---------------------------------------------------------------------------
// c) structural properties on random input
// ---------------------------------------------------------------------------

/// Every path starts at (0,0), ends at (m-1,n-1), and advances by exactly one
/// diagonal, vertical, or horizontal step; distance is non-negative and equal
/// to the sum of local costs along the path.
#[test]
fn random_alignments_produce_valid_paths() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let aligner = Aligner::euclidean();

    for round in 0..200 {
        let dim = rng.gen_range(1..=4);
        let a = random_sequence(&mut rng, 12, dim);
        let b = random_sequence(&mut rng, 12, dim);
        let alignment = aligner.align(a.as_view(), b.as_view()).unwrap();
        let path = alignment.path();

        assert_eq!(path.first(), Some(WarpingStep::new(0, 0)), "round {round}");
        assert_eq!(
            path.last(),
            Some(WarpingStep::new(a.len() - 1, b.len() - 1)),
            "round {round}"
        );
        assert!(
            path.moves().all(|m| m.is_some()),
            "round {round}: path contains an invalid step"
        );
        assert!(path.len() >= a.len().max(b.len()));
        assert!(path.len() <= a.len() + b.len() - 1);

        let distance = alignment.distance().value();
        assert!(distance >= 0.0, "round {round}: negative distance {distance}");

        let local = aligner.local_costs(a.as_view(), b.as_view()).unwrap();
        let along_path: f64 = path.steps().iter().map(|s| local.get(s.i, s.j)).sum();
        assert!(
            (along_path - distance).abs() < 1e-9,
            "round {round}: path cost {along_path} != distance {distance}"
        );
    }
}

#[test]
fn random_self_alignment_is_zero_and_diagonal() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let aligner = Aligner::euclidean();

    for _ in 0..50 {
        let s = random_sequence(&mut rng, 20, 3);
        let alignment = aligner.align(s.as_view(), s.as_view()).unwrap();
        assert_eq!(alignment.distance().value(), 0.0);
        assert!(alignment.path().moves().all(|m| m == Some(Move::Diagonal)));
        assert_eq!(alignment.path().len(), s.len());
    }
}

#[test]
fn random_distance_is_symmetric_and_matches_rolling() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    for metric in [Metric::Euclidean, Metric::Manhattan, Metric::SquaredEuclidean] {
        let aligner = Aligner::new(metric);
        for _ in 0..50 {
            let a = random_sequence(&mut rng, 15, 2);
            let b = random_sequence(&mut rng, 15, 2);
            let ab = aligner.align(a.as_view(), b.as_view()).unwrap().distance();
            let ba = aligner.align(b.as_view(), a.as_view()).unwrap().distance();
            let rolling = aligner.distance(a.as_view(), b.as_view()).unwrap();
            assert_eq!(ab, ba, "{metric}: asymmetric distance");
            assert_eq!(ab, rolling, "{metric}: rolling distance differs");
        }
    }
}

// ---------------------------------------------------------------------------
// d) error reporting
// ---------------------------------------------------------------------------

#[test]
fn zero_length_and_mismatched_inputs_fail() {
    let aligner = Aligner::euclidean();
    let empty: Vec<Vec<f64>> = Vec::new();

    assert_eq!(
        aligner.align_frames(&empty, &[vec![1.0, 2.0]]).unwrap_err(),
        AlignError::EmptySequence
    );
    assert_eq!(
        aligner
            .align_frames(&[vec![1.0, 2.0]], &[vec![1.0, 2.0, 3.0]])
            .unwrap_err(),
        AlignError::DimensionMismatch { left: 2, right: 3 }
    );
}
