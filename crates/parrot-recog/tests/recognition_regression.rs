//! Recognition regression tests for parrot-recog.
//!
//! A deterministic synthetic digit set checks that time-warped, noisy
//! queries are matched to the right template, and that the parallel scan and
//! a persisted library both give identical answers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

use parrot_dtw::{AlignError, Metric, Sequence};
use parrot_recog::{Label, RecogError, Recognition, RecognizerConfig, TemplateLibrary};

const DIGITS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic utterances
// ---------------------------------------------------------------------------

/// Two-dimensional trajectory for class `k`, sampled at `n_frames` points
/// spread over the same 30-step time axis.
///
/// Classes sit 2.0 apart on both axes; the shape has amplitude 0.3, so frames
/// of different classes are always more than 1.9 apart.
fn utterance(k: usize, n_frames: usize, noise: f64, rng: &mut ChaCha8Rng) -> Sequence {
    let level = 2.0 * k as f64;
    let frames: Vec<Vec<f64>> = (0..n_frames)
        .map(|i| {
            let t = i as f64 * 30.0 / n_frames as f64;
            let jitter = |rng: &mut ChaCha8Rng| {
                if noise > 0.0 {
                    rng.gen_range(-noise..noise)
                } else {
                    0.0
                }
            };
            vec![
                level + 0.3 * (0.3 * t).sin() + jitter(rng),
                level + 0.3 * (0.3 * t).cos() + jitter(rng),
            ]
        })
        .collect();
    Sequence::new(frames).expect("synthetic frames are finite")
}

fn digit_library(rng: &mut ChaCha8Rng) -> TemplateLibrary {
    DIGITS
        .iter()
        .enumerate()
        .map(|(k, &name)| (name, Some(utterance(k, 30, 0.0, rng))))
        .collect()
}

fn digit_labels() -> Vec<Label> {
    DIGITS.iter().map(|&d| Label::from(d)).collect()
}

fn scalar(v: f64) -> Sequence {
    Sequence::from_scalars(vec![v]).expect("finite scalar")
}

// ---------------------------------------------------------------------------
// a) reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn nearest_of_two_single_frame_templates() {
    let library: TemplateLibrary = vec![("a", Some(scalar(0.0))), ("b", Some(scalar(10.0)))]
        .into_iter()
        .collect();
    let query = scalar(0.1);

    let result = RecognizerConfig::new()
        .build()
        .recognize(&library, Some(query.as_view()))
        .unwrap();
    assert_eq!(result.label().map(Label::as_str), Some("a"));
    assert!((result.distance().value() - 0.1).abs() < 1e-12);
}

#[test]
fn exact_copy_of_a_template_has_zero_distance() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let library = digit_library(&mut rng);
    let query = library.template("seven").unwrap().clone();

    let result = RecognizerConfig::new()
        .build()
        .recognize_sequence(&library, Some(&query))
        .unwrap();
    assert_eq!(result.label().map(Label::as_str), Some("seven"));
    assert_eq!(result.distance().value(), 0.0);
}

#[test]
fn nothing_to_compare_is_unrecognized() {
    let all_absent: TemplateLibrary = DIGITS.iter().map(|&d| (d, None)).collect();
    let query = scalar(1.0);
    let recognizer = RecognizerConfig::new().build();

    assert_eq!(
        recognizer.recognize(&all_absent, Some(query.as_view())).unwrap(),
        Recognition::unrecognized()
    );
    assert_eq!(
        recognizer
            .recognize(&TemplateLibrary::new(), Some(query.as_view()))
            .unwrap(),
        Recognition::unrecognized()
    );

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(
        recognizer.recognize(&digit_library(&mut rng), None).unwrap(),
        Recognition::unrecognized()
    );
}

#[test]
fn mixed_dimensions_abort_recognition() {
    let library: TemplateLibrary = vec![
        ("flat", Some(scalar(0.0))),
        ("wide", Some(Sequence::new(vec![vec![0.0, 1.0, 2.0]]).unwrap())),
    ]
    .into_iter()
    .collect();
    let query = scalar(0.0);

    let err = RecognizerConfig::new()
        .build()
        .recognize(&library, Some(query.as_view()))
        .unwrap_err();
    match err {
        RecogError::Template { label, source } => {
            assert_eq!(label, "wide");
            assert_eq!(source, AlignError::DimensionMismatch { left: 1, right: 3 });
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// b) warped, noisy queries
// ---------------------------------------------------------------------------

/// Every class is recognized when queries are stretched or compressed in
/// time and perturbed by at most 0.1 per component.
#[test]
fn warped_queries_are_recognized() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let library = digit_library(&mut rng);

    let test_sets: Vec<TemplateLibrary> = [24usize, 36, 45]
        .iter()
        .map(|&n_frames| {
            DIGITS
                .iter()
                .enumerate()
                .map(|(k, &name)| (name, Some(utterance(k, n_frames, 0.1, &mut rng))))
                .collect()
        })
        .collect();

    for metric in [Metric::Euclidean, Metric::Manhattan] {
        let eval = RecognizerConfig::new()
            .with_metric(metric)
            .build()
            .evaluate(&library, &test_sets, &digit_labels())
            .unwrap();
        assert_eq!(eval.n_tested, 30, "{metric}");
        assert_eq!(eval.n_correct, 30, "{metric}");
        assert!((eval.accuracy - 1.0).abs() < f64::EPSILON, "{metric}");
        for m in eval.confusion.class_metrics() {
            assert_eq!(m.support, 3, "{metric}: {}", m.label);
        }
    }
}

#[test]
fn missing_templates_and_queries_are_skipped() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut library = digit_library(&mut rng);
    library.insert_missing("four");

    let test_set: TemplateLibrary = DIGITS
        .iter()
        .enumerate()
        .map(|(k, &name)| {
            let query = (k % 3 != 0).then(|| utterance(k, 33, 0.05, &mut rng));
            (name, query)
        })
        .collect();

    let eval = RecognizerConfig::new()
        .build()
        .evaluate(&library, &[test_set], &digit_labels())
        .unwrap();

    // Queries for zero, three, six, nine are absent; the "four" query has no
    // template and lands on a neighbouring class.
    assert_eq!(eval.n_skipped, 4);
    assert_eq!(eval.n_tested, 6);
    assert_eq!(eval.n_correct, 5);
    assert_eq!(eval.confusion.count("four", "four"), 0);
    assert_eq!(
        eval.confusion.count("four", "three") + eval.confusion.count("four", "five"),
        1
    );
}

// ---------------------------------------------------------------------------
// c) parallel scan and persistence
// ---------------------------------------------------------------------------

#[test]
fn parallel_scan_matches_sequential_scan() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let sequential = RecognizerConfig::new().build();
    let parallel = RecognizerConfig::new().with_parallel(true).build();

    for _ in 0..25 {
        // Coarse values make exact ties between templates likely.
        let library: TemplateLibrary = (0..8)
            .map(|k| {
                let len = rng.gen_range(1..6);
                let values: Vec<f64> = (0..len).map(|_| f64::from(rng.gen_range(0..3u8))).collect();
                (format!("t{k}"), Some(Sequence::from_scalars(values).unwrap()))
            })
            .collect();
        let values: Vec<f64> = (0..4).map(|_| f64::from(rng.gen_range(0..3u8))).collect();
        let query = Sequence::from_scalars(values).unwrap();

        assert_eq!(
            sequential.recognize(&library, Some(query.as_view())).unwrap(),
            parallel.recognize(&library, Some(query.as_view())).unwrap()
        );
        assert_eq!(
            sequential.rank(&library, query.as_view()).unwrap(),
            parallel.rank(&library, query.as_view()).unwrap()
        );
    }
}

#[test]
fn saved_library_recognizes_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("digits.bin");
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut library = digit_library(&mut rng);
    library.insert_missing("ten");
    library.save(&path).unwrap();
    let loaded = TemplateLibrary::load(&path).unwrap();
    assert_eq!(loaded, library);

    let recognizer = RecognizerConfig::new().build();
    for k in 0..DIGITS.len() {
        let query = utterance(k, 27, 0.1, &mut rng);
        assert_eq!(
            recognizer.recognize(&library, Some(query.as_view())).unwrap(),
            recognizer.recognize(&loaded, Some(query.as_view())).unwrap()
        );
    }
}
