//! Sparse detector on synthetic sequences

use lars_track::common::rng::SimpleRng;
use lars_track::frame::BoundingBox;
use lars_track::reporter::DebugReporter;
use lars_track::sparse::SolverConfig;
use lars_track::tracker::{RecordSource, TrackRecord, TrackState, TrackerConfig, TrackingController};

use super::helpers::scenes::{block_scene, exhaustive_config, sliding_block, unprojected_config};

fn run(config: TrackerConfig, frames: usize, seed: u64) -> Vec<TrackRecord> {
    let mut rng = SimpleRng::new(seed);
    let mut tracker = TrackingController::initialize(
        &sliding_block(1),
        BoundingBox::new(10.0, 10.0, 10.0, 10.0),
        config,
        &mut rng,
    )
    .unwrap();
    for k in 2..=frames {
        tracker.step(&sliding_block(k), &mut rng).unwrap();
    }
    tracker.results().to_vec()
}

#[test]
fn test_follows_sliding_block() {
    let mut rng = SimpleRng::new(21);
    let mut tracker = TrackingController::initialize(
        &sliding_block(1),
        BoundingBox::new(10.0, 10.0, 10.0, 10.0),
        exhaustive_config(),
        &mut rng,
    )
    .unwrap();
    let mut reporter = DebugReporter::new();

    for k in 2..=8 {
        let report = tracker
            .step_with_reporter(&sliding_block(k), &mut rng, &mut reporter)
            .unwrap();
        assert_eq!(report.state, TrackState::Tracking, "frame {}", k);
        assert_eq!(report.detector_calls, 1, "frame {}", k);
        assert_eq!(report.record.source, RecordSource::Confirmed);

        // block corner is (10 + k - 1, 10), reported one pixel down-right
        let expected = nalgebra::Vector2::new((10 + k) as f64, 11.0);
        assert_eq!(report.record.bbox.position, expected, "frame {}", k);
    }

    assert!(reporter.predictions().is_empty());
    assert_eq!(tracker.results().len(), 8);
    assert_eq!(tracker.frame_index(), 8);
    assert_eq!(tracker.model().positives().ncols(), 200);
}

#[test]
fn test_same_seed_same_track() {
    let config = TrackerConfig {
        solver: SolverConfig {
            compression_ratio: 3.0,
            ..SolverConfig::default()
        },
        ..TrackerConfig::default()
    };
    let a = run(config.clone(), 5, 99);
    let b = run(config, 5, 99);
    assert_eq!(a.len(), 5);
    assert_eq!(a, b);
}

#[test]
fn test_records_are_numbered_consecutively() {
    let records = run(exhaustive_config(), 4, 3);
    let frames: Vec<usize> = records.iter().map(|r| r.frame).collect();
    assert_eq!(frames, vec![1, 2, 3, 4]);
    assert_eq!(records[0].source, RecordSource::Initial);
    assert_eq!(records[0].bbox, BoundingBox::new(10.0, 10.0, 10.0, 10.0));
}

#[test]
fn test_default_stride_follows_within_quantization() {
    let config = unprojected_config();
    let stride = config.detection_stride;
    let records = run(config, 10, 21);

    assert_eq!(records.len(), 10);
    for r in &records {
        // block corner (10 + k - 1, 10), reported one pixel down-right
        let dx = r.bbox.position.x - (10 + r.frame) as f64;
        let dy = r.bbox.position.y - 11.0;
        assert!(dx.abs() <= stride.cols as f64, "frame {}: x {}", r.frame, r.bbox.position.x);
        assert!(dy.abs() <= stride.rows as f64, "frame {}: y {}", r.frame, r.bbox.position.y);
    }
    let confirmed = records.iter().filter(|r| r.source == RecordSource::Confirmed).count();
    assert!(confirmed > 5, "{} of 9 frames confirmed", confirmed);
}

#[test]
fn test_projected_search_survives_sliding_block() {
    for seed in 1..=6 {
        let records = run(TrackerConfig::default(), 12, seed);
        assert_eq!(records.len(), 12, "seed {}", seed);
        assert!(records
            .iter()
            .all(|r| r.bbox.position.iter().all(|v| v.is_finite())));
    }
}

#[test]
fn test_projected_search_survives_stationary_target() {
    let frame = block_scene(50, 50, 20, 20);
    for seed in 1..=10 {
        let mut rng = SimpleRng::new(seed);
        let mut tracker = TrackingController::initialize(
            &frame,
            BoundingBox::new(20.0, 20.0, 10.0, 10.0),
            TrackerConfig::default(),
            &mut rng,
        )
        .unwrap();
        for k in 2..=30 {
            if let Err(e) = tracker.step(&frame, &mut rng) {
                panic!("seed {}: frame {} failed: {}", seed, k, e);
            }
        }
        assert_eq!(tracker.results().len(), 30, "seed {}", seed);
    }
}
