//! Per-frame state machine with a scripted detector

use lars_track::common::rng::SimpleRng;
use lars_track::frame::BoundingBox;
use lars_track::reporter::DebugReporter;
use lars_track::tracker::{
    AppearanceModel, RecordSource, SearchScale, TrackState, TrackerConfig, TrackingController,
};
use lars_track::TrackerError;

use super::helpers::scenes::sliding_block;
use super::helpers::scripted::{ScriptedDetector, Step};

fn controller(script: Vec<Step>, rng: &mut SimpleRng) -> TrackingController<ScriptedDetector> {
    let model = AppearanceModel::initialize(
        &sliding_block(1),
        BoundingBox::new(10.0, 10.0, 10.0, 10.0),
        TrackerConfig::default(),
        rng,
    )
    .unwrap();
    TrackingController::new(ScriptedDetector::new(script), model)
}

#[test]
fn test_all_hits_keep_tracking() {
    let mut rng = SimpleRng::new(1);
    let script: Vec<Step> = (2..=6).map(|k| Step::Hit(10 + (k - 1), 10)).collect();
    let mut c = controller(script, &mut rng);

    for k in 2..=6 {
        let report = c.step(&sliding_block(k), &mut rng).unwrap();
        assert_eq!(report.frame_index, k);
        assert_eq!(report.state, TrackState::Tracking);
        assert_eq!(report.detector_calls, 1);
        assert_eq!(report.record.source, RecordSource::Confirmed);
        assert_eq!(c.model().failures(), 0);
    }
    assert_eq!(c.detector().calls, vec![SearchScale::Normal; 5]);
    assert_eq!(c.results().len(), 6);
    assert_eq!(c.results()[0].source, RecordSource::Initial);
}

#[test]
fn test_two_failures_predict_without_third_call() {
    let mut rng = SimpleRng::new(2);
    let mut c = controller(vec![Step::Miss, Step::Miss], &mut rng);
    let mut reporter = DebugReporter::new();

    let report = c
        .step_with_reporter(&sliding_block(2), &mut rng, &mut reporter)
        .unwrap();

    assert_eq!(report.state_before, TrackState::Tracking);
    assert_eq!(report.state, TrackState::Lost);
    assert_eq!(c.model().failures(), 2);
    assert_eq!(report.detector_calls, 2);
    assert_eq!(report.rejections.len(), 2);
    assert_eq!(report.record.source, RecordSource::Predicted);
    assert_eq!(c.detector().calls, vec![SearchScale::Normal, SearchScale::Enlarged]);
    assert_eq!(c.detector().remaining(), 0);

    assert_eq!(reporter.calls_in_frame(2), 2);
    assert_eq!(reporter.predictions().len(), 1);
    assert_eq!(reporter.frames().len(), 1);
}

#[test]
fn test_retry_in_same_frame_recovers() {
    let mut rng = SimpleRng::new(3);
    let mut c = controller(vec![Step::Miss, Step::Hit(11, 10)], &mut rng);

    let report = c.step(&sliding_block(2), &mut rng).unwrap();
    assert_eq!(report.state, TrackState::Tracking);
    assert_eq!(report.detector_calls, 2);
    assert_eq!(report.record.source, RecordSource::Confirmed);
    assert_eq!(report.record.bbox.position, nalgebra::Vector2::new(12.0, 11.0));
    assert_eq!(c.detector().calls, vec![SearchScale::Normal, SearchScale::Enlarged]);
}

#[test]
fn test_lost_frames_make_one_enlarged_attempt() {
    let mut rng = SimpleRng::new(4);
    let script = vec![
        Step::Miss,
        Step::Miss, // frame 2: lost
        Step::Miss, // frame 3: single recovery attempt
        Step::Hit(13, 10), // frame 4: recovered
        Step::Hit(14, 10), // frame 5: normal search again
    ];
    let mut c = controller(script, &mut rng);

    c.step(&sliding_block(2), &mut rng).unwrap();

    let r3 = c.step(&sliding_block(3), &mut rng).unwrap();
    assert_eq!(r3.state_before, TrackState::Lost);
    assert_eq!(r3.detector_calls, 1);
    assert_eq!(c.model().failures(), 3);
    assert_eq!(r3.record.source, RecordSource::Predicted);

    let r4 = c.step(&sliding_block(4), &mut rng).unwrap();
    assert_eq!(r4.detector_calls, 1);
    assert_eq!(r4.state, TrackState::Tracking);
    assert_eq!(c.model().failures(), 0);

    let r5 = c.step(&sliding_block(5), &mut rng).unwrap();
    assert!(r5.is_confirmed());

    assert_eq!(
        c.detector().calls,
        vec![
            SearchScale::Normal,
            SearchScale::Enlarged,
            SearchScale::Enlarged,
            SearchScale::Enlarged,
            SearchScale::Normal,
        ]
    );
}

#[test]
fn test_prediction_extrapolates_last_motion() {
    let mut rng = SimpleRng::new(5);
    let script = vec![Step::Hit(11, 10), Step::Hit(12, 10), Step::Miss, Step::Miss];
    let mut c = controller(script, &mut rng);

    c.step(&sliding_block(2), &mut rng).unwrap();
    c.step(&sliding_block(3), &mut rng).unwrap();
    let lost = c.step(&sliding_block(4), &mut rng).unwrap();

    // reported (12, 11) then (13, 11): one pixel per frame to the right
    let p = lost.record.bbox.position;
    assert!((p.x - 13.3).abs() < 1e-9, "predicted x {}", p.x);
    assert!((p.y - 11.0).abs() < 1e-9, "predicted y {}", p.y);
    assert_eq!(lost.record.bbox.size, nalgebra::Vector2::new(10.0, 10.0));
    // the next search stays on the last confirmed position
    assert_eq!(c.model().history().search_anchor(), nalgebra::Vector2::new(13.0, 11.0));
}

#[test]
fn test_consecutive_losses_extrapolate_from_last_confirmation() {
    let mut rng = SimpleRng::new(7);
    // reported x = 12 then 14 after the initial 10
    let script = vec![
        Step::Hit(11, 10),
        Step::Hit(13, 10),
        Step::Miss,
        Step::Miss,
        Step::Miss,
        Step::Miss,
    ];
    let mut c = controller(script, &mut rng);

    c.step(&sliding_block(2), &mut rng).unwrap();
    c.step(&sliding_block(3), &mut rng).unwrap();

    for k in 4..=6 {
        let report = c.step(&sliding_block(k), &mut rng).unwrap();
        assert_eq!(report.record.source, RecordSource::Predicted);
        let p = report.record.bbox.position;
        assert!((p.x - 14.6).abs() < 1e-9, "frame {}: predicted x {}", k, p.x);
        assert!((p.y - 11.0).abs() < 1e-9, "frame {}: predicted y {}", k, p.y);
        assert_eq!(c.model().history().search_anchor(), nalgebra::Vector2::new(14.0, 11.0));
    }
    assert_eq!(c.model().failures(), 4);
    assert_eq!(c.detector().remaining(), 0);
}

#[test]
fn test_solver_error_aborts_frame() {
    let mut rng = SimpleRng::new(6);
    let mut c = controller(vec![Step::Fail], &mut rng);

    let err = c.step(&sliding_block(2), &mut rng).unwrap_err();
    assert!(matches!(err, TrackerError::Solver(_)));
    assert_eq!(c.results().len(), 1);
    assert_eq!(c.model().failures(), 0);
}

#[test]
fn test_frames_never_start_in_retry() {
    let mut rng = SimpleRng::new(8);
    let script = vec![
        Step::Miss,
        Step::Hit(11, 10), // frame 2
        Step::Miss,
        Step::Miss, // frame 3
        Step::Hit(13, 10), // frame 4
        Step::Miss,
        Step::Hit(14, 10), // frame 5
    ];
    let mut c = controller(script, &mut rng);

    for k in 2..=5 {
        let report = c.step(&sliding_block(k), &mut rng).unwrap();
        assert_ne!(report.state_before, TrackState::Retry, "frame {}", k);
        assert_ne!(report.state, TrackState::Retry, "frame {}", k);
    }
    assert_eq!(c.detector().remaining(), 0);
}
