//! Exemplar-bank and history invariants over long runs

use lars_track::common::rng::SimpleRng;
use lars_track::frame::{BoundingBox, Window};
use lars_track::tracker::{AppearanceModel, TrackerConfig, TrackingController};

use super::helpers::scenes::block_scene;
use super::helpers::scripted::{ScriptedDetector, Step};

#[test]
fn test_banks_stay_bounded_over_many_confirmations() {
    let mut rng = SimpleRng::new(11);
    let first = block_scene(80, 80, 30, 30);
    let model = AppearanceModel::initialize(
        &first,
        BoundingBox::new(30.0, 30.0, 10.0, 10.0),
        TrackerConfig::default(),
        &mut rng,
    )
    .unwrap();

    let frames = 130;
    let script: Vec<Step> = (0..frames).map(|_| Step::Hit(30, 30)).collect();
    let mut c = TrackingController::new(ScriptedDetector::new(script), model);

    let mut negatives = c.model().negatives().ncols();
    for k in 0..frames {
        let frame = block_scene(80, 80, 30, 30);
        c.step(&frame, &mut rng).unwrap();

        let m = c.model();
        assert_eq!(m.positives().ncols(), 200, "frame {}", k + 2);
        assert!(m.negatives().ncols() >= negatives);
        assert!(m.negatives().ncols() <= 400);
        assert_eq!(m.history().positions().len(), 200);
        assert!(m.history().predicted().len() <= 200);
        negatives = m.negatives().ncols();
    }
    assert_eq!(negatives, 400);
    // two seeded entries plus one per confirmation
    assert_eq!(c.model().history().predicted().len(), 132);
}

#[test]
fn test_newest_batch_follows_confirmed_patch() {
    let mut rng = SimpleRng::new(12);
    let first = block_scene(60, 60, 20, 20);
    let model = AppearanceModel::initialize(
        &first,
        BoundingBox::new(20.0, 20.0, 10.0, 10.0),
        TrackerConfig::default(),
        &mut rng,
    )
    .unwrap();
    let oldest = model.positives().column(199).into_owned();
    let mut c = TrackingController::new(ScriptedDetector::new(vec![Step::Hit(24, 21)]), model);

    let frame = block_scene(60, 60, 24, 21);
    c.step(&frame, &mut rng).unwrap();

    let patch = frame.patch(&Window::new(24, 21, 10, 10)).unwrap();
    let batch = c.model().newest_batch();
    assert_eq!(batch.ncols(), 10);
    assert_eq!(batch.column(0).into_owned(), patch);
    for j in 1..10 {
        assert_ne!(batch.column(j).into_owned(), patch);
        assert!((batch.column(j) - &patch).amax() < 10.0);
    }
    assert_eq!(c.model().positives().column(0).into_owned(), patch);
    // the oldest batch was shifted out
    assert!((0..200).all(|j| c.model().positives().column(j) != oldest));
}
