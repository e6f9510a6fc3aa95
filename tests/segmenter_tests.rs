mod common;

use common::{center, clean_trace, dwell, noisy_trace, qwerty, EventBuilder};
use gazetype::config::SegmenterParams;
use gazetype::geometry::Point;
use gazetype::signal::{decorate_with_deviation, sliding_mean_filter, KeyEvent, SignalSegmenter};

fn alphas(events: &[KeyEvent]) -> String {
    events.iter().map(|e| e.alpha).collect()
}

// --- DETECTION ---

#[test]
fn test_clean_trace_segments_into_letters() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let trace = clean_trace("DOG");
    assert_eq!(trace.len(), 72);

    let events = seg.segment(&trace);
    assert_eq!(
        events,
        vec![
            KeyEvent::new('D', center('D'), 15),
            KeyEvent::new('O', center('O'), 15),
            KeyEvent::new('G', center('G'), 13),
        ]
    );
}

#[test]
fn test_jittered_trace_keeps_letters() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    for seed in [1, 2, 3, 42] {
        let events = seg.segment(&noisy_trace("DOG", 3, seed));
        assert_eq!(alphas(&events), "DOG", "seed {}", seed);
    }
}

#[test]
fn test_doubled_letter_is_a_single_dwell() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let events = seg.segment(&clean_trace("BOOK"));
    assert_eq!(alphas(&events), "BOK");
}

#[test]
fn test_retrigger_on_same_key_is_dropped() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());

    let mut stream = dwell(center('D'), 20);
    stream.push(Point::new(320, 230)); // glance off the keys
    stream.extend(dwell(center('D'), 20));

    let events = seg.detect(&stream);
    assert_eq!(events, vec![KeyEvent::new('D', center('D'), 15)]);
}

#[test]
fn test_insufficient_data_yields_nothing() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());

    assert!(seg.segment(&[]).is_empty());
    assert!(seg.segment(&dwell(center('D'), 11)).is_empty());
    // the space bar is outside the active region
    assert!(seg.segment(&dwell(Point::new(320, 230), 200)).is_empty());
}

#[test]
fn test_minimum_stream_produces_one_event() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let stream = dwell(center('D'), 12);

    assert!(seg.sufficient_data(&stream));
    assert_eq!(seg.segment(&stream), vec![KeyEvent::new('D', center('D'), 5)]);
}

#[test]
fn test_invalid_params_disable_segmentation() {
    let geom = qwerty();
    let params = SegmenterParams {
        trigger_threshold: 0,
        ..Default::default()
    };
    let seg = SignalSegmenter::new(&geom, params);
    assert!(seg.segment(&clean_trace("DOG")).is_empty());
}

#[test]
fn test_smoothing_keeps_letters() {
    let geom = qwerty();
    let params = SegmenterParams {
        smoothing_window: 2,
        ..Default::default()
    };
    let seg = SignalSegmenter::new(&geom, params);
    assert_eq!(alphas(&seg.segment(&clean_trace("DOG"))), "DOG");
}

// --- MERGE ---

#[test]
fn test_weak_neighbor_is_absorbed_by_stronger_event() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let events = vec![
        EventBuilder::on('D').build(),
        EventBuilder::on('F').at(200, 110).ticks(2).build(),
        EventBuilder::on('O').build(),
    ];

    let merged = seg.merge(&events);
    assert_eq!(alphas(&merged), "DO");
    assert_eq!(merged[0].ticks, 17);
    assert_eq!(merged[0].point, center('D'));
    assert_eq!(merged[1].ticks, 15);
}

#[test]
fn test_merge_of_final_pair_keeps_survivor_only() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let events = vec![
        EventBuilder::on('O').build(),
        EventBuilder::on('D').build(),
        EventBuilder::on('F').at(200, 110).ticks(3).build(),
    ];

    let merged = seg.merge(&events);
    assert_eq!(alphas(&merged), "OD");
    assert_eq!(merged[1].ticks, 18);
}

#[test]
fn test_merge_is_a_single_pass() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let events = vec![
        EventBuilder::on('S').ticks(3).build(),
        EventBuilder::on('D').at(140, 110).ticks(3).build(),
        EventBuilder::on('F').at(170, 110).ticks(3).build(),
    ];

    // S folds into D; the survivor is not compared with F again
    let merged = seg.merge(&events);
    assert_eq!(alphas(&merged), "DF");
    assert_eq!(merged[0].ticks, 6);
    assert_eq!(merged[1].ticks, 3);
}

#[test]
fn test_merge_never_leaves_repeated_alphas() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let events = vec![
        EventBuilder::on('D').ticks(10).build(),
        EventBuilder::on('F').at(200, 110).ticks(2).build(),
        EventBuilder::on('D').at(175, 112).ticks(8).build(),
    ];

    let merged = seg.merge(&events);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].alpha, 'D');
    assert_eq!(merged[0].ticks, 20);
}

#[test]
fn test_strong_close_events_stay_separate() {
    let geom = qwerty();
    let seg = SignalSegmenter::new(&geom, SegmenterParams::default());
    let d = EventBuilder::on('D').build();
    let f = EventBuilder::on('F').at(200, 110).ticks(5).build();
    let far_weak = EventBuilder::on('O').ticks(1).build();

    assert!(seg.has_min_separation(&d, &f));
    assert!(seg.has_min_separation(&d, &far_weak));
    assert!(!seg.has_min_separation(&d, &EventBuilder::on('F').at(200, 110).ticks(4).build()));
    assert_eq!(seg.merge(&[d, f]).len(), 2);
}

// --- FILTERS ---

#[test]
fn test_sliding_mean_averages_complete_frames() {
    let stream: Vec<Point> = (0..5).map(|i| Point::new(2 * i, 2 * i)).collect();
    assert_eq!(
        sliding_mean_filter(&stream, 2),
        vec![Point::new(1, 1), Point::new(5, 5)]
    );
    assert_eq!(sliding_mean_filter(&stream, 1), stream);
    assert!(sliding_mean_filter(&stream, 6).is_empty());
}

#[test]
fn test_sliding_mean_drops_a_full_final_frame() {
    let stream: Vec<Point> = (0..4).map(|i| Point::new(2 * i, 2 * i)).collect();
    assert_eq!(sliding_mean_filter(&stream, 2), vec![Point::new(1, 1)]);
    assert!(sliding_mean_filter(&stream, 4).is_empty());
    assert_eq!(sliding_mean_filter(&stream, 3), vec![Point::new(2, 2)]);
}

#[test]
fn test_deviation_uses_trailing_window() {
    let stream = vec![Point::new(0, 0), Point::new(2, 0), Point::new(4, 0)];
    let data = decorate_with_deviation(&stream, 3);

    assert_eq!(data.len(), 3);
    assert_eq!(data[0].xdev, 0.0);
    assert_eq!(data[1].xdev, 1.0);
    assert!((data[2].xdev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    assert!(data.iter().all(|d| d.ydev == 0.0));
    assert_eq!(data[2].point, Point::new(4, 0));
}
