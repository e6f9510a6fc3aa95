#![allow(dead_code)] // not every test binary uses every helper

use gazetype::config::Config;
use gazetype::geometry::{KeyboardGeometry, Point};
use gazetype::layouts::KnownLayout;
use gazetype::signal::KeyEvent;
use gazetype::synth::TraceSynthesizer;
use gazetype::vocab::Vocabulary;
use gazetype::{EngineBuildParams, GazeEngine};

pub fn qwerty() -> KeyboardGeometry {
    KeyboardGeometry::standard(KnownLayout::Qwerty)
}

pub fn center(c: char) -> Point {
    qwerty().key_center(c).unwrap()
}

/// Builder for KeyEvent to keep merge tests readable
pub struct EventBuilder {
    event: KeyEvent,
}

impl EventBuilder {
    /// Event sitting exactly on the key center.
    pub fn on(alpha: char) -> Self {
        Self {
            event: KeyEvent::new(alpha, center(alpha), 15),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.event.point = Point::new(x, y);
        self
    }

    pub fn ticks(mut self, ticks: usize) -> Self {
        self.event.ticks = ticks;
        self
    }

    pub fn build(self) -> KeyEvent {
        self.event
    }
}

/// One event per letter on the exact key centers, doubled letters collapsed
/// the way the segmenter reports them.
pub fn exact_events(word: &str) -> Vec<KeyEvent> {
    let mut events: Vec<KeyEvent> = Vec::new();
    for c in word.chars() {
        if events.last().map(|e| e.alpha) != Some(c) {
            events.push(EventBuilder::on(c).build());
        }
    }
    events
}

pub fn centers(word: &str) -> Vec<Point> {
    qwerty().word_to_point_sequence(word).unwrap()
}

pub fn dwell(p: Point, n: usize) -> Vec<Point> {
    vec![p; n]
}

/// Noise-free synthetic stream: 20 samples per key, 6 between keys.
pub fn clean_trace(word: &str) -> Vec<Point> {
    TraceSynthesizer::default().trace(&qwerty(), word).unwrap()
}

pub fn noisy_trace(word: &str, jitter: i32, seed: u64) -> Vec<Point> {
    TraceSynthesizer::builder()
        .jitter(jitter)
        .seed(seed)
        .build()
        .trace(&qwerty(), word)
        .unwrap()
}

pub fn vocab(words: &[&str]) -> Vocabulary {
    words.iter().collect()
}

pub fn sequential_config() -> Config {
    let mut config = Config::default();
    config.ranking.sequential = true;
    config
}

pub fn engine(words: &[&str]) -> GazeEngine {
    engine_with(words, sequential_config())
}

pub fn engine_with(words: &[&str], config: Config) -> GazeEngine {
    EngineBuildParams::builder()
        .geometry(qwerty())
        .vocabulary(vocab(words))
        .config(config)
        .build()
        .build_engine()
        .unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {} but got {}",
        expected,
        actual
    );
}
