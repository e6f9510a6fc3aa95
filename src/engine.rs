use crate::align::{DpMatrix, HeuristicAligner, OptimalAligner};
use crate::config::Config;
use crate::error::GtResult;
use crate::geometry::{KeyboardGeometry, LineSegment, Point};
use crate::layouts::KnownLayout;
use crate::loader::{load_key_coordinates, load_vocabulary};
use crate::ranking::ScoredResult;
use crate::signal::{decorate_with_deviation, KeyEvent, SignalDatum, SignalSegmenter};
use crate::vocab::Vocabulary;
use std::path::Path;
use tracing::info;
use typed_builder::TypedBuilder;

/// Scratch table preallocated for typical streams and words.
const INITIAL_ROWS: usize = 1000;
const INITIAL_COLS: usize = 32;

#[derive(TypedBuilder)]
pub struct EngineBuildParams {
    #[builder(default)]
    pub geometry: KeyboardGeometry,
    pub vocabulary: Vocabulary,
    #[builder(default)]
    pub config: Config,
}

impl EngineBuildParams {
    /// Loads the vocabulary and, when given, a coordinate file; otherwise the
    /// built-in QWERTY centers are used.
    pub fn load_from_disk<P1: AsRef<Path>, P2: AsRef<Path>>(
        keymap: Option<P1>,
        vocab_path: P2,
        config: Option<Config>,
    ) -> GtResult<GazeEngine> {
        let geometry = match keymap {
            Some(path) => {
                let centers = load_key_coordinates(path)?;
                KeyboardGeometry::from_centers(KnownLayout::Qwerty, &centers)?
            }
            None => KeyboardGeometry::standard(KnownLayout::Qwerty),
        };
        let vocabulary = load_vocabulary(vocab_path)?;

        EngineBuildParams::builder()
            .geometry(geometry)
            .vocabulary(vocabulary)
            .config(config.unwrap_or_default())
            .build()
            .build_engine()
    }

    pub fn build_engine(self) -> GtResult<GazeEngine> {
        self.config.segmenter.validate()?;

        let cols = (self.vocabulary.longest_word() + 2).max(INITIAL_COLS);
        info!(
            "Engine ready: {} words, {} keys, radius {:.1}",
            self.vocabulary.len(),
            self.geometry.keys().count(),
            self.geometry.min_inter_key_radius()
        );

        Ok(GazeEngine {
            geometry: self.geometry,
            vocabulary: self.vocabulary,
            config: self.config,
            scratch: DpMatrix::with_capacity(INITIAL_ROWS, cols),
        })
    }
}

/// Geometry, vocabulary and configuration behind every public operation.
pub struct GazeEngine {
    geometry: KeyboardGeometry,
    vocabulary: Vocabulary,
    config: Config,
    scratch: DpMatrix,
}

impl GazeEngine {
    pub fn geometry(&self) -> &KeyboardGeometry {
        &self.geometry
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn segmenter(&self) -> SignalSegmenter<'_> {
        SignalSegmenter::new(&self.geometry, self.config.segmenter.clone())
    }

    pub fn heuristic(&self) -> HeuristicAligner<'_> {
        HeuristicAligner::new(&self.geometry, self.config.ranking.clone())
    }

    pub fn optimal(&mut self) -> OptimalAligner<'_> {
        OptimalAligner::new(
            &self.geometry,
            &mut self.scratch,
            self.config.alignment.clone(),
        )
        .parallel(!self.config.ranking.sequential)
    }

    pub fn segment(&self, samples: &[Point]) -> Vec<KeyEvent> {
        self.segmenter().segment(samples)
    }

    pub fn fast_rank(&self, events: &[KeyEvent]) -> Vec<ScoredResult> {
        self.heuristic().rank(events, &self.vocabulary)
    }

    /// Fast path end to end: segment, then rank by the heuristic distance.
    pub fn process(&self, samples: &[Point]) -> Vec<ScoredResult> {
        let events = self.segment(samples);
        if events.is_empty() {
            return Vec::new();
        }
        self.fast_rank(&events)
    }

    pub fn dp_score(&mut self, samples: &[Point], word: &str, threshold: f64) -> GtResult<f64> {
        self.optimal().score(samples, word, threshold)
    }

    pub fn dp_score_lines(&mut self, samples: &[Point], lines: &[LineSegment], threshold: f64) -> f64 {
        self.optimal().score_lines(samples, lines, threshold)
    }

    pub fn dp_rank(&mut self, samples: &[Point]) -> Vec<ScoredResult> {
        let threshold = self.config.alignment.prune_threshold;
        let vocabulary = &self.vocabulary;
        OptimalAligner::new(&self.geometry, &mut self.scratch, self.config.alignment.clone())
            .parallel(!self.config.ranking.sequential)
            .rank(samples, vocabulary, threshold)
    }

    pub fn decorate(&self, samples: &[Point]) -> Vec<SignalDatum> {
        decorate_with_deviation(samples, self.config.alignment.deviation_window)
    }

    pub fn dp_phi(
        &mut self,
        samples: &[Point],
        word: &str,
        weights: &[f64],
    ) -> GtResult<Option<Vec<f64>>> {
        let data = self.decorate(samples);
        self.optimal().phi(&data, word, weights)
    }

    pub fn weighted_rank(&mut self, samples: &[Point], weights: &[f64]) -> GtResult<Vec<ScoredResult>> {
        let data = self.decorate(samples);
        let vocabulary = &self.vocabulary;
        OptimalAligner::new(&self.geometry, &mut self.scratch, self.config.alignment.clone())
            .parallel(!self.config.ranking.sequential)
            .weighted_rank(&data, weights, vocabulary)
    }

    /// Rebuilds the geometry from new centers. The old layout survives a
    /// failed rebuild.
    pub fn update_layout(&mut self, centers: &[(char, Point)]) -> GtResult<()> {
        self.geometry.update_layout(centers)?;
        info!(
            "Layout updated: radius {:.1}, region {:?}",
            self.geometry.min_inter_key_radius(),
            self.geometry.region()
        );
        Ok(())
    }
}
