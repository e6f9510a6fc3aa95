use crate::config::AlignmentParams;
use crate::error::GtResult;
use crate::geometry::{points_to_line_sequence, KeyboardGeometry, LineSegment, Point};
use crate::ranking::{par_rank_candidates, rank_candidates, RankOrder, ScoredResult};
use crate::signal::SignalDatum;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

pub mod cost;
pub mod matrix;

pub use cost::{
    CellFeatures, Direction, DistanceCost, FeatureSet, LocalCost, Metric, Target, TransitionSet,
    WeightedCost,
};
pub use matrix::{AlignmentCell, DpMatrix};

/// Distance recurrences available for unweighted scoring.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlignVariant {
    /// Euclidean point distance, UP/LEFT only.
    #[default]
    Point,
    /// City-block point distance with substitution.
    CityBlock,
    /// Euclidean point distance with substitution.
    Substitution,
    /// Distance to the segments joining the letters, with substitution.
    Linear,
}

impl AlignVariant {
    pub fn cost(&self) -> DistanceCost {
        match self {
            Self::Point => DistanceCost::new(Metric::Euclidean, TransitionSet::UP_LEFT),
            Self::CityBlock => DistanceCost::new(Metric::CityBlock, TransitionSet::WITH_DIAG),
            Self::Substitution | Self::Linear => {
                DistanceCost::new(Metric::Euclidean, TransitionSet::WITH_DIAG)
            }
        }
    }
}

/// Global alignment of `samples` (rows) against `targets` (columns).
///
/// Borders are filled first: row 0 strictly LEFT, column 0 strictly UP.
/// Interior cells take the best of UP, LEFT and, when enabled, DIAG; on ties
/// the earlier of those wins, except that a cost may hand UP/LEFT ties to LEFT. After each interior row the row's best score is
/// checked against `threshold` (enabled when `> 0`) and the alignment is
/// abandoned as unreachable once every cell is already worse.
///
/// Either side shorter than two returns the unreachable sentinel.
pub fn align<S, T, C>(
    matrix: &mut DpMatrix,
    samples: &[S],
    targets: &[T],
    cost: &C,
    threshold: f64,
) -> f64
where
    C: LocalCost<S, T>,
{
    let order = cost.order();
    let sentinel = order.unreachable();
    let (n, m) = (samples.len(), targets.len());

    if n <= 1 || m <= 1 {
        debug!("Alignment needs two or more samples and targets, got {}x{}", n, m);
        matrix.reset(0, 0);
        return sentinel;
    }

    matrix.reset(n, m);
    let prune = threshold > 0.0;
    let diag = cost.transitions().diag;

    let f = cost.features(&samples[0], &targets[0]);
    matrix.set(
        0,
        0,
        AlignmentCell {
            score: cost.origin(&f),
            features: f,
            back: None,
        },
    );

    for j in 1..m {
        let f = cost.features(&samples[0], &targets[j]);
        let score = matrix.cell(0, j - 1).score + cost.step(Direction::Left, &f);
        matrix.set(0, j, AlignmentCell { score, features: f, back: Some(Direction::Left) });
    }

    for i in 1..n {
        let f = cost.features(&samples[i], &targets[0]);
        let score = matrix.cell(i - 1, 0).score + cost.step(Direction::Up, &f);
        matrix.set(i, 0, AlignmentCell { score, features: f, back: Some(Direction::Up) });
    }

    for i in 1..n {
        let mut row_best = sentinel;
        for j in 1..m {
            let f = cost.features(&samples[i], &targets[j]);

            let mut best = matrix.cell(i - 1, j).score + cost.step(Direction::Up, &f);
            let mut back = Direction::Up;

            let left = matrix.cell(i, j - 1).score + cost.step(Direction::Left, &f);
            if order.is_better(left, best) || (left == best && cost.left_wins_ties()) {
                best = left;
                back = Direction::Left;
            }

            if diag {
                let d = matrix.cell(i - 1, j - 1).score + cost.step(Direction::Diag, &f);
                if order.is_better(d, best) {
                    best = d;
                    back = Direction::Diag;
                }
            }

            matrix.set(i, j, AlignmentCell { score: best, features: f, back: Some(back) });
            if order.is_better(best, row_best) {
                row_best = best;
            }
        }

        if prune && order.is_better(threshold, row_best) {
            debug!("Pruned at row {} of {}: best {:.2} vs bound {:.2}", i, n, row_best, threshold);
            return sentinel;
        }
    }

    matrix.mark_complete();
    matrix.terminal().score
}

/// Letter centers of `word`, optionally framed by the space bar.
pub fn word_targets(geometry: &KeyboardGeometry, word: &str, pad: bool) -> GtResult<Vec<Point>> {
    if pad {
        geometry.word_to_point_sequence(&format!(" {} ", word))
    } else {
        geometry.word_to_point_sequence(word)
    }
}

/// Unweighted score of one word under `params.variant`.
pub fn score_word(
    matrix: &mut DpMatrix,
    geometry: &KeyboardGeometry,
    params: &AlignmentParams,
    samples: &[Point],
    word: &str,
    threshold: f64,
) -> GtResult<f64> {
    let targets = word_targets(geometry, word, params.pad_word_boundaries)?;
    let cost = params.variant.cost();
    Ok(match params.variant {
        AlignVariant::Linear => {
            let lines = points_to_line_sequence(&targets);
            align(matrix, samples, &lines, &cost, threshold)
        }
        _ => align(matrix, samples, &targets, &cost, threshold),
    })
}

/// Learned score of one word. Never pruned, so the table is ready for phi.
pub fn weighted_score(
    matrix: &mut DpMatrix,
    geometry: &KeyboardGeometry,
    params: &AlignmentParams,
    samples: &[SignalDatum],
    word: &str,
    cost: &WeightedCost,
) -> GtResult<f64> {
    let targets = word_targets(geometry, word, params.pad_word_boundaries)?;
    Ok(align(matrix, samples, &targets, cost, -1.0))
}

/// Precise aligner over raw samples. Borrows one scratch matrix, so a single
/// instance can never run two alignments at once; parallel lexicon scans give
/// every worker its own matrix.
pub struct OptimalAligner<'a> {
    geometry: &'a KeyboardGeometry,
    matrix: &'a mut DpMatrix,
    params: AlignmentParams,
    parallel: bool,
}

impl<'a> OptimalAligner<'a> {
    pub const DISTANCE_ORDER: RankOrder = RankOrder::AscendingDistance;
    pub const WEIGHTED_ORDER: RankOrder = RankOrder::DescendingScore;

    pub fn new(
        geometry: &'a KeyboardGeometry,
        matrix: &'a mut DpMatrix,
        params: AlignmentParams,
    ) -> Self {
        Self {
            geometry,
            matrix,
            params,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &AlignmentParams {
        &self.params
    }

    /// Table of the most recent alignment.
    pub fn matrix(&self) -> &DpMatrix {
        &*self.matrix
    }

    pub fn score(&mut self, samples: &[Point], word: &str, threshold: f64) -> GtResult<f64> {
        score_word(self.matrix, self.geometry, &self.params, samples, word, threshold)
    }

    /// Scores against explicit target points with the variant's metric and
    /// transitions.
    pub fn score_points(&mut self, samples: &[Point], targets: &[Point], threshold: f64) -> f64 {
        align(self.matrix, samples, targets, &self.params.variant.cost(), threshold)
    }

    /// Scores against a precomputed segment sequence.
    pub fn score_lines(
        &mut self,
        samples: &[Point],
        lines: &[LineSegment],
        threshold: f64,
    ) -> f64 {
        let cost = DistanceCost::new(Metric::Euclidean, TransitionSet::WITH_DIAG);
        align(self.matrix, samples, lines, &cost, threshold)
    }

    pub fn weighted_score(
        &mut self,
        samples: &[SignalDatum],
        word: &str,
        weights: &[f64],
    ) -> GtResult<f64> {
        let cost = WeightedCost::new(weights, TransitionSet::UP_LEFT)?;
        weighted_score(self.matrix, self.geometry, &self.params, samples, word, &cost)
    }

    /// Feature vector of the best weighted alignment of `word`, laid out like
    /// `weights`. `None` when the word or stream is too short to align.
    pub fn phi(
        &mut self,
        samples: &[SignalDatum],
        word: &str,
        weights: &[f64],
    ) -> GtResult<Option<Vec<f64>>> {
        let cost = WeightedCost::new(weights, TransitionSet::UP_LEFT)?;
        weighted_score(self.matrix, self.geometry, &self.params, samples, word, &cost)?;
        if !self.matrix.is_complete() {
            debug!("No feature vector for '{}': alignment incomplete", word);
            return Ok(None);
        }
        let per = cost.feature_set().per_direction();
        Ok(Some(self.matrix.phi(per, TransitionSet::UP_LEFT.count())))
    }

    /// Ranks the vocabulary by unweighted distance, nearest first. Words with
    /// keys the layout lacks are skipped.
    pub fn rank(&mut self, samples: &[Point], vocabulary: &Vocabulary, threshold: f64) -> Vec<ScoredResult> {
        let (geometry, params) = (self.geometry, &self.params);
        let score = |matrix: &mut DpMatrix, word: &str| {
            score_word(matrix, geometry, params, samples, word, threshold).unwrap_or_else(|e| {
                debug!("Skipping '{}': {}", word, e);
                Self::DISTANCE_ORDER.unreachable()
            })
        };

        if self.parallel {
            par_rank_candidates(vocabulary.words(), Self::DISTANCE_ORDER, None, DpMatrix::default, score)
        } else {
            let matrix = &mut *self.matrix;
            rank_candidates(vocabulary.iter(), Self::DISTANCE_ORDER, None, |w| score(matrix, w))
        }
    }

    /// Ranks the vocabulary by learned score, best first.
    pub fn weighted_rank(
        &mut self,
        samples: &[SignalDatum],
        weights: &[f64],
        vocabulary: &Vocabulary,
    ) -> GtResult<Vec<ScoredResult>> {
        let cost = WeightedCost::new(weights, TransitionSet::UP_LEFT)?;
        let (geometry, params) = (self.geometry, &self.params);
        let score = |matrix: &mut DpMatrix, word: &str| {
            weighted_score(matrix, geometry, params, samples, word, &cost).unwrap_or_else(|e| {
                debug!("Skipping '{}': {}", word, e);
                Self::WEIGHTED_ORDER.unreachable()
            })
        };

        Ok(if self.parallel {
            par_rank_candidates(vocabulary.words(), Self::WEIGHTED_ORDER, None, DpMatrix::default, score)
        } else {
            let matrix = &mut *self.matrix;
            rank_candidates(vocabulary.iter(), Self::WEIGHTED_ORDER, None, |w| score(matrix, w))
        })
    }
}
