use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// Distance sentinel for candidates that cannot be aligned (gated, pruned or
/// too short). Never admitted into a ranking.
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Which end of the score range is best. Every aligner declares its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankOrder {
    /// Distances: smaller is better.
    AscendingDistance,
    /// Learned scores: larger is better.
    DescendingScore,
}

impl RankOrder {
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        match self {
            Self::AscendingDistance => a.total_cmp(&b),
            Self::DescendingScore => b.total_cmp(&a),
        }
    }

    #[inline(always)]
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            Self::AscendingDistance => a < b,
            Self::DescendingScore => a > b,
        }
    }

    /// Sentinel worse than every reachable score.
    pub fn unreachable(&self) -> f64 {
        match self {
            Self::AscendingDistance => UNREACHABLE,
            Self::DescendingScore => f64::NEG_INFINITY,
        }
    }

    /// Finite, and strictly better than `threshold` when one is given.
    pub fn admits(&self, score: f64, threshold: Option<f64>) -> bool {
        score.is_finite() && threshold.map_or(true, |t| self.is_better(score, t))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub word: String,
    pub score: f64,
}

impl ScoredResult {
    pub fn new(word: impl Into<String>, score: f64) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// Scores every candidate, keeps the admitted ones and sorts them best first.
/// The sort is stable, so equal scores keep vocabulary order.
pub fn rank_candidates<'v, I, F>(
    vocabulary: I,
    order: RankOrder,
    admission: Option<f64>,
    mut score: F,
) -> Vec<ScoredResult>
where
    I: IntoIterator<Item = &'v str>,
    F: FnMut(&str) -> f64,
{
    let mut results: Vec<ScoredResult> = vocabulary
        .into_iter()
        .filter_map(|word| {
            let s = score(word);
            order.admits(s, admission).then(|| ScoredResult::new(word, s))
        })
        .collect();
    sort_results(&mut results, order);
    results
}

/// Parallel version of [`rank_candidates`]. `init` builds per-worker scratch
/// state that is never shared between threads. Output order matches the
/// serial scan exactly.
pub fn par_rank_candidates<T, INIT, F>(
    vocabulary: &[String],
    order: RankOrder,
    admission: Option<f64>,
    init: INIT,
    score: F,
) -> Vec<ScoredResult>
where
    INIT: Fn() -> T + Sync + Send,
    F: Fn(&mut T, &str) -> f64 + Sync + Send,
{
    let mut results: Vec<ScoredResult> = vocabulary
        .par_iter()
        .map_init(init, |state, word| {
            let s = score(state, word);
            order
                .admits(s, admission)
                .then(|| ScoredResult::new(word.as_str(), s))
        })
        .flatten()
        .collect();
    sort_results(&mut results, order);
    results
}

pub fn sort_results(results: &mut [ScoredResult], order: RankOrder) {
    results.sort_by(|a, b| order.compare(a.score, b.score));
}

/// 1-based position of `word` in a ranking.
pub fn rank_of(results: &[ScoredResult], word: &str) -> Option<usize> {
    results.iter().position(|r| r.word == word).map(|p| p + 1)
}
