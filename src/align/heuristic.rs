use crate::config::RankingParams;
use crate::error::GtResult;
use crate::geometry::{KeyboardGeometry, Point};
use crate::ranking::{par_rank_candidates, rank_candidates, RankOrder, ScoredResult, UNREACHABLE};
use crate::signal::KeyEvent;
use crate::vocab::Vocabulary;
use tracing::debug;

/// Local realignment decision at `(event i, letter j)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Event and letter agree.
    Match,
    /// The next event matches this letter: event `i` is a spurious trigger.
    Insertion,
    /// The next letter matches this event: letter `j` was never looked at.
    Deletion,
    /// Plain mismatch.
    Substitution,
}

impl Step {
    pub fn classify(events: &[KeyEvent], word: &[char], i: usize, j: usize) -> Step {
        if events[i].alpha == word[j] {
            Step::Match
        } else if i + 1 < events.len() && events[i + 1].alpha == word[j] {
            Step::Insertion
        } else if j + 1 < word.len() && word[j + 1] == events[i].alpha {
            Step::Deletion
        } else {
            Step::Substitution
        }
    }

    /// Cost of taking this step; `keys` holds the centers of `word`.
    pub fn cost(&self, events: &[KeyEvent], keys: &[Point], i: usize, j: usize) -> f64 {
        match self {
            Step::Match => 0.0,
            Step::Insertion => {
                let p = events[i].point;
                let here = p.distance(&keys[j]);
                if j > 0 {
                    p.distance(&keys[j - 1]).min(here)
                } else {
                    here
                }
            }
            Step::Deletion => {
                let anchor = if i > 0 { events[i - 1].point } else { events[i].point };
                anchor.distance(&keys[j])
            }
            Step::Substitution => events[i].point.distance(&keys[j]),
        }
    }

    /// Extra `(events, letters)` consumed before the shared lockstep advance.
    pub fn skip(&self) -> (usize, usize) {
        match self {
            Step::Insertion => (1, 0),
            Step::Deletion => (0, 1),
            Step::Match | Step::Substitution => (0, 0),
        }
    }
}

/// Linear-time approximate distance between key events and a word.
pub struct HeuristicAligner<'g> {
    geometry: &'g KeyboardGeometry,
    params: RankingParams,
}

impl<'g> HeuristicAligner<'g> {
    pub const ORDER: RankOrder = RankOrder::AscendingDistance;

    pub fn new(geometry: &'g KeyboardGeometry, params: RankingParams) -> Self {
        Self { geometry, params }
    }

    pub fn order(&self) -> RankOrder {
        Self::ORDER
    }

    /// Distance of `word` from `events`, or [`UNREACHABLE`] when either side is
    /// empty or their lengths differ by more than the length gate. Fails only
    /// if the word uses a key the layout does not model.
    pub fn score(&self, events: &[KeyEvent], word: &str) -> GtResult<f64> {
        let letters: Vec<char> = word.chars().map(|c| c.to_ascii_uppercase()).collect();
        if events.is_empty() || letters.is_empty() {
            return Ok(UNREACHABLE);
        }
        if events.len().abs_diff(letters.len()) > self.params.length_gate {
            return Ok(UNREACHABLE);
        }
        let keys = self.geometry.word_to_point_sequence(word)?;
        Ok(self.score_letters(events, &letters, &keys))
    }

    fn score_letters(&self, events: &[KeyEvent], word: &[char], keys: &[Point]) -> f64 {
        let (n, m) = (events.len(), word.len());
        let (mut i, mut j) = (0, 0);
        let mut cost = 0.0;
        let mut repeats = 0usize;

        while i < n && j < m {
            let step = Step::classify(events, word, i, j);
            cost += step.cost(events, keys, i, j);
            let (di, dj) = step.skip();
            i += di;
            j += dj;

            // doubled letters are observed as a single event
            if j + 1 < m && word[j] == word[j + 1] {
                j += 1;
                repeats += 1;
            }
            i += 1;
            j += 1;
        }

        while i < n {
            cost += events[i].point.distance(&keys[j - 1]);
            i += 1;
        }
        while j < m {
            cost += events[i - 1].point.distance(&keys[j]);
            while j + 1 < m && word[j] == word[j + 1] {
                j += 1;
                repeats += 1;
            }
            j += 1;
        }

        cost + repeats as f64 * self.geometry.min_inter_key_radius() * self.params.repeat_penalty
    }

    /// Scores the whole vocabulary, keeps candidates under the admission
    /// threshold, nearest first.
    pub fn rank(&self, events: &[KeyEvent], vocabulary: &Vocabulary) -> Vec<ScoredResult> {
        let admission = Some(self.params.admission_threshold);
        let score = |word: &str| {
            self.score(events, word).unwrap_or_else(|e| {
                debug!("Skipping '{}': {}", word, e);
                UNREACHABLE
            })
        };

        if self.params.sequential {
            rank_candidates(vocabulary.iter(), Self::ORDER, admission, score)
        } else {
            par_rank_candidates(
                vocabulary.words(),
                Self::ORDER,
                admission,
                || (),
                |_, word| score(word),
            )
        }
    }
}
