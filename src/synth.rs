use crate::error::GtResult;
use crate::geometry::{KeyboardGeometry, Point};
use typed_builder::TypedBuilder;

/// Deterministic gaze stream generator: a dwell on every letter of a word
/// joined by straight saccades.
#[derive(Debug, Clone, TypedBuilder)]
pub struct TraceSynthesizer {
    /// Samples spent on each key.
    #[builder(default = 20)]
    pub dwell: usize,
    /// Samples strictly between two consecutive keys.
    #[builder(default = 6)]
    pub saccade: usize,
    /// Uniform per-axis noise in pixels, `0` for an exact trace.
    #[builder(default = 0)]
    pub jitter: i32,
    #[builder(default = 7)]
    pub seed: u64,
}

impl Default for TraceSynthesizer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TraceSynthesizer {
    pub fn trace(&self, geometry: &KeyboardGeometry, word: &str) -> GtResult<Vec<Point>> {
        let centers = geometry.word_to_point_sequence(word)?;
        Ok(self.trace_points(&centers))
    }

    pub fn trace_points(&self, centers: &[Point]) -> Vec<Point> {
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let mut out = Vec::with_capacity(centers.len() * (self.dwell + self.saccade));
        let steps = self.saccade as i32 + 1;

        for (k, &center) in centers.iter().enumerate() {
            if k > 0 {
                let from = centers[k - 1];
                for s in 1..steps {
                    out.push(Point::new(
                        from.x + (center.x - from.x) * s / steps,
                        from.y + (center.y - from.y) * s / steps,
                    ));
                }
            }
            for _ in 0..self.dwell {
                out.push(Point::new(
                    center.x + self.noise(&mut rng),
                    center.y + self.noise(&mut rng),
                ));
            }
        }
        out
    }

    fn noise(&self, rng: &mut fastrand::Rng) -> i32 {
        if self.jitter <= 0 {
            0
        } else {
            rng.i32(-self.jitter..=self.jitter)
        }
    }
}
