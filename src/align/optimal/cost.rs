use crate::error::{GazeError, GtResult};
use crate::geometry::{LineSegment, Point};
use crate::ranking::RankOrder;
use crate::signal::Sample;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Predecessor of a DP cell. The discriminant is the weight/phi group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// From `(i-1, j)`: the sample is absorbed by the same target.
    Up = 0,
    /// From `(i, j-1)`: the target is passed without a new sample.
    Left = 1,
    /// From `(i-1, j-1)`.
    Diag = 2,
}

impl Direction {
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which predecessors an interior cell may take. UP and LEFT are always
/// available since the borders are built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionSet {
    pub diag: bool,
}

impl TransitionSet {
    pub const UP_LEFT: Self = Self { diag: false };
    pub const WITH_DIAG: Self = Self { diag: true };

    pub fn count(&self) -> usize {
        if self.diag {
            3
        } else {
            2
        }
    }
}

/// Raw local features of one `(sample, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CellFeatures {
    pub dist: f64,
    pub xdev: f64,
    pub ydev: f64,
}

impl CellFeatures {
    #[inline(always)]
    pub fn get(&self, k: usize) -> f64 {
        match k {
            0 => self.dist,
            1 => self.xdev,
            2 => self.ydev,
            _ => panic!("feature index {} out of range", k),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Euclidean,
    CityBlock,
}

/// Something a sample can be aligned against.
pub trait Target {
    fn distance_from(&self, p: Point, metric: Metric) -> f64;
}

impl Target for Point {
    #[inline(always)]
    fn distance_from(&self, p: Point, metric: Metric) -> f64 {
        match metric {
            Metric::Euclidean => p.distance(self),
            Metric::CityBlock => p.city_block(self),
        }
    }
}

impl Target for LineSegment {
    /// Always the perpendicular (clamped) Euclidean distance.
    #[inline(always)]
    fn distance_from(&self, p: Point, _metric: Metric) -> f64 {
        self.distance_to(p)
    }
}

/// Local cost model plugged into the DP core.
pub trait LocalCost<S, T> {
    fn order(&self) -> RankOrder;
    fn transitions(&self) -> TransitionSet;
    fn features(&self, sample: &S, target: &T) -> CellFeatures;
    /// Score of the `(0, 0)` cell.
    fn origin(&self, f: &CellFeatures) -> f64;
    /// Amount added when entering a cell from `dir`.
    fn step(&self, dir: Direction, f: &CellFeatures) -> f64;
    /// Whether LEFT takes an interior cell when it scores exactly as well as UP.
    fn left_wins_ties(&self) -> bool {
        false
    }
}

/// Plain distance minimization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceCost {
    pub metric: Metric,
    pub transitions: TransitionSet,
}

impl DistanceCost {
    pub fn new(metric: Metric, transitions: TransitionSet) -> Self {
        Self {
            metric,
            transitions,
        }
    }
}

impl<S: Sample, T: Target> LocalCost<S, T> for DistanceCost {
    fn order(&self) -> RankOrder {
        RankOrder::AscendingDistance
    }

    fn transitions(&self) -> TransitionSet {
        self.transitions
    }

    #[inline(always)]
    fn features(&self, sample: &S, target: &T) -> CellFeatures {
        CellFeatures {
            dist: target.distance_from(sample.point(), self.metric),
            xdev: sample.xdev(),
            ydev: sample.ydev(),
        }
    }

    fn origin(&self, f: &CellFeatures) -> f64 {
        f.dist
    }

    #[inline(always)]
    fn step(&self, _dir: Direction, f: &CellFeatures) -> f64 {
        f.dist
    }
}

/// Local features a weight vector is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureSet {
    /// One distance weight per direction.
    Distance,
    /// Distance, x-deviation and y-deviation weights per direction.
    DistanceDeviation,
}

impl FeatureSet {
    pub fn per_direction(&self) -> usize {
        match self {
            Self::Distance => 1,
            Self::DistanceDeviation => 3,
        }
    }

    /// Infers the feature set from a weight vector for `transitions`.
    pub fn for_weights(len: usize, transitions: TransitionSet) -> GtResult<Self> {
        let groups = transitions.count();
        [Self::Distance, Self::DistanceDeviation]
            .into_iter()
            .find(|f| f.per_direction() * groups == len)
            .ok_or_else(|| {
                GazeError::Config(format!(
                    "weight vector of length {} fits neither {} nor {} entries",
                    len,
                    groups,
                    3 * groups
                ))
            })
    }
}

/// Learned linear score, maximized. Weights are laid out direction-major:
/// `weights[dir.index() * per_direction + feature]`, the same layout as phi.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCost {
    weights: Vec<f64>,
    features: FeatureSet,
    transitions: TransitionSet,
}

impl WeightedCost {
    pub fn new(weights: &[f64], transitions: TransitionSet) -> GtResult<Self> {
        let features = FeatureSet::for_weights(weights.len(), transitions)?;
        Ok(Self {
            weights: weights.to_vec(),
            features,
            transitions,
        })
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.features
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn dimensions(&self) -> usize {
        self.weights.len()
    }
}

impl<S: Sample, T: Target> LocalCost<S, T> for WeightedCost {
    fn order(&self) -> RankOrder {
        RankOrder::DescendingScore
    }

    fn left_wins_ties(&self) -> bool {
        true
    }

    fn transitions(&self) -> TransitionSet {
        self.transitions
    }

    #[inline(always)]
    fn features(&self, sample: &S, target: &T) -> CellFeatures {
        CellFeatures {
            dist: target.distance_from(sample.point(), Metric::Euclidean),
            xdev: sample.xdev(),
            ydev: sample.ydev(),
        }
    }

    fn origin(&self, f: &CellFeatures) -> f64 {
        -f.dist
    }

    #[inline(always)]
    fn step(&self, dir: Direction, f: &CellFeatures) -> f64 {
        let per = self.features.per_direction();
        let group = &self.weights[dir.index() * per..(dir.index() + 1) * per];
        group.iter().enumerate().map(|(k, w)| w * f.get(k)).sum()
    }
}
