use crate::geometry::Point;
use serde::Serialize;

pub mod filter;
pub mod segmenter;

pub use filter::{decorate_with_deviation, sliding_mean_filter};
pub use segmenter::SignalSegmenter;

/// One inferred key press: the nearest alpha key to the centroid of a dwell
/// cluster, weighted by the number of samples in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyEvent {
    pub alpha: char,
    pub point: Point,
    pub ticks: usize,
}

impl KeyEvent {
    pub fn new(alpha: char, point: Point, ticks: usize) -> Self {
        Self {
            alpha,
            point,
            ticks,
        }
    }
}

/// Raw sample decorated with the local spread of the stream around it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SignalDatum {
    pub point: Point,
    pub xdev: f64,
    pub ydev: f64,
}

/// Anything the optimal aligner can consume as an input sample.
pub trait Sample {
    fn point(&self) -> Point;

    fn xdev(&self) -> f64 {
        0.0
    }

    fn ydev(&self) -> f64 {
        0.0
    }
}

impl Sample for Point {
    #[inline(always)]
    fn point(&self) -> Point {
        *self
    }
}

impl Sample for SignalDatum {
    #[inline(always)]
    fn point(&self) -> Point {
        self.point
    }

    #[inline(always)]
    fn xdev(&self) -> f64 {
        self.xdev
    }

    #[inline(always)]
    fn ydev(&self) -> f64 {
        self.ydev
    }
}
