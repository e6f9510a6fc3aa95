use crate::error::{GazeError, GtResult};
use crate::layouts::KnownLayout;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub mod line;

pub use line::{points_to_line_sequence, LineSegment};

/// Integer pixel coordinate on the on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    pub fn city_block(&self, other: &Point) -> f64 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as f64
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Keys that take part in spacing, bounds and nearest-key inference.
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_uppercase()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Key {
    pub id: char,
    pub center: Point,
    pub neighbors: Vec<char>,
}

/// Alpha-key extremes padded outward by the inter-key radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveRegion {
    pub left: f64,
    pub right: f64,
    pub upper: f64,
    pub lower: f64,
}

impl ActiveRegion {
    pub fn contains(&self, p: Point) -> bool {
        let (x, y) = (p.x as f64, p.y as f64);
        x > self.left && x < self.right && y > self.upper && y < self.lower
    }
}

#[derive(Debug, Clone)]
pub struct KeyboardGeometry {
    layout: KnownLayout,
    keys: BTreeMap<char, Key>,
    alpha: Vec<(char, Point)>,
    min_inter_key_radius: f64,
    region: ActiveRegion,
}

impl KeyboardGeometry {
    /// Geometry of a known layout with its built-in pixel centers.
    pub fn standard(layout: KnownLayout) -> Self {
        // Built-in centers always satisfy the derivation preconditions.
        Self::from_centers(layout, &layout.default_centers())
            .unwrap_or_else(|e| panic!("built-in layout '{}' is invalid: {}", layout, e))
    }

    /// Builds every key from the layout's neighbor table and the supplied
    /// centers, then derives spacing and bounds. Characters the layout does
    /// not model are logged and ignored.
    pub fn from_centers(layout: KnownLayout, centers: &[(char, Point)]) -> GtResult<Self> {
        let mut keys = BTreeMap::new();
        let mut rejected = 0;

        for &(raw, center) in centers {
            let id = raw.to_ascii_uppercase();
            match layout.neighbors_of(id) {
                Some(neighbors) => {
                    keys.insert(
                        id,
                        Key {
                            id,
                            center,
                            neighbors: neighbors.chars().collect(),
                        },
                    );
                }
                None => {
                    warn!("Rejecting coordinate for unmodeled key {:?}", raw);
                    rejected += 1;
                }
            }
        }

        let alpha: Vec<(char, Point)> = keys
            .values()
            .filter(|k| is_alpha(k.id))
            .map(|k| (k.id, k.center))
            .collect();

        if alpha.len() < 2 {
            return Err(GazeError::Config(format!(
                "Layout '{}' needs at least two alpha keys with coordinates, found {}",
                layout,
                alpha.len()
            )));
        }

        let min_distance = alpha
            .iter()
            .tuple_combinations()
            .map(|(a, b)| a.1.distance(&b.1))
            .fold(f64::MAX, f64::min);

        if min_distance <= 0.0 {
            return Err(GazeError::Validation(
                "Two alpha keys share the same center".to_string(),
            ));
        }
        let radius = min_distance / 2.0;

        let (min_x, max_x) = alpha
            .iter()
            .map(|(_, p)| p.x)
            .minmax()
            .into_option()
            .unwrap_or_default();
        let (min_y, max_y) = alpha
            .iter()
            .map(|(_, p)| p.y)
            .minmax()
            .into_option()
            .unwrap_or_default();

        let region = ActiveRegion {
            left: (min_x as f64 - radius).max(0.0),
            right: max_x as f64 + radius,
            upper: (min_y as f64 - radius).max(0.0),
            lower: max_y as f64 + radius,
        };

        debug!(
            "Geometry '{}': {} keys ({} alpha, {} rejected), radius {:.2}, region {:?}",
            layout,
            keys.len(),
            alpha.len(),
            rejected,
            radius,
            region
        );

        Ok(Self {
            layout,
            keys,
            alpha,
            min_inter_key_radius: radius,
            region,
        })
    }

    /// Full rebuild from new centers. On error the current geometry is kept.
    pub fn update_layout(&mut self, centers: &[(char, Point)]) -> GtResult<()> {
        *self = Self::from_centers(self.layout, centers)?;
        Ok(())
    }

    pub fn layout(&self) -> KnownLayout {
        self.layout
    }

    pub fn key(&self, c: char) -> Option<&Key> {
        self.keys.get(&c.to_ascii_uppercase())
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.values()
    }

    pub fn alpha_keys(&self) -> &[(char, Point)] {
        &self.alpha
    }

    pub fn key_center(&self, c: char) -> GtResult<Point> {
        self.key(c).map(|k| k.center).ok_or(GazeError::UnknownKey(c))
    }

    pub fn min_inter_key_radius(&self) -> f64 {
        self.min_inter_key_radius
    }

    pub fn region(&self) -> ActiveRegion {
        self.region
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        self.region.contains(p)
    }

    /// Closest alpha key to `p`. Stops as soon as a center lies within the
    /// inter-key radius: every other center is then at least `2r - d > d` away.
    pub fn nearest_alpha_key(&self, p: Point) -> char {
        let mut best = self.alpha[0].0;
        let mut min = f64::MAX;
        for &(id, center) in &self.alpha {
            let d = p.distance(&center);
            if d < min {
                min = d;
                best = id;
                if d < self.min_inter_key_radius {
                    break;
                }
            }
        }
        best
    }

    pub fn nearest_alpha_key_exhaustive(&self, p: Point) -> char {
        let mut best = self.alpha[0].0;
        let mut min = f64::MAX;
        for &(id, center) in &self.alpha {
            let d = p.distance(&center);
            if d < min {
                min = d;
                best = id;
            }
        }
        best
    }

    pub fn word_to_point_sequence(&self, word: &str) -> GtResult<Vec<Point>> {
        word.chars().map(|c| self.key_center(c)).collect()
    }
}

impl Default for KeyboardGeometry {
    fn default() -> Self {
        Self::standard(KnownLayout::default())
    }
}
