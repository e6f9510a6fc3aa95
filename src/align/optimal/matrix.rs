use super::cost::{CellFeatures, Direction};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentCell {
    pub score: f64,
    pub features: CellFeatures,
    /// `None` only at the origin.
    pub back: Option<Direction>,
}

impl AlignmentCell {
    pub const EMPTY: Self = Self {
        score: 0.0,
        features: CellFeatures {
            dist: 0.0,
            xdev: 0.0,
            ydev: 0.0,
        },
        back: None,
    };
}

/// Reusable DP table. Storage only grows; `reset` reshapes it for the next
/// alignment. Owned by one caller at a time through `&mut`.
#[derive(Debug, Clone, Default)]
pub struct DpMatrix {
    cells: Vec<AlignmentCell>,
    rows: usize,
    cols: usize,
    complete: bool,
}

impl DpMatrix {
    pub fn with_capacity(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![AlignmentCell::EMPTY; rows * cols],
            rows: 0,
            cols: 0,
            complete: false,
        }
    }

    pub fn reset(&mut self, rows: usize, cols: usize) {
        let needed = rows * cols;
        if self.cells.len() < needed {
            self.cells.resize(needed, AlignmentCell::EMPTY);
        }
        self.rows = rows;
        self.cols = cols;
        self.complete = false;
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True once the last alignment filled every cell (it was not pruned or
    /// rejected).
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }

    #[inline(always)]
    pub fn cell(&self, i: usize, j: usize) -> &AlignmentCell {
        debug_assert!(i < self.rows && j < self.cols);
        &self.cells[i * self.cols + j]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, i: usize, j: usize, cell: AlignmentCell) {
        debug_assert!(i < self.rows && j < self.cols);
        self.cells[i * self.cols + j] = cell;
    }

    pub fn terminal(&self) -> &AlignmentCell {
        self.cell(self.rows - 1, self.cols - 1)
    }

    /// Walks backpointers from the terminal cell to the origin and sums the
    /// local features of every cell entered, grouped by the direction it was
    /// entered from. The origin itself contributes nothing.
    ///
    /// Panics if the table is incomplete or a backpointer would leave it.
    pub fn phi(&self, per_direction: usize, groups: usize) -> Vec<f64> {
        assert!(self.complete, "phi requested from an incomplete alignment");

        let mut phi = vec![0.0; per_direction * groups];
        let (mut r, mut c) = (self.rows - 1, self.cols - 1);

        while r > 0 || c > 0 {
            let cell = self.cell(r, c);
            let dir = match cell.back {
                Some(d) => d,
                None => panic!("cell ({}, {}) has no backpointer", r, c),
            };
            assert!(dir.index() < groups, "{} transition outside phi layout", dir);

            let base = dir.index() * per_direction;
            for k in 0..per_direction {
                phi[base + k] += cell.features.get(k);
            }

            match dir {
                Direction::Up => {
                    assert!(r > 0, "UP backpointer in row 0");
                    r -= 1;
                }
                Direction::Left => {
                    assert!(c > 0, "LEFT backpointer in column 0");
                    c -= 1;
                }
                Direction::Diag => {
                    assert!(r > 0 && c > 0, "DIAG backpointer on the border");
                    r -= 1;
                    c -= 1;
                }
            }
        }
        phi
    }

    /// Directions of the optimal path, origin first.
    pub fn path(&self) -> Vec<Direction> {
        assert!(self.complete, "path requested from an incomplete alignment");
        let mut path = Vec::with_capacity(self.rows + self.cols);
        let (mut r, mut c) = (self.rows - 1, self.cols - 1);
        while let Some(dir) = self.cell(r, c).back {
            path.push(dir);
            match dir {
                Direction::Up => r -= 1,
                Direction::Left => c -= 1,
                Direction::Diag => {
                    r -= 1;
                    c -= 1;
                }
            }
        }
        path.reverse();
        path
    }
}
