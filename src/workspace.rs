//! Reachability map: which tip positions of a rectangular grid can be reached for the given
//! tip direction and elbow configuration. Grid cells are solved in parallel.

use rayon::prelude::*;
use tracing::{debug, warn};
use crate::kinematic_traits::{ElbowConfiguration, Kinematics, Point, TargetPose};

/// Largest grid that is solved, in cells.
pub const MAX_GRID_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Grid step must be finite and positive (got {0})")]
    InvalidStep(f64),

    #[error("Grid bounds must be finite with min <= max")]
    InvalidBounds,

    #[error("Grid has too many cells, at most {MAX_GRID_CELLS} are allowed")]
    TooLarge,
}

/// Rectangular grid of tip targets, rows from top (max y) to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub min: Point,
    pub max: Point,
    pub step: f64,
}

impl Grid {
    /// Square grid centered at the base, just large enough to hold the given reach.
    pub fn around_base(reach: f64, step: f64) -> Self {
        Grid {
            min: Point::new(-reach, -reach),
            max: Point::new(reach, reach),
            step,
        }
    }

    /// Number of columns, 0 if the grid is invalid or larger than [`MAX_GRID_CELLS`].
    pub fn columns(&self) -> usize {
        self.dimensions().map_or(0, |(_, columns)| columns)
    }

    /// Number of rows, 0 if the grid is invalid or larger than [`MAX_GRID_CELLS`].
    pub fn rows(&self) -> usize {
        self.dimensions().map_or(0, |(rows, _)| rows)
    }

    /// Rows and columns of the grid. The product never exceeds [`MAX_GRID_CELLS`].
    pub fn dimensions(&self) -> Result<(usize, usize), GridError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(GridError::InvalidStep(self.step));
        }
        let columns = Self::count(self.min.x, self.max.x, self.step)?;
        let rows = Self::count(self.min.y, self.max.y, self.step)?;
        match rows.checked_mul(columns) {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok((rows, columns)),
            _ => Err(GridError::TooLarge),
        }
    }

    fn count(from: f64, to: f64, step: f64) -> Result<usize, GridError> {
        if !(from.is_finite() && to.is_finite() && to >= from) {
            return Err(GridError::InvalidBounds);
        }
        // Counted in f64, a cast alone would saturate and overflow the + 1
        let count = ((to - from) / step + 1e-9).floor() + 1.0;
        if !(count <= MAX_GRID_CELLS as f64) {
            return Err(GridError::TooLarge);
        }
        Ok(count as usize)
    }

    /// Target position of the cell.
    pub fn cell(&self, row: usize, column: usize) -> Point {
        Point::new(
            self.min.x + column as f64 * self.step,
            self.max.y - row as f64 * self.step,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReachMap {
    pub grid: Grid,
    pub psi: f64,
    pub elbow: ElbowConfiguration,

    /// Row major, true if the cell can be reached
    pub reachable: Vec<bool>,
}

impl ReachMap {
    /// Solves every grid cell with the given kinematics. Joint limits of the kinematics
    /// are respected. Fails without solving anything if the grid is invalid or too large.
    pub fn compute<K: Kinematics + Sync>(
        kinematics: &K,
        grid: Grid,
        psi: f64,
        elbow: ElbowConfiguration,
    ) -> Result<Self, GridError> {
        let (rows, columns) = grid.dimensions().inspect_err(|e| {
            warn!(?grid, "Reachability map not computed: {}", e);
        })?;
        let cells = rows * columns;

        let reachable: Vec<bool> = (0..cells)
            .into_par_iter()
            .map(|i| {
                let p = grid.cell(i / columns, i % columns);
                kinematics
                    .inverse(&TargetPose::new(p.x, p.y, psi), elbow)
                    .is_ok()
            })
            .collect();

        let map = ReachMap {
            grid,
            psi,
            elbow,
            reachable,
        };
        debug!(cells, reachable = map.reachable_count(), "Reachability map computed");
        Ok(map)
    }

    pub fn is_reachable(&self, row: usize, column: usize) -> bool {
        let columns = self.grid.columns();
        column < columns && self.reachable.get(row * columns + column).copied().unwrap_or(false)
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable.iter().filter(|&&r| r).count()
    }

    /// Share of reachable cells, 0 for an empty grid.
    pub fn fraction_reachable(&self) -> f64 {
        if self.reachable.is_empty() {
            0.0
        } else {
            self.reachable_count() as f64 / self.reachable.len() as f64
        }
    }

    /// Reachable targets, row by row.
    pub fn reachable_points(&self) -> Vec<Point> {
        let columns = self.grid.columns();
        self.reachable
            .iter()
            .enumerate()
            .filter(|(_, r)| **r)
            .map(|(i, _)| self.grid.cell(i / columns, i % columns))
            .collect()
    }

    /// One line per grid row, `#` for reachable cells, `.` otherwise and `B` at the base.
    pub fn to_ascii(&self) -> String {
        let columns = self.grid.columns();
        let half = self.grid.step / 2.0;
        let mut out = String::with_capacity((columns + 1) * self.grid.rows());
        for row in 0..self.grid.rows() {
            for column in 0..columns {
                let p = self.grid.cell(row, column);
                let symbol = if p.x.abs() < half && p.y.abs() < half {
                    'B'
                } else if self.is_reachable(row, column) {
                    '#'
                } else {
                    '.'
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}
