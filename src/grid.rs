use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryPolicy;

/// A 2-D concentration field stored in flat row-major order.
///
/// Indices are lattice coordinates with no physical units attached.
/// Values are unconstrained in sign and magnitude; the update rule does not
/// clamp them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Creates a `width x height` grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: f64) -> Self {
        Self {
            width,
            height,
            values: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[self.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.idx(x, y);
        self.values[i] = value;
    }

    /// Samples the cell at possibly out-of-range coordinates, resolving
    /// them through the boundary policy. `ZeroPad` samples outside the grid
    /// contribute 0.0.
    pub fn sample(&self, x: isize, y: isize, policy: BoundaryPolicy) -> f64 {
        let Some(xi) = policy.resolve(x, self.width) else {
            return 0.0;
        };
        let Some(yi) = policy.resolve(y, self.height) else {
            return 0.0;
        };
        self.values[yi * self.width + xi]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// `true` when every cell is a finite number (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
