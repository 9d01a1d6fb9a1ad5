use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::snapshot::{Snapshot, SnapshotSink};

/// Summary statistics of one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sum over all cells.
    pub total_mass: f64,
}

impl FieldStats {
    pub fn of(grid: &Grid) -> Self {
        if grid.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                total_mass: 0.0,
            };
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut total = 0.0;
        for &v in grid.as_slice() {
            min = min.min(v);
            max = max.max(v);
            total += v;
        }

        Self {
            min,
            max,
            mean: total / grid.len() as f64,
            total_mass: total,
        }
    }
}

/// Sink wrapper flagging the first snapshot containing a non-finite cell.
///
/// Divergence with badly chosen parameters is a modeling concern, not an
/// engineering error, so this is purely advisory: snapshots keep flowing to
/// the inner sink and the run is never aborted.
#[derive(Debug, Default)]
pub struct NonFiniteWatch<S> {
    inner: S,
    first_non_finite: Option<usize>,
}

impl<S: SnapshotSink> NonFiniteWatch<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            first_non_finite: None,
        }
    }

    /// Iteration index of the first snapshot with a NaN or infinite cell in
    /// either field, if any was seen.
    pub fn first_non_finite_iteration(&self) -> Option<usize> {
        self.first_non_finite
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SnapshotSink> SnapshotSink for NonFiniteWatch<S> {
    fn record(&mut self, snapshot: Snapshot) -> Result<()> {
        if self.first_non_finite.is_none()
            && (!snapshot.field_a.is_finite() || !snapshot.field_b.is_finite())
        {
            self.first_non_finite = Some(snapshot.iteration);
        }
        self.inner.record(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotCounter;

    #[test]
    fn test_field_stats() {
        let mut grid = Grid::new(2, 2, 1.0);
        grid.set(0, 0, -1.0);
        grid.set(1, 1, 3.0);
        let stats = FieldStats::of(&grid);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.total_mass - 4.0).abs() < 1e-12);
        assert!((stats.mean - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_watch_flags_first_occurrence() {
        let mut watch = NonFiniteWatch::new(SnapshotCounter::new());

        let finite = Snapshot {
            iteration: 0,
            field_a: Grid::new(2, 2, 1.0),
            field_b: Grid::new(2, 2, 0.0),
        };
        watch.record(finite.clone()).unwrap();
        assert_eq!(watch.first_non_finite_iteration(), None);

        let mut bad_b = Grid::new(2, 2, 0.0);
        bad_b.set(0, 1, f64::NAN);
        let diverged = Snapshot {
            iteration: 100,
            field_a: Grid::new(2, 2, 1.0),
            field_b: bad_b,
        };
        watch.record(diverged).unwrap();
        assert_eq!(watch.first_non_finite_iteration(), Some(100));

        // Later snapshots never overwrite the first hit, and recording
        // continues regardless.
        let mut later = finite;
        later.iteration = 200;
        watch.record(later).unwrap();
        assert_eq!(watch.first_non_finite_iteration(), Some(100));
        assert_eq!(watch.inner().recorded(), 3);
    }
}
