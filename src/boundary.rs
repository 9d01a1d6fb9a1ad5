use serde::{Deserialize, Serialize};

/// How the stencil resolves neighbor indices that fall off the grid.
///
/// The policy is fixed once per run and applied identically at every cell,
/// so pattern formation near edges follows a single deliberate rule rather
/// than whatever a convolution backend happens to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Wrap around to the opposite edge (torus topology).
    ///
    /// Preserves total-mass symmetry of the zero-sum stencil and avoids
    /// edge artifacts, so it is the default.
    #[default]
    Periodic,
    /// Out-of-range indices are clamped to the nearest edge cell.
    ClampedEdge,
    /// Out-of-range samples contribute zero concentration.
    ZeroPad,
}

impl BoundaryPolicy {
    /// Resolves a possibly out-of-range index along one axis of length `len`.
    ///
    /// Returns `None` when the sample contributes nothing (`ZeroPad` only).
    pub fn resolve(self, index: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        match self {
            BoundaryPolicy::Periodic => Some(index.rem_euclid(n) as usize),
            BoundaryPolicy::ClampedEdge => Some(index.clamp(0, n - 1) as usize),
            BoundaryPolicy::ZeroPad => {
                if (0..n).contains(&index) {
                    Some(index as usize)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_wraps_both_ends() {
        let p = BoundaryPolicy::Periodic;
        assert_eq!(p.resolve(-1, 5), Some(4));
        assert_eq!(p.resolve(5, 5), Some(0));
        assert_eq!(p.resolve(2, 5), Some(2));
    }

    #[test]
    fn test_clamped_edge() {
        let p = BoundaryPolicy::ClampedEdge;
        assert_eq!(p.resolve(-3, 5), Some(0));
        assert_eq!(p.resolve(7, 5), Some(4));
        assert_eq!(p.resolve(0, 5), Some(0));
    }

    #[test]
    fn test_zero_pad_drops_outside() {
        let p = BoundaryPolicy::ZeroPad;
        assert_eq!(p.resolve(-1, 5), None);
        assert_eq!(p.resolve(5, 5), None);
        assert_eq!(p.resolve(4, 5), Some(4));
    }
}
