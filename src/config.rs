use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryPolicy;
use crate::kernel::StencilKernel;
use crate::seed::{SeedNoise, SeedRegion};

/// Full configuration of a Gray-Scott run.
///
/// `new()` returns the classic coral-growth regime on a 500x500 grid.
/// Call [`SimulationConfig::validate`] (done by `Simulation::new`) before
/// running; invalid values fail fast instead of producing a partial run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimension; both fields are `size x size`. Must be >= 3 (the
    /// stencil size).
    pub size: usize,
    /// Diffusion coefficient of reactant A. Must be positive.
    pub diff_a: f64,
    /// Diffusion coefficient of reactant B. Must be positive.
    pub diff_b: f64,
    /// Feed rate: replenishes A toward concentration 1. Non-negative.
    pub feed: f64,
    /// Kill rate: removes B from the system. Non-negative.
    pub kill: f64,
    /// Time increment per step. Must be positive (the classic formulation
    /// uses an implicit unit step, so the default is 1.0).
    pub dt: f64,
    /// Number of steps a `run` advances.
    pub total_steps: usize,
    /// A snapshot is captured at iteration 0 and every `snapshot_interval`
    /// steps. Must be >= 1. Total snapshot memory is
    /// O(total_steps / snapshot_interval * size^2), so bound long runs here.
    pub snapshot_interval: usize,
    /// Boundary policy for the stencil, fixed for the whole run.
    pub boundary: BoundaryPolicy,
    /// Where reactant B starts at concentration 1.
    pub seed_region: SeedRegion,
    /// Optional reproducible perturbation of the seeded cells.
    pub noise: Option<SeedNoise>,
    /// The 3x3 Laplacian stencil.
    pub kernel: StencilKernel,
    /// Parallelize the per-cell update across rows. Serial and parallel
    /// runs are bit-identical; turn off to pin single-threaded execution.
    pub parallel: bool,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            size: 500,
            diff_a: 1.0,
            diff_b: 0.5,
            feed: 0.055,
            kill: 0.062,
            dt: 1.0,
            total_steps: 10_000,
            snapshot_interval: 1_000,
            boundary: BoundaryPolicy::Periodic,
            seed_region: SeedRegion::default(),
            noise: None,
            kernel: StencilKernel::nine_point(),
            parallel: true,
        }
    }

    /// Coral-like branching growth (same as `new()`).
    pub fn coral() -> Self {
        Self {
            feed: 0.0545,
            kill: 0.062,
            ..Self::new()
        }
    }

    /// Spots that split in two, reminiscent of cell division.
    pub fn mitosis() -> Self {
        Self {
            feed: 0.0367,
            kill: 0.0649,
            ..Self::new()
        }
    }

    /// Stable solitary spots.
    pub fn solitons() -> Self {
        Self {
            feed: 0.03,
            kill: 0.062,
            ..Self::new()
        }
    }

    /// Checks the configuration, returning a descriptive error on the first
    /// invalid value.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.size >= 3,
            "grid size must be at least 3 (the stencil size), got {}",
            self.size
        );
        anyhow::ensure!(
            self.diff_a > 0.0,
            "diffusion coefficient diff_a must be positive, got {}",
            self.diff_a
        );
        anyhow::ensure!(
            self.diff_b > 0.0,
            "diffusion coefficient diff_b must be positive, got {}",
            self.diff_b
        );
        anyhow::ensure!(
            self.feed >= 0.0,
            "feed rate must be non-negative, got {}",
            self.feed
        );
        anyhow::ensure!(
            self.kill >= 0.0,
            "kill rate must be non-negative, got {}",
            self.kill
        );
        anyhow::ensure!(self.dt > 0.0, "dt must be positive, got {}", self.dt);
        anyhow::ensure!(
            self.snapshot_interval >= 1,
            "snapshot_interval must be at least 1, got {}",
            self.snapshot_interval
        );
        if let SeedRegion::CenteredSquare { fraction } = self.seed_region {
            anyhow::ensure!(
                fraction > 0.0 && fraction <= 1.0,
                "seed fraction must be in (0, 1], got {fraction}"
            );
        }
        if let Some(noise) = &self.noise {
            anyhow::ensure!(
                noise.amplitude >= 0.0,
                "seed noise amplitude must be non-negative, got {}",
                noise.amplitude
            );
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
