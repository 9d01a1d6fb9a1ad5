use anyhow::Result;
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::diagnostics::FieldStats;
use crate::grid::Grid;
use crate::seed;
use crate::snapshot::{Snapshot, SnapshotHistory, SnapshotSink};

/// Progress of an ongoing run, reported through `run_with_progress`.
#[derive(Debug, Clone, Copy)]
pub struct SimulationProgress {
    /// Number of completed steps (0..=total_steps).
    pub steps_done: usize,
    /// Target number of steps from the configuration.
    pub total_steps: usize,
    /// Time increment per step.
    pub dt: f64,
    /// Simulated time elapsed (`steps_done * dt`).
    pub sim_time: f64,
    /// Summary statistics of reactant A.
    pub stats_a: FieldStats,
    /// Summary statistics of reactant B.
    pub stats_b: FieldStats,
}

trait ProgressReporter {
    fn every_steps(&self) -> usize;
    fn report(&mut self, progress: &SimulationProgress);
}

struct NoProgress;
impl ProgressReporter for NoProgress {
    fn every_steps(&self) -> usize {
        0
    }
    fn report(&mut self, _progress: &SimulationProgress) {}
}

struct FnProgress<F> {
    every_steps: usize,
    f: F,
}
impl<F> ProgressReporter for FnProgress<F>
where
    F: FnMut(&SimulationProgress),
{
    fn every_steps(&self) -> usize {
        self.every_steps
    }
    fn report(&mut self, progress: &SimulationProgress) {
        (self.f)(progress);
    }
}

/// The Gray-Scott reaction-diffusion simulator.
///
/// Owns the two concentration fields plus a second pair of buffers so each
/// step is a simultaneous update: both next fields are computed entirely
/// from the previous `A` and `B`, and the buffers are swapped only after the
/// whole grid has been written. Step order therefore never couples into the
/// numerical result.
pub struct Simulation {
    config: SimulationConfig,
    field_a: Grid,
    field_b: Grid,
    next_a: Grid,
    next_b: Grid,
    iteration: usize,
}

impl Simulation {
    /// Creates a simulation with seeded initial fields: A uniformly 1.0,
    /// B uniformly 0.0 except the configured seed region set to 1.0.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let (field_a, field_b) =
            seed::initialize(config.size, &config.seed_region, config.noise.as_ref());
        Ok(Self::from_parts(config, field_a, field_b))
    }

    /// Creates a simulation from explicit initial fields.
    pub fn with_fields(config: SimulationConfig, field_a: Grid, field_b: Grid) -> Result<Self> {
        config.validate()?;
        let n = config.size;
        anyhow::ensure!(
            field_a.width() == n
                && field_a.height() == n
                && field_b.width() == n
                && field_b.height() == n,
            "initial fields must be {n}x{n}, got A {}x{} and B {}x{}",
            field_a.width(),
            field_a.height(),
            field_b.width(),
            field_b.height(),
        );
        Ok(Self::from_parts(config, field_a, field_b))
    }

    fn from_parts(config: SimulationConfig, field_a: Grid, field_b: Grid) -> Self {
        let n = config.size;
        Self {
            config,
            field_a,
            field_b,
            next_a: Grid::new(n, n, 0.0),
            next_b: Grid::new(n, n, 0.0),
            iteration: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn field_a(&self) -> &Grid {
        &self.field_a
    }

    pub fn field_b(&self) -> &Grid {
        &self.field_b
    }

    /// Number of completed steps.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Deep copy of the current state, tagged with the iteration index.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            iteration: self.iteration,
            field_a: self.field_a.clone(),
            field_b: self.field_b.clone(),
        }
    }

    fn progress(&self) -> SimulationProgress {
        SimulationProgress {
            steps_done: self.iteration,
            total_steps: self.config.total_steps,
            dt: self.config.dt,
            sim_time: self.iteration as f64 * self.config.dt,
            stats_a: FieldStats::of(&self.field_a),
            stats_b: FieldStats::of(&self.field_b),
        }
    }

    /// Advances the simulation by one step.
    ///
    /// For every cell, with `L` the stencil convolution:
    ///
    /// ```text
    /// A' = A + (D_A * L_A - A*B^2 + f*(1 - A)) * dt
    /// B' = B + (D_B * L_B + A*B^2 - (k + f)*B) * dt
    /// ```
    ///
    /// `B'` is computed from the original `A`, never the updated one.
    pub fn step(&mut self) {
        let width = self.config.size;
        let kernel = self.config.kernel;
        let policy = self.config.boundary;
        let diff_a = self.config.diff_a;
        let diff_b = self.config.diff_b;
        let feed = self.config.feed;
        let kill = self.config.kill;
        let dt = self.config.dt;

        let field_a = &self.field_a;
        let field_b = &self.field_b;

        let update_row = |y: usize, row_a: &mut [f64], row_b: &mut [f64]| {
            for x in 0..width {
                let a = field_a.get(x, y);
                let b = field_b.get(x, y);
                let lap_a = kernel.convolve_at(field_a, x, y, policy);
                let lap_b = kernel.convolve_at(field_b, x, y, policy);
                let reaction = a * b * b;

                row_a[x] = a + (diff_a * lap_a - reaction + feed * (1.0 - a)) * dt;
                row_b[x] = b + (diff_b * lap_b + reaction - (kill + feed) * b) * dt;
            }
        };

        if self.config.parallel {
            self.next_a
                .as_mut_slice()
                .par_chunks_mut(width)
                .zip(self.next_b.as_mut_slice().par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (row_a, row_b))| update_row(y, row_a, row_b));
        } else {
            self.next_a
                .as_mut_slice()
                .chunks_mut(width)
                .zip(self.next_b.as_mut_slice().chunks_mut(width))
                .enumerate()
                .for_each(|(y, (row_a, row_b))| update_row(y, row_a, row_b));
        }

        std::mem::swap(&mut self.field_a, &mut self.next_a);
        std::mem::swap(&mut self.field_b, &mut self.next_b);
        self.iteration += 1;
    }

    /// Runs `total_steps` steps, collecting snapshots at iteration 0 and
    /// every `snapshot_interval` steps.
    pub fn run(self) -> Result<SnapshotHistory> {
        let mut history = SnapshotHistory::new();
        self.run_into(&mut history)?;
        Ok(history)
    }

    /// Runs to completion, delivering snapshots to a caller-supplied sink.
    pub fn run_into<S: SnapshotSink>(self, sink: &mut S) -> Result<()> {
        self.run_inner(sink, NoProgress)
    }

    /// Runs to completion while periodically reporting progress.
    ///
    /// - `every_steps = 0` disables progress reporting.
    /// - The reporter is called once at start (`steps_done = 0`), then every
    ///   `every_steps`, plus once at the final step.
    pub fn run_with_progress<S, F>(self, sink: &mut S, every_steps: usize, report: F) -> Result<()>
    where
        S: SnapshotSink,
        F: FnMut(&SimulationProgress),
    {
        self.run_inner(
            sink,
            FnProgress {
                every_steps,
                f: report,
            },
        )
    }

    fn run_inner<S: SnapshotSink, R: ProgressReporter>(
        mut self,
        sink: &mut S,
        mut reporter: R,
    ) -> Result<()> {
        let total_steps = self.config.total_steps;
        let interval = self.config.snapshot_interval;
        let report_every = reporter.every_steps();

        sink.record(self.snapshot())?;
        if report_every > 0 {
            reporter.report(&self.progress());
        }

        for _ in 0..total_steps {
            self.step();

            if self.iteration.is_multiple_of(interval) {
                sink.record(self.snapshot())?;
            }

            if report_every > 0
                && (self.iteration.is_multiple_of(report_every) || self.iteration == total_steps)
            {
                reporter.report(&self.progress());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryPolicy;
    use crate::kernel::StencilKernel;
    use crate::seed::SeedRegion;

    fn small_config(size: usize) -> SimulationConfig {
        let mut config = SimulationConfig::new();
        config.size = size;
        config.parallel = false;
        config
    }

    /// Hand-computed single step on a 3x3 periodic grid with A all 1.0 and
    /// B all 0.0 except the center cell.
    ///
    /// With wrap-around, the 3x3 neighborhood of any cell covers each cell
    /// exactly once, so the Laplacian of B picks up exactly one kernel
    /// weight per cell: -1 at the center, 0.2 at edges, 0.05 at corners.
    /// L_A is zero (uniform field), hence with f=0.055, k=0.062, D_B=0.5,
    /// dt=1:
    ///   A'(center) = 1 - 1*1^2            = 0.0
    ///   A'(else)   = 1                    = 1.0
    ///   B'(center) = 1 + (-0.5 + 1 - 0.117) = 1.383
    ///   B'(edge)   = 0.5 * 0.2            = 0.1
    ///   B'(corner) = 0.5 * 0.05           = 0.025
    #[test]
    fn test_single_step_hand_computed() {
        let config = small_config(3);
        let mut sim = Simulation::new(config).unwrap();

        // initialize() seeds exactly the center cell for size 3.
        assert_eq!(sim.field_b().get(1, 1), 1.0);
        assert_eq!(sim.field_b().get(0, 0), 0.0);

        sim.step();

        let tol = 1e-9;
        assert!((sim.field_a().get(1, 1) - 0.0).abs() < tol);
        assert!((sim.field_a().get(0, 0) - 1.0).abs() < tol);
        assert!((sim.field_b().get(1, 1) - 1.383).abs() < tol);
        assert!((sim.field_b().get(1, 0) - 0.1).abs() < tol);
        assert!((sim.field_b().get(0, 0) - 0.025).abs() < tol);
    }

    /// B'(center) = 1.383 only holds when the reaction term uses the
    /// original A (= 1.0). Sequential reuse of the already-updated
    /// A (= 0.0) would give 0.383 instead.
    #[test]
    fn test_update_is_simultaneous_not_sequential() {
        let mut sim = Simulation::new(small_config(3)).unwrap();
        sim.step();
        assert!((sim.field_b().get(1, 1) - 1.383).abs() < 1e-9);
    }

    #[test]
    fn test_step_preserves_dimensions() {
        let mut sim = Simulation::new(small_config(8)).unwrap();
        for _ in 0..5 {
            sim.step();
        }
        assert_eq!(sim.field_a().width(), 8);
        assert_eq!(sim.field_a().height(), 8);
        assert_eq!(sim.field_b().width(), 8);
        assert_eq!(sim.field_b().height(), 8);
        assert_eq!(sim.iteration(), 5);
    }

    #[test]
    fn test_run_zero_steps_yields_initial_snapshot_only() {
        let mut config = small_config(5);
        config.total_steps = 0;
        let history = Simulation::new(config).unwrap().run().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(0).unwrap().iteration, 0);
    }

    #[test]
    fn test_with_fields_rejects_mismatched_dimensions() {
        let config = small_config(5);
        let a = Grid::new(5, 5, 1.0);
        let b = Grid::new(4, 5, 0.0);
        assert!(Simulation::with_fields(config, a, b).is_err());
    }

    #[test]
    fn test_parallel_matches_serial_bit_for_bit() {
        // dt = 0.25 keeps the run finite, so grid equality is not confused
        // by NaN != NaN.
        let mut serial = small_config(16);
        serial.dt = 0.25;
        serial.total_steps = 50;
        serial.snapshot_interval = 10;
        let mut parallel = serial.clone();
        parallel.parallel = true;

        let h_serial = Simulation::new(serial).unwrap().run().unwrap();
        let h_parallel = Simulation::new(parallel).unwrap().run().unwrap();
        assert!(h_serial.last().unwrap().field_b.is_finite());
        assert_eq!(h_serial, h_parallel);
    }

    #[test]
    fn test_five_point_kernel_and_clamped_edges_run() {
        let mut config = small_config(9);
        config.dt = 0.25;
        config.kernel = StencilKernel::five_point();
        config.boundary = BoundaryPolicy::ClampedEdge;
        config.seed_region = SeedRegion::Rect {
            x0: 0,
            y0: 0,
            width: 2,
            height: 2,
        };
        config.total_steps = 20;
        config.snapshot_interval = 20;
        let history = Simulation::new(config).unwrap().run().unwrap();
        assert_eq!(history.iterations(), vec![0, 20]);
        assert!(history.last().unwrap().field_b.is_finite());
    }
}
