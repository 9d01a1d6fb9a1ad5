pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod grid;
pub mod kernel;
pub mod seed;
pub mod simulation;
pub mod snapshot;

// Prelude
pub use boundary::BoundaryPolicy;
pub use config::SimulationConfig;
pub use diagnostics::{FieldStats, NonFiniteWatch};
pub use grid::Grid;
pub use kernel::{StencilKernel, laplacian};
pub use seed::{SeedNoise, SeedRegion, initialize};
pub use simulation::{Simulation, SimulationProgress};
pub use snapshot::{Snapshot, SnapshotCounter, SnapshotHistory, SnapshotSink};
