use anyhow::Result;
use reaction2d::{FieldStats, Simulation, SimulationConfig, SnapshotHistory};

fn main() -> Result<()> {
    let mut config = SimulationConfig::coral();
    config.size = 128;
    config.total_steps = 2_000;
    config.snapshot_interval = 500;

    let sim = Simulation::new(config)?;

    let mut history = SnapshotHistory::new();
    sim.run_with_progress(&mut history, 500, |p| {
        println!(
            "step {:>5}/{} (t = {:.0}): B mean = {:.4}, max = {:.4}",
            p.steps_done, p.total_steps, p.sim_time, p.stats_b.mean, p.stats_b.max
        );
    })?;

    println!();
    for snap in history.iter() {
        let stats = FieldStats::of(&snap.field_b);
        println!(
            "snapshot @ {:>5}: B in [{:.4}, {:.4}], total mass {:.2}",
            snap.iteration, stats.min, stats.max, stats.total_mass
        );
    }

    Ok(())
}
