use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// An immutable deep copy of both fields, tagged with the iteration index
/// at which it was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub iteration: usize,
    pub field_a: Grid,
    pub field_b: Grid,
}

/// Receives snapshots as the run produces them.
///
/// The sink is supplied by the caller, so snapshot accumulation never relies
/// on process-wide mutable state, and memory use can be bounded by sinks
/// that do not retain the grids.
pub trait SnapshotSink {
    fn record(&mut self, snapshot: Snapshot) -> Result<()>;
}

/// Vec-backed sink retaining every snapshot in order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// The iteration index of each retained snapshot, in capture order.
    pub fn iterations(&self) -> Vec<usize> {
        self.snapshots.iter().map(|s| s.iteration).collect()
    }

    pub fn into_vec(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

impl SnapshotSink for SnapshotHistory {
    fn record(&mut self, snapshot: Snapshot) -> Result<()> {
        self.snapshots.push(snapshot);
        Ok(())
    }
}

impl IntoIterator for SnapshotHistory {
    type Item = Snapshot;
    type IntoIter = std::vec::IntoIter<Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.into_iter()
    }
}

/// Sink that drops the grids and only counts captures.
///
/// Useful for long runs where only the loop behavior matters, since it keeps
/// memory flat regardless of `total_steps`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotCounter {
    recorded: usize,
    last_iteration: Option<usize>,
}

impl SnapshotCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn last_iteration(&self) -> Option<usize> {
        self.last_iteration
    }
}

impl SnapshotSink for SnapshotCounter {
    fn record(&mut self, snapshot: Snapshot) -> Result<()> {
        self.recorded += 1;
        self.last_iteration = Some(snapshot.iteration);
        Ok(())
    }
}
