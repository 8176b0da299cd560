use crate::error::GrowthError;
use std::sync::mpsc::{Sender, SyncSender};
use std::sync::Arc;

/// Immutable copy of the grid occupancy at one point of the run
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    size: usize,
    cells: Arc<[bool]>,
    pub stuck_count: usize,
    pub num_particles: usize,
    /// Set on the unconditional snapshot emitted after the last stick
    pub is_final: bool,
}

impl Snapshot {
    pub fn new(
        size: usize,
        cells: Arc<[bool]>,
        stuck_count: usize,
        num_particles: usize,
        is_final: bool,
    ) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self {
            size,
            cells,
            stuck_count,
            num_particles,
            is_final,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Out-of-range coordinates read as empty
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[y * self.size + x]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Distance of `(x, y)` from the centre cell divided by `radius`, clamped
    /// to 0.0..=1.0. Used to pick a gradient color.
    pub fn radial_shade(&self, x: usize, y: usize, radius: f32) -> f32 {
        let c = (self.size / 2) as f32;
        let dx = x as f32 - c;
        let dy = y as f32 - c;
        ((dx * dx + dy * dy).sqrt() / radius.max(1.0)).clamp(0.0, 1.0)
    }
}

/// Consumer of the snapshot stream. Ownership of each snapshot moves to the
/// sink; returning an error stops the growth run.
pub trait SnapshotSink {
    fn emit(&mut self, snapshot: Snapshot) -> Result<(), GrowthError>;
}

/// Drops every snapshot; for runs that only need the progress log
pub struct DiscardSink;

impl SnapshotSink for DiscardSink {
    fn emit(&mut self, _snapshot: Snapshot) -> Result<(), GrowthError> {
        Ok(())
    }
}

impl SnapshotSink for Vec<Snapshot> {
    fn emit(&mut self, snapshot: Snapshot) -> Result<(), GrowthError> {
        self.push(snapshot);
        Ok(())
    }
}

impl SnapshotSink for Sender<Snapshot> {
    fn emit(&mut self, snapshot: Snapshot) -> Result<(), GrowthError> {
        self.send(snapshot).map_err(|_| GrowthError::SinkClosed)
    }
}

impl SnapshotSink for SyncSender<Snapshot> {
    fn emit(&mut self, snapshot: Snapshot) -> Result<(), GrowthError> {
        self.send(snapshot).map_err(|_| GrowthError::SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn sample(stuck: usize) -> Snapshot {
        let mut cells = vec![false; 9];
        cells[4] = true;
        Snapshot::new(3, cells.into(), stuck, 10, false)
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        let snapshot = sample(1);
        assert!(snapshot.is_occupied(1, 1));
        assert!(!snapshot.is_occupied(3, 1));
        assert!(!snapshot.is_occupied(1, 3));
    }

    #[test]
    fn test_radial_shade() {
        let snapshot = sample(1);
        assert_eq!(snapshot.radial_shade(1, 1, 1.0), 0.0);
        assert_eq!(snapshot.radial_shade(2, 1, 2.0), 0.5);
        assert_eq!(snapshot.radial_shade(0, 0, 1.0), 1.0);
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (mut tx, rx) = mpsc::channel();
        tx.emit(sample(1)).unwrap();
        tx.emit(sample(2)).unwrap();
        let received: Vec<usize> = rx.try_iter().map(|s| s.stuck_count).collect();
        assert_eq!(received, vec![1, 2]);
    }

    #[test]
    fn test_channel_sink_reports_closed_receiver() {
        let (mut tx, rx) = mpsc::sync_channel(1);
        drop(rx);
        assert!(matches!(tx.emit(sample(1)), Err(GrowthError::SinkClosed)));
    }
}
