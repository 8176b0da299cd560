use crate::error::GrowthError;
use crate::grid::Grid;
use crate::settings::GrowthSettings;
use crate::snapshot::{Snapshot, SnapshotSink};
use crate::walker::{WalkLimits, Walker, WalkerState};
use rand::Rng;
use tracing::{debug, info, warn};

/// Counters for a growth run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterStats {
    /// Particles in the aggregate, seed included
    pub stuck_count: usize,
    pub num_particles: usize,
    /// Respawns caused by leaving the grid or the kill circle
    pub escapes: u64,
    /// Respawns caused by running out of steps
    pub exhaustions: u64,
    /// Largest distance of a stuck particle from the centre
    pub cluster_radius: f64,
}

/// Drives walkers one at a time until the aggregate reaches its target size
pub struct ClusterGrower<R: Rng> {
    grid: Grid,
    settings: GrowthSettings,
    limits: WalkLimits,
    stats: ClusterStats,
    rng: R,
    radius_warned: bool,
}

impl<R: Rng> ClusterGrower<R> {
    /// Validate settings and allocate the seeded grid. Nothing is spawned yet.
    pub fn new(settings: GrowthSettings, rng: R) -> Result<Self, GrowthError> {
        settings.validate()?;
        let grid = Grid::new(settings.grid_size)?;
        let limits = WalkLimits {
            spawn_radius: settings.spawn_radius,
            kill_radius_sq: settings.kill_radius_sq(),
            max_steps: settings.max_steps_per_walker,
        };
        let stats = ClusterStats {
            stuck_count: 1,
            num_particles: settings.num_particles,
            ..Default::default()
        };
        Ok(Self {
            grid,
            settings,
            limits,
            stats,
            rng,
            radius_warned: false,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stats(&self) -> &ClusterStats {
        &self.stats
    }

    pub fn settings(&self) -> &GrowthSettings {
        &self.settings
    }

    pub fn is_complete(&self) -> bool {
        self.stats.stuck_count >= self.stats.num_particles
    }

    /// Release walkers until one sticks and return where it stuck.
    /// Returns `None` once the target count is reached.
    ///
    /// There is no cap on respawns: with a finite grid and kill circle every
    /// walker escapes or exhausts in bounded time, but a configuration where
    /// sticking is rare can keep this looping for a very long time.
    pub fn grow_one(&mut self) -> Option<(i32, i32)> {
        if self.is_complete() {
            return None;
        }

        let mut walker = Walker::spawn(&self.grid, &mut self.rng, self.limits.spawn_radius);
        loop {
            let state = walker.step(&self.grid, &mut self.rng, &self.limits);
            match state {
                WalkerState::Stuck => {
                    let (x, y) = walker.position();
                    debug!(x, y, steps = walker.steps(), "particle stuck");
                    self.stick(x, y);
                    return Some((x, y));
                }
                WalkerState::Escaped => self.stats.escapes += 1,
                WalkerState::Exhausted => self.stats.exhaustions += 1,
                WalkerState::Spawned | WalkerState::Walking => {}
            }
            if state.needs_respawn() {
                walker.respawn(&self.grid, &mut self.rng, self.limits.spawn_radius);
                debug_assert_eq!(walker.state(), WalkerState::Spawned);
            }
        }
    }

    fn stick(&mut self, x: i32, y: i32) {
        self.grid.occupy(x, y);
        self.stats.stuck_count += 1;

        let (cx, cy) = self.grid.center();
        let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
        self.stats.cluster_radius = self.stats.cluster_radius.max((dx * dx + dy * dy).sqrt());

        if !self.radius_warned && self.stats.cluster_radius >= self.settings.spawn_radius {
            self.radius_warned = true;
            warn!(
                stuck = self.stats.stuck_count,
                spawn_radius = self.settings.spawn_radius,
                "cluster reached the spawn circle; walkers will escape more often (raise spawn_radius/kill_radius to avoid)"
            );
        }
    }

    fn snapshot(&self, is_final: bool) -> Snapshot {
        self.grid
            .snapshot(self.stats.stuck_count, self.stats.num_particles, is_final)
    }

    /// Grow to the target count, emitting a snapshot every
    /// `snapshot_cadence` sticks and one final snapshot at the end.
    pub fn run<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<ClusterStats, GrowthError> {
        info!(
            grid_size = self.grid.size(),
            num_particles = self.settings.num_particles,
            spawn_radius = self.settings.spawn_radius,
            kill_radius = self.settings.kill_radius,
            "starting growth"
        );

        let cadence = self.settings.snapshot_cadence;
        while self.grow_one().is_some() {
            if self.stats.stuck_count % cadence == 0 {
                info!("stuck {} of {}", self.stats.stuck_count, self.stats.num_particles);
                sink.emit(self.snapshot(false))?;
            }
        }

        sink.emit(self.snapshot(true))?;
        info!(
            escapes = self.stats.escapes,
            exhaustions = self.stats.exhaustions,
            cluster_radius = self.stats.cluster_radius,
            occupied = self.grid.occupied_count(),
            "growth finished"
        );
        Ok(self.stats.clone())
    }
}
