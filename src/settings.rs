use crate::error::GrowthError;
use serde::{Deserialize, Serialize};

/// Distance between the spawn circle and the grid half-width in the default layout
const RADIUS_MARGIN: usize = 5;

/// All growth parameters consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredGrowthSettings")]
pub struct GrowthSettings {
    /// Lattice extent; must be odd so the seed sits on a true centre cell
    pub grid_size: usize,
    /// Target stuck count, seed included
    pub num_particles: usize,
    /// Distance from centre where walkers appear
    pub spawn_radius: f64,
    /// Distance from centre beyond which a walker is discarded
    pub kill_radius: f64,
    /// Steps a walker may take before it is respawned
    pub max_steps_per_walker: u32,
    /// Emit a snapshot every N sticks
    pub snapshot_cadence: usize,
    /// RNG seed; `None` draws one at startup
    pub seed: Option<u64>,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            grid_size: 301,
            num_particles: 3000,
            spawn_radius: 0.0,
            kill_radius: 0.0,
            max_steps_per_walker: 20_000,
            snapshot_cadence: 50,
            seed: None,
        }
        .with_grid_size(301)
    }
}

/// Growth settings as read from a config file. Any field may be missing; a
/// missing radius is derived from the grid size in the same file.
#[derive(Deserialize)]
#[serde(default)]
struct StoredGrowthSettings {
    grid_size: usize,
    num_particles: usize,
    spawn_radius: Option<f64>,
    kill_radius: Option<f64>,
    max_steps_per_walker: u32,
    snapshot_cadence: usize,
    seed: Option<u64>,
}

impl Default for StoredGrowthSettings {
    fn default() -> Self {
        let defaults = GrowthSettings::default();
        Self {
            grid_size: defaults.grid_size,
            num_particles: defaults.num_particles,
            spawn_radius: None,
            kill_radius: None,
            max_steps_per_walker: defaults.max_steps_per_walker,
            snapshot_cadence: defaults.snapshot_cadence,
            seed: defaults.seed,
        }
    }
}

impl From<StoredGrowthSettings> for GrowthSettings {
    fn from(stored: StoredGrowthSettings) -> Self {
        let derived = GrowthSettings {
            num_particles: stored.num_particles,
            max_steps_per_walker: stored.max_steps_per_walker,
            snapshot_cadence: stored.snapshot_cadence,
            seed: stored.seed,
            ..GrowthSettings::default()
        }
        .with_grid_size(stored.grid_size);
        GrowthSettings {
            spawn_radius: stored.spawn_radius.unwrap_or(derived.spawn_radius),
            kill_radius: stored.kill_radius.unwrap_or(derived.kill_radius),
            ..derived
        }
    }
}

impl GrowthSettings {
    /// Set the grid size and re-derive both radii from it.
    ///
    /// The spawn circle sits just inside the grid half-width and the kill
    /// circle just outside it. Neither grows with the cluster.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        let half = grid_size / 2;
        self.grid_size = grid_size;
        self.spawn_radius = half.saturating_sub(RADIUS_MARGIN) as f64;
        self.kill_radius = (half + RADIUS_MARGIN) as f64;
        self
    }

    pub fn kill_radius_sq(&self) -> f64 {
        self.kill_radius * self.kill_radius
    }

    /// Reject configurations the growth loop cannot run with
    pub fn validate(&self) -> Result<(), GrowthError> {
        if self.grid_size == 0 {
            return Err(GrowthError::InvalidConfig("grid_size must be positive"));
        }
        if self.grid_size % 2 == 0 {
            return Err(GrowthError::InvalidConfig(
                "grid_size must be odd so the grid has a centre cell",
            ));
        }
        if self.num_particles == 0 {
            return Err(GrowthError::InvalidConfig("num_particles must be positive"));
        }
        if self.num_particles > self.grid_size.saturating_mul(self.grid_size) {
            return Err(GrowthError::InvalidConfig(
                "num_particles cannot exceed the number of grid cells",
            ));
        }
        if !self.spawn_radius.is_finite() || self.spawn_radius < 0.0 {
            return Err(GrowthError::InvalidConfig(
                "spawn_radius must be finite and non-negative",
            ));
        }
        if !self.kill_radius.is_finite() {
            return Err(GrowthError::InvalidConfig("kill_radius must be finite"));
        }
        if self.spawn_radius >= self.kill_radius {
            return Err(GrowthError::InvalidConfig(
                "spawn_radius must be smaller than kill_radius",
            ));
        }
        // Keeps every spawn point on the lattice, well inside i32 range
        if self.spawn_radius > (self.grid_size / 2) as f64 {
            return Err(GrowthError::InvalidConfig(
                "spawn_radius must fit inside the grid half-width",
            ));
        }
        if self.snapshot_cadence == 0 {
            return Err(GrowthError::InvalidConfig("snapshot_cadence must be positive"));
        }
        Ok(())
    }
}
