use crate::grid::Grid;
use rand::Rng;

/// The 8 unit moves, each drawn with probability 1/8. Diagonal moves cover
/// √2 the distance of axis moves.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Where a walker is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerState {
    /// Freshly placed on the spawn circle, no step taken yet
    Spawned,
    Walking,
    /// Touching the cluster; terminal
    Stuck,
    /// Left the grid or the kill circle; respawn
    Escaped,
    /// Ran out of steps; respawn
    Exhausted,
}

impl WalkerState {
    /// Escaped and exhausted walkers are put back on the spawn circle
    pub fn needs_respawn(&self) -> bool {
        matches!(self, WalkerState::Escaped | WalkerState::Exhausted)
    }
}

/// Termination thresholds shared by every walker of a run
#[derive(Debug, Clone, Copy)]
pub struct WalkLimits {
    pub spawn_radius: f64,
    pub kill_radius_sq: f64,
    pub max_steps: u32,
}

/// A single random-walking particle
#[derive(Debug, Clone)]
pub struct Walker {
    x: i32,
    y: i32,
    steps: u32,
    state: WalkerState,
}

impl Walker {
    /// Place a walker on the spawn circle around the grid centre
    pub fn spawn<R: Rng + ?Sized>(grid: &Grid, rng: &mut R, spawn_radius: f64) -> Self {
        let (x, y) = grid.sample_on_circle(rng, spawn_radius);
        Self::at(x, y)
    }

    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            steps: 0,
            state: WalkerState::Spawned,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn state(&self) -> WalkerState {
        self.state
    }

    /// Resample a spawn point and reset the step counter
    pub fn respawn<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R, spawn_radius: f64) {
        *self = Self::spawn(grid, rng, spawn_radius);
    }

    /// Take one random step
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R, limits: &WalkLimits) -> WalkerState {
        let direction = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
        self.advance(grid, direction, limits)
    }

    /// Move by `(dx, dy)` and classify the new position.
    ///
    /// Escape is checked first, so adjacency is only tested on in-bounds
    /// cells inside the kill circle. A walker on a cell that is already
    /// occupied keeps walking rather than sticking there, so the stuck count
    /// always equals the number of occupied cells; counting a stick on an
    /// occupied cell would let the two drift apart.
    pub fn advance(&mut self, grid: &Grid, (dx, dy): (i32, i32), limits: &WalkLimits) -> WalkerState {
        debug_assert!(!matches!(self.state, WalkerState::Stuck));
        self.x += dx;
        self.y += dy;
        self.steps += 1;

        let (cx, cy) = grid.center();
        let (ox, oy) = ((self.x - cx) as f64, (self.y - cy) as f64);
        let dist_sq = ox * ox + oy * oy;

        self.state = if !grid.in_bounds(self.x, self.y) || dist_sq > limits.kill_radius_sq {
            WalkerState::Escaped
        } else if !grid.is_occupied(self.x, self.y) && grid.has_occupied_neighbor(self.x, self.y) {
            WalkerState::Stuck
        } else if self.steps > limits.max_steps {
            WalkerState::Exhausted
        } else {
            WalkerState::Walking
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn limits(max_steps: u32) -> WalkLimits {
        WalkLimits {
            spawn_radius: 3.0,
            kill_radius_sq: 64.0,
            max_steps,
        }
    }

    #[test]
    fn test_directions_are_distinct_unit_moves() {
        for (i, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
            assert!(!DIRECTIONS[i + 1..].contains(&(dx, dy)));
        }
    }

    #[test]
    fn test_walker_sticks_next_to_seed() {
        let grid = Grid::new(11).unwrap();
        let mut walker = Walker::at(5, 7);
        assert_eq!(walker.state(), WalkerState::Spawned);

        let state = walker.advance(&grid, (0, -1), &limits(100));
        assert_eq!(state, WalkerState::Stuck);
        assert_eq!(walker.position(), (5, 6));
        assert_eq!(walker.steps(), 1);
    }

    #[test]
    fn test_walker_exhausts_after_max_steps() {
        let grid = Grid::new(11).unwrap();
        // Shuffle between (1, 5) and (1, 4): two cells from the seed, well inside the kill circle
        let mut walker = Walker::at(1, 5);
        let limits = limits(5);
        for i in 0..5 {
            let dir = if i % 2 == 0 { (0, -1) } else { (0, 1) };
            assert_eq!(walker.advance(&grid, dir, &limits), WalkerState::Walking);
        }
        assert_eq!(walker.advance(&grid, (0, -1), &limits), WalkerState::Exhausted);
        assert_eq!(walker.steps(), 6);
        assert!(walker.state().needs_respawn());

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        walker.respawn(&grid, &mut rng, 3.0);
        assert_eq!(walker.steps(), 0);
        assert_eq!(walker.state(), WalkerState::Spawned);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_walker_escapes_past_kill_radius() {
        let grid = Grid::new(21).unwrap();
        // (18, 10) is 8 from centre (10, 10); one more step puts it at 9 > 8
        let mut walker = Walker::at(17, 10);
        assert_eq!(walker.advance(&grid, (1, 0), &limits(100)), WalkerState::Walking);
        assert_eq!(walker.advance(&grid, (1, 0), &limits(100)), WalkerState::Escaped);
    }

    #[test]
    fn test_walker_escapes_off_grid() {
        let grid = Grid::new(11).unwrap();
        let wide = WalkLimits {
            kill_radius_sq: 1.0e9,
            ..limits(100)
        };
        let mut walker = Walker::at(0, 5);
        assert_eq!(walker.advance(&grid, (-1, 0), &wide), WalkerState::Escaped);
    }

    #[test]
    fn test_escape_takes_precedence_over_adjacency() {
        let mut grid = Grid::new(11).unwrap();
        grid.occupy(10, 10);
        // (11, 10) touches (10, 10) but is off the grid
        let mut walker = Walker::at(10, 9);
        let wide = WalkLimits {
            kill_radius_sq: 1.0e9,
            ..limits(100)
        };
        assert_eq!(walker.advance(&grid, (1, 1), &wide), WalkerState::Escaped);
    }

    #[test]
    fn test_walker_on_occupied_cell_keeps_walking() {
        let mut grid = Grid::new(11).unwrap();
        grid.occupy(5, 6);
        let mut walker = Walker::at(5, 7);
        assert_eq!(walker.advance(&grid, (0, -1), &limits(100)), WalkerState::Walking);
        assert_eq!(walker.position(), (5, 6));
    }

    #[test]
    fn test_random_step_moves_one_cell() {
        let grid = Grid::new(101).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut walker = Walker::at(20, 20);
        let wide = WalkLimits {
            kill_radius_sq: 1.0e9,
            ..limits(1000)
        };
        for _ in 0..50 {
            let (px, py) = walker.position();
            walker.step(&grid, &mut rng, &wide);
            let (x, y) = walker.position();
            assert!(DIRECTIONS.contains(&(x - px, y - py)));
        }
        assert_eq!(walker.steps(), 50);
    }
}
