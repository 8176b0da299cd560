use crate::error::GrowthError;
use crate::snapshot::Snapshot;
use rand::Rng;

/// Moore neighbourhood: 4 axis-adjacent plus 4 diagonal cells
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Draw a uniform angle in `[0, 2π)` and return the point at `radius` from
/// `center`, each coordinate truncated toward zero.
pub fn sample_on_circle<R: Rng + ?Sized>(rng: &mut R, center: (i32, i32), radius: f64) -> (i32, i32) {
    let theta = rng.gen_range(0.0..std::f64::consts::TAU);
    (
        (center.0 as f64 + radius * theta.cos()) as i32,
        (center.1 as f64 + radius * theta.sin()) as i32,
    )
}

/// Square occupancy lattice. Cells only ever go from empty to occupied.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Allocate a `size x size` grid with the centre cell seeded.
    pub fn new(size: usize) -> Result<Self, GrowthError> {
        if size == 0 || size % 2 == 0 {
            return Err(GrowthError::InvalidConfig(
                "grid_size must be a positive odd number",
            ));
        }
        if size > i32::MAX as usize {
            return Err(GrowthError::ResourceExhaustion { size });
        }
        let area = size
            .checked_mul(size)
            .ok_or(GrowthError::ResourceExhaustion { size })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(area)
            .map_err(|_| GrowthError::ResourceExhaustion { size })?;
        cells.resize(area, false);

        let mut grid = Self { size, cells };
        let (cx, cy) = grid.center();
        grid.occupy(cx, cy);
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn center(&self) -> (i32, i32) {
        let c = (self.size / 2) as i32;
        (c, c)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let size = self.size as i32;
        (0..size).contains(&x) && (0..size).contains(&y)
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.size,
            self.size
        );
        y as usize * self.size + x as usize
    }

    /// Panics when `(x, y)` is out of bounds; check `in_bounds` first.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn occupy(&mut self, x: i32, y: i32) {
        let idx = self.index(x, y);
        self.cells[idx] = true;
    }

    /// True if any of the 8 surrounding cells is occupied. Neighbours off the
    /// grid count as empty.
    pub fn has_occupied_neighbor(&self, x: i32, y: i32) -> bool {
        NEIGHBOR_OFFSETS.iter().any(|&(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            self.in_bounds(nx, ny) && self.is_occupied(nx, ny)
        })
    }

    /// Sample a spawn point on the circle of `radius` around the grid centre
    pub fn sample_on_circle<R: Rng + ?Sized>(&self, rng: &mut R, radius: f64) -> (i32, i32) {
        sample_on_circle(rng, self.center(), radius)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Copy the occupancy state into an immutable snapshot
    pub fn snapshot(&self, stuck_count: usize, num_particles: usize, is_final: bool) -> Snapshot {
        Snapshot::new(
            self.size,
            self.cells.as_slice().into(),
            stuck_count,
            num_particles,
            is_final,
        )
    }
}
