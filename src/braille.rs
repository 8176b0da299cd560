use crate::color::{map_from_lut, ColorLut};
use crate::snapshot::Snapshot;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Square region of the canvas, in dots, that the grid is drawn into
struct Viewport {
    offset_x: usize,
    offset_y: usize,
    /// Grid cells per dot
    scale: f32,
    side: usize,
}

impl Viewport {
    /// Largest centered square of dots that fits the canvas. Braille dots
    /// are roughly square, so the grid keeps its aspect ratio.
    fn fit(grid_size: usize, canvas_width: u16, canvas_height: u16) -> Self {
        let dots_w = canvas_width as usize * 2;
        let dots_h = canvas_height as usize * 4;
        let side = dots_w.min(dots_h);
        Self {
            offset_x: (dots_w - side) / 2,
            offset_y: (dots_h - side) / 2,
            scale: grid_size as f32 / side.max(1) as f32,
            side,
        }
    }

    /// Grid cell under a dot, y axis pointing up
    fn cell(&self, grid_size: usize, dot_x: usize, dot_y: usize) -> Option<(usize, usize)> {
        let vx = dot_x.checked_sub(self.offset_x)?;
        let vy = dot_y.checked_sub(self.offset_y)?;
        if vx >= self.side || vy >= self.side {
            return None;
        }
        let x = (vx as f32 * self.scale) as usize;
        let y_down = (vy as f32 * self.scale) as usize;
        (x < grid_size && y_down < grid_size).then(|| (x, grid_size - 1 - y_down))
    }
}

/// Render a snapshot to Braille characters, colored by distance from the seed
pub fn render_to_braille(
    snapshot: &Snapshot,
    canvas_width: u16,
    canvas_height: u16,
    color_lut: &ColorLut,
    color_radius: f32,
) -> Vec<BrailleCell> {
    let grid_size = snapshot.size();
    let viewport = Viewport::fit(grid_size, canvas_width, canvas_height);

    let mut cells = Vec::with_capacity(canvas_width as usize * canvas_height as usize);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut total_value: f32 = 0.0;
            let mut dot_count: usize = 0;

            // Sample the 2x4 dots for this Braille character
            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let Some((x, y)) = viewport.cell(grid_size, base_bx + dx, base_by + dy) else {
                        continue;
                    };
                    if snapshot.is_occupied(x, y) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        dot_count += 1;
                        total_value += snapshot.radial_shade(x, y, color_radius);
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let avg_value = total_value / dot_count as f32;
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: map_from_lut(color_lut, avg_value),
                });
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScheme;

    fn snapshot_with(size: usize, cells: &[(usize, usize)]) -> Snapshot {
        let mut grid = vec![false; size * size];
        for &(x, y) in cells {
            grid[y * size + x] = true;
        }
        Snapshot::new(size, grid.into(), cells.len(), 100, false)
    }

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_viewport_centres_square() {
        // 10x2 characters = 20x8 dots; square side 8, padded 6 dots each side
        let viewport = Viewport::fit(8, 10, 2);
        assert_eq!(viewport.side, 8);
        assert_eq!(viewport.offset_x, 6);
        assert_eq!(viewport.offset_y, 0);
        assert_eq!(viewport.cell(8, 5, 0), None);
        assert_eq!(viewport.cell(8, 6, 0), Some((0, 7)));
        assert_eq!(viewport.cell(8, 13, 7), Some((7, 0)));
        assert_eq!(viewport.cell(8, 14, 0), None);
    }

    #[test]
    fn test_single_cell_renders_one_dot() {
        // 1:1 mapping: a 4x4 grid on a 2x1 canvas (4x4 dots)
        let snap = snapshot_with(4, &[(0, 3)]);
        let lut = ColorScheme::Mono.build_lut();
        let cells = render_to_braille(&snap, 2, 1, &lut, 2.0);
        assert_eq!(cells.len(), 1);
        // Grid row 3 is the top dot row
        assert_eq!(cells[0].x, 0);
        assert_eq!(cells[0].char, '\u{2801}');
    }

    #[test]
    fn test_empty_snapshot_renders_nothing() {
        let snap = snapshot_with(5, &[]);
        let lut = ColorScheme::default().build_lut();
        assert!(render_to_braille(&snap, 10, 5, &lut, 2.0).is_empty());
    }
}
