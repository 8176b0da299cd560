use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Number of entries in a color lookup table
pub const LUT_SIZE: usize = 256;

/// Precomputed gradient, indexed by a value in 0.0..=1.0
pub type ColorLut = [[u8; 3]; LUT_SIZE];

/// Gradient used to color the aggregate by distance from the seed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Inferno,
    Fire,
    Ice,
    Neon,
    Mono,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Inferno => "Inferno",
            ColorScheme::Fire => "Fire",
            ColorScheme::Ice => "Ice",
            ColorScheme::Neon => "Neon",
            ColorScheme::Mono => "Mono",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Inferno => ColorScheme::Fire,
            ColorScheme::Fire => ColorScheme::Ice,
            ColorScheme::Ice => ColorScheme::Neon,
            ColorScheme::Neon => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Inferno,
        }
    }

    /// Parse a scheme name, falling back to the default
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fire" => ColorScheme::Fire,
            "ice" => ColorScheme::Ice,
            "neon" => ColorScheme::Neon,
            "mono" | "gray" | "grey" => ColorScheme::Mono,
            _ => ColorScheme::Inferno,
        }
    }

    /// Gradient stops, evenly spaced from 0.0 to 1.0
    fn stops(&self) -> &'static [[u8; 3]] {
        match self {
            // Low end lifted off black so the seed stays visible
            ColorScheme::Inferno => &[
                [120, 28, 109],
                [187, 55, 84],
                [237, 105, 37],
                [251, 180, 26],
                [252, 255, 164],
            ],
            ColorScheme::Fire => &[[255, 255, 200], [255, 200, 0], [255, 90, 0], [160, 0, 0]],
            ColorScheme::Ice => &[[255, 255, 255], [150, 220, 255], [40, 120, 255], [20, 40, 160]],
            ColorScheme::Neon => &[[255, 0, 255], [0, 255, 255], [0, 255, 100]],
            ColorScheme::Mono => &[[255, 255, 255], [110, 110, 110]],
        }
    }

    pub fn build_lut(&self) -> ColorLut {
        let stops = self.stops();
        let segments = (stops.len() - 1) as f32;
        let mut lut = [[0u8; 3]; LUT_SIZE];
        for (i, entry) in lut.iter_mut().enumerate() {
            let t = i as f32 / (LUT_SIZE - 1) as f32;
            let pos = t * segments;
            let lo = (pos as usize).min(stops.len() - 2);
            let frac = pos - lo as f32;
            for c in 0..3 {
                let a = stops[lo][c] as f32;
                let b = stops[lo + 1][c] as f32;
                entry[c] = (a + (b - a) * frac).round() as u8;
            }
        }
        lut
    }
}

/// Look up the LUT entry for `t`, clamped to 0.0..=1.0
pub fn lut_index(t: f32) -> usize {
    (t.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f32).round() as usize
}

pub fn rgb_from_lut(lut: &ColorLut, t: f32) -> [u8; 3] {
    lut[lut_index(t)]
}

pub fn map_from_lut(lut: &ColorLut, t: f32) -> Color {
    let [r, g, b] = rgb_from_lut(lut, t);
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lut_endpoints_match_stops() {
        for scheme in [
            ColorScheme::Inferno,
            ColorScheme::Fire,
            ColorScheme::Ice,
            ColorScheme::Neon,
            ColorScheme::Mono,
        ] {
            let lut = scheme.build_lut();
            let stops = scheme.stops();
            assert_eq!(lut[0], stops[0], "{}", scheme.name());
            assert_eq!(lut[LUT_SIZE - 1], stops[stops.len() - 1], "{}", scheme.name());
        }
    }

    #[test]
    fn test_cycle_visits_every_scheme() {
        let mut seen = vec![ColorScheme::default()];
        let mut scheme = ColorScheme::default().next();
        while scheme != ColorScheme::default() {
            assert!(!seen.contains(&scheme));
            seen.push(scheme);
            scheme = scheme.next();
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_lut_index_clamps() {
        assert_eq!(lut_index(-1.0), 0);
        assert_eq!(lut_index(2.0), LUT_SIZE - 1);
        assert_eq!(lut_index(0.5), 128);
    }

    #[test]
    fn test_parse_scheme_names() {
        assert_eq!(ColorScheme::parse("ICE"), ColorScheme::Ice);
        assert_eq!(ColorScheme::parse("grey"), ColorScheme::Mono);
        assert_eq!(ColorScheme::parse("unknown"), ColorScheme::Inferno);
    }
}
