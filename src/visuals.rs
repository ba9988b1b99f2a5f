//! Visual configuration: render modes and the startup color pairing.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;

/// How the point cloud is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Additive blending, no depth writes, perspective size attenuation.
    /// The classic glowing-cloud look.
    #[default]
    Glow,
    /// Alpha blending with depth testing and a fixed point size; reads as
    /// a solid, occluding cloud.
    Lit,
}

impl RenderMode {
    pub fn id(self) -> i32 {
        match self {
            RenderMode::Glow => 0,
            RenderMode::Lit => 1,
        }
    }

    pub fn from_id(id: i32) -> Self {
        match id {
            1 => RenderMode::Lit,
            _ => RenderMode::Glow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Glow => "Glow",
            RenderMode::Lit => "Lit",
        }
    }
}

/// Curated five-stop palettes the startup colors are drawn from.
const PALETTES: [[Vec3; 5]; 6] = [
    // Ember
    [
        Vec3::new(0.996, 0.682, 0.176),
        Vec3::new(0.988, 0.463, 0.212),
        Vec3::new(0.918, 0.22, 0.286),
        Vec3::new(0.596, 0.12, 0.388),
        Vec3::new(0.231, 0.098, 0.322),
    ],
    // Lagoon
    [
        Vec3::new(0.0, 0.247, 0.361),
        Vec3::new(0.035, 0.455, 0.541),
        Vec3::new(0.0, 0.671, 0.58),
        Vec3::new(0.565, 0.855, 0.655),
        Vec3::new(0.929, 0.976, 0.861),
    ],
    // Orchid
    [
        Vec3::new(0.925, 0.365, 0.573),
        Vec3::new(0.753, 0.278, 0.6),
        Vec3::new(0.533, 0.22, 0.576),
        Vec3::new(0.322, 0.192, 0.502),
        Vec3::new(0.145, 0.165, 0.373),
    ],
    // Citrus
    [
        Vec3::new(0.976, 0.843, 0.157),
        Vec3::new(0.949, 0.624, 0.122),
        Vec3::new(0.902, 0.38, 0.153),
        Vec3::new(0.396, 0.529, 0.255),
        Vec3::new(0.153, 0.318, 0.29),
    ],
    // Glacier
    [
        Vec3::new(0.867, 0.949, 0.973),
        Vec3::new(0.557, 0.792, 0.902),
        Vec3::new(0.271, 0.557, 0.792),
        Vec3::new(0.161, 0.337, 0.62),
        Vec3::new(0.11, 0.157, 0.365),
    ],
    // Neon
    [
        Vec3::new(1.0, 0.08, 0.58),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(0.58, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 0.5),
        Vec3::new(1.0, 1.0, 0.0),
    ],
];

/// Draw an (inner, outer) color pair: two distinct stops from one randomly
/// chosen palette.
pub fn random_color_pair(rng: &mut SmallRng) -> (Vec3, Vec3) {
    let palette = PALETTES[rng.gen_range(0..PALETTES.len())];
    let first = rng.gen_range(0..palette.len());
    // Skip over the first pick so the pair is never the same color twice
    let mut second = rng.gen_range(0..palette.len() - 1);
    if second >= first {
        second += 1;
    }
    (palette[first], palette[second])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_render_mode_ids() {
        assert_eq!(RenderMode::from_id(RenderMode::Glow.id()), RenderMode::Glow);
        assert_eq!(RenderMode::from_id(RenderMode::Lit.id()), RenderMode::Lit);
        assert_eq!(RenderMode::from_id(77), RenderMode::Glow);
    }

    #[test]
    fn test_color_pair_is_distinct() {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..200 {
            let (inner, outer) = random_color_pair(&mut rng);
            assert_ne!(inner, outer);
        }
    }

    #[test]
    fn test_palette_channels_in_range() {
        for palette in PALETTES {
            for color in palette {
                for c in [color.x, color.y, color.z] {
                    assert!((0.0..=1.0).contains(&c));
                }
            }
        }
    }
}
