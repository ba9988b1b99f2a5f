//! Seed-field generation for priming the position textures.
//!
//! Each texel of the position texture is one particle. Seeds are produced
//! as RGBA32F texel data: xyz is the spawn position, the alpha channel is
//! unused by the simulation and pinned to 1.0 for format compliance.

use crate::surface::SurfaceKind;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::TAU;

/// Texel coordinate of logical particle `index` on a `grid_size` grid.
#[inline]
pub fn texel_of(index: u32, grid_size: u32) -> (u32, u32) {
    (index % grid_size, index / grid_size)
}

/// Seed cloud for attractor mode: a shell-biased sphere.
///
/// Radius squared is drawn uniformly (so the cloud hollows toward a shell)
/// and two free angles spread the points around it. The exact angular
/// distribution is not uniform on the sphere; it only has to scatter the
/// seeds so every trajectory basin gets populated.
pub fn shell_seed(grid_size: u32, rng: &mut SmallRng) -> Vec<f32> {
    let count = (grid_size * grid_size) as usize;
    let mut data = Vec::with_capacity(count * 4);

    for _ in 0..count {
        let radius = 2.0 * rng.gen::<f32>().sqrt();
        let theta = rng.gen_range(0.0..TAU);
        let phi = rng.gen_range(0.0..TAU);

        data.push(radius * theta.sin() * phi.cos());
        data.push(radius * theta.sin() * phi.sin());
        data.push(radius * theta.cos());
        data.push(1.0);
    }

    data
}

/// Seed field for shape mode: every particle placed on the selected
/// surface, domain samples drawn once here and never re-drawn per tick.
pub fn surface_seed(kind: SurfaceKind, grid_size: u32, rng: &mut SmallRng) -> Vec<f32> {
    let count = grid_size * grid_size;
    let mut data = Vec::with_capacity(count as usize * 4);

    for i in 0..count {
        let (u, v) = kind.sample(i, count, rng);
        let pos = match kind {
            SurfaceKind::PassThrough => Vec3::new(u, v, rng.gen_range(-1.0..=1.0)),
            _ => kind.map(u, v),
        };
        data.push(pos.x);
        data.push(pos.y);
        data.push(pos.z);
        data.push(1.0);
    }

    data
}
