//! The double-buffered position field.
//!
//! Two Rgba32Float textures whose roles swap every tick: the stepper reads
//! the front texture and writes the scratch one, then the active index
//! flips and the freshly written texture becomes front. Holding an owned
//! pair plus a single active flag (instead of two rebindable handles)
//! rules out reading and writing the same texture in one step.
//!
//! The pair is exclusively owned here. Consumers resolve the front view
//! fresh every tick and must not cache it across a re-prime: priming
//! destroys the old textures before allocating the new pair, so the live
//! count stays at exactly two.

use wgpu::util::{DeviceExt, TextureDataOrder};

/// Texel format of the position field. xyz is the particle position, the
/// alpha channel is unused and pinned to 1.0 for format compliance.
pub const POSITION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Lifecycle of the buffer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// No textures allocated yet.
    #[default]
    Uninitialized,
    /// Both textures hold the seed field; no tick has run since priming.
    Primed,
    /// At least one tick has advanced the field since the last prime.
    Running,
}

struct PositionTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Owner and scheduler of the front/scratch texture pair.
pub struct PositionFields {
    targets: Option<[PositionTarget; 2]>,
    active: usize,
    grid_size: u32,
    state: SchedulerState,
    live_textures: u32,
}

impl PositionFields {
    pub fn new(grid_size: u32) -> Self {
        Self {
            targets: None,
            active: 0,
            grid_size,
            state: SchedulerState::Uninitialized,
            live_textures: 0,
        }
    }

    /// Allocate (or re-allocate) the pair and upload the seed field to
    /// both textures.
    ///
    /// Seeding both sides gives the first tick a valid read source without
    /// a feedback artifact. Any previous pair is destroyed first; skipping
    /// that would leak GPU memory on every selection change.
    pub fn prime(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        grid_size: u32,
        seed: &[f32],
    ) {
        debug_assert_eq!(seed.len(), (grid_size * grid_size * 4) as usize);

        if let Some(old) = self.targets.take() {
            for target in old {
                target.texture.destroy();
                self.live_textures -= 1;
            }
        }

        self.grid_size = grid_size;
        let size = wgpu::Extent3d {
            width: grid_size,
            height: grid_size,
            depth_or_array_layers: 1,
        };

        let make_target = |label: &str| {
            let texture = device.create_texture_with_data(
                queue,
                &wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: POSITION_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::TEXTURE_BINDING
                        | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                TextureDataOrder::LayerMajor,
                bytemuck::cast_slice(seed),
            );
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            PositionTarget { texture, view }
        };

        self.targets = Some([
            make_target("Position Field A"),
            make_target("Position Field B"),
        ]);
        self.live_textures += 2;
        self.active = 0;
        self.state = SchedulerState::Primed;
    }

    /// View of the authoritative (readable) texture. Resolve fresh each
    /// tick; never cache across a re-prime.
    pub fn front_view(&self) -> Option<&wgpu::TextureView> {
        self.targets.as_ref().map(|t| &t[self.active].view)
    }

    /// View of the texture the stepper writes this tick.
    pub fn scratch_view(&self) -> Option<&wgpu::TextureView> {
        self.targets.as_ref().map(|t| &t[1 - self.active].view)
    }

    /// Flip roles after a step: the just-written scratch texture becomes
    /// the published front.
    pub fn swap(&mut self) {
        if self.targets.is_some() {
            self.active = 1 - self.active;
            self.state = SchedulerState::Running;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Number of position textures currently allocated. Exactly 2 after
    /// any prime; 0 before the first.
    pub fn live_texture_count(&self) -> u32 {
        self.live_textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialized() {
        let fields = PositionFields::new(8);
        assert_eq!(fields.state(), SchedulerState::Uninitialized);
        assert_eq!(fields.live_texture_count(), 0);
        assert!(fields.front_view().is_none());
        assert!(fields.scratch_view().is_none());
    }

    #[test]
    fn test_swap_without_prime_is_inert() {
        let mut fields = PositionFields::new(8);
        fields.swap();
        assert_eq!(fields.state(), SchedulerState::Uninitialized);
    }
}
