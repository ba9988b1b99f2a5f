//! Shader generation for the simulation and point-render passes.
//!
//! The simulation pass is a fullscreen-triangle fragment shader over the
//! scratch position texture: each fragment is one particle cell. The
//! selected field's `field_delta` function is inlined at generation time,
//! so a selection change rebuilds the pipeline while coefficient tweaks
//! only touch the uniform buffer.
//!
//! The uniform structs here mirror the WGSL layouts exactly; both sides
//! change together.

use crate::attractor::AttractorKind;
use crate::shader_utils::curl_utils_wgsl;
use bytemuck::{Pod, Zeroable};

/// Uniforms for the simulation pass. Must match `SimUniforms` in the
/// generated WGSL.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct SimUniforms {
    pub time: f32,
    pub curl_intensity: f32,
    pub curl_amplitude: f32,
    pub _pad: f32,
    /// Coefficient slots, vec4-packed; 8 x 4 covers the 30-term quadratic map.
    pub coeffs: [[f32; 4]; 8],
}

impl SimUniforms {
    /// Pack a coefficient vector into vec4 slots, zero-padded.
    pub fn pack_coeffs(values: &[f32]) -> [[f32; 4]; 8] {
        let mut packed = [[0.0f32; 4]; 8];
        for (i, v) in values.iter().take(32).enumerate() {
            packed[i / 4][i % 4] = *v;
        }
        packed
    }
}

/// Uniforms for the point-render pass. Must match `PointUniforms` in
/// [`points_shader`].
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct PointUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub inner_color: [f32; 3],
    pub distance_scale: f32,
    pub outer_color: [f32; 3],
    pub point_size: f32,
    pub grid_size: u32,
    /// 1 = perspective size attenuation (world-size billboards),
    /// 0 = fixed screen-proportional size.
    pub size_attenuation: u32,
    pub _pad: [f32; 2],
}

/// Generate the simulation shader for the selected field.
///
/// Shape mode passes [`AttractorKind::Identity`]: surface positions are
/// assigned at spawn and only the curl term moves them afterwards.
pub fn simulation_shader(kind: AttractorKind) -> String {
    format!(
        r#"struct SimUniforms {{
    time: f32,
    curl_intensity: f32,
    curl_amplitude: f32,
    _pad: f32,
    coeffs: array<vec4<f32>, 8>,
}};

@group(0) @binding(0)
var positions: texture_2d<f32>;
@group(0) @binding(1)
var<uniform> sim: SimUniforms;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {{
    var corners = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(corners[vertex_index], 0.0, 1.0);
}}
{utils}
{field_delta}
@fragment
fn fs_main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {{
    let texel = vec2<i32>(frag_coord.xy);
    var pos = textureLoad(positions, texel, 0).xyz;

    pos += field_delta(pos);

    if sim.curl_intensity > 0.0 {{
        pos += curl_noise(pos * sim.time * sim.curl_intensity) * sim.curl_amplitude;
    }}

    return vec4<f32>(pos, 1.0);
}}
"#,
        utils = curl_utils_wgsl(),
        field_delta = kind.wgsl_delta_fn(),
    )
}

/// The point-render shader, shared by the glow and lit pipelines (they
/// differ only in blend and depth state).
pub fn points_shader() -> String {
    r#"struct PointUniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    inner_color: vec3<f32>,
    distance_scale: f32,
    outer_color: vec3<f32>,
    point_size: f32,
    grid_size: u32,
    size_attenuation: u32,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var positions: texture_2d<f32>;
@group(0) @binding(1)
var<uniform> u: PointUniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = quad_vertices[vertex_index];

    let texel = vec2<i32>(
        i32(instance_index % u.grid_size),
        i32(instance_index / u.grid_size),
    );
    let pos = textureLoad(positions, texel, 0).xyz;

    var view_pos = u.view * vec4<f32>(pos, 1.0);
    var clip: vec4<f32>;
    if u.size_attenuation == 1u {
        // World-size billboard: the projection divides by depth, giving
        // the perspective attenuation.
        view_pos = vec4<f32>(view_pos.xy + corner * u.point_size, view_pos.zw);
        clip = u.proj * view_pos;
    } else {
        // Fixed screen-proportional size for the depth-tested pass
        clip = u.proj * view_pos;
        clip = vec4<f32>(clip.xy + corner * u.point_size * clip.w, clip.zw);
    }

    let dist = distance(pos, vec3<f32>(0.0));

    var out: VertexOutput;
    out.clip_position = clip;
    out.color = mix(u.inner_color, u.outer_color, saturate(dist * u.distance_scale));
    out.uv = corner;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Hard disc
    if length(in.uv) > 1.0 {
        discard;
    }
    return vec4<f32>(in.color, 1.0);
}
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_coeffs_layout() {
        let packed = SimUniforms::pack_coeffs(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(packed[0], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(packed[1], [5.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pack_coeffs_truncates_overflow() {
        let packed = SimUniforms::pack_coeffs(&[1.0; 40]);
        assert_eq!(packed[7], [1.0; 4]);
    }

    #[test]
    fn test_simulation_shader_inlines_selected_field_only() {
        let wgsl = simulation_shader(AttractorKind::Thomas);
        assert!(wgsl.contains("fn field_delta"));
        assert!(wgsl.contains("sin(y)"));
        // No per-cell id dispatch
        assert!(!wgsl.contains("uSelectedAttractor"));
        assert!(!wgsl.contains("switch"));
    }

    #[test]
    fn test_simulation_shader_has_curl_term() {
        let wgsl = simulation_shader(AttractorKind::Identity);
        assert!(wgsl.contains("curl_noise"));
        assert!(wgsl.contains("sim.curl_intensity > 0.0"));
    }

    #[test]
    fn test_uniform_struct_sizes() {
        // vec4-aligned layouts: 16 header + 8 * 16 coeff bytes
        assert_eq!(std::mem::size_of::<SimUniforms>(), 16 + 128);
        // two mat4 + two vec3/f32 pairs + scalars + pad
        assert_eq!(std::mem::size_of::<PointUniforms>(), 128 + 48);
    }
}
