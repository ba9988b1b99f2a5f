//! The closed catalog of attractor vector fields.
//!
//! Each field is a pure function of a 3D state and a coefficient vector,
//! returning the position delta for one integration step. The timestep is
//! part of the field's tuning and is baked into the generated shader; the
//! coefficients are live-overridable through the uniform buffer without a
//! pipeline rebuild.
//!
//! The catalog is dispatched as a tagged enum indexed once at selection
//! time: the generated simulation shader contains only the selected field's
//! `field_delta` function, never a per-cell id branch.
//!
//! # Example
//!
//! ```
//! use swirl::attractor::AttractorKind;
//! use glam::Vec3;
//!
//! let kind = AttractorKind::Lorenz;
//! let defaults: Vec<f32> = kind.coefficient_defaults().iter().map(|(_, v)| *v).collect();
//! let delta = kind.integrate(Vec3::new(1.0, 1.0, 1.0), &defaults);
//! assert_eq!(delta.x, 0.0);
//! ```

use glam::Vec3;

/// Numeric selector for the identity field ("pure curl-noise drift").
pub const IDENTITY_ID: i32 = -1;

/// Maximum coefficient arity across the catalog, padded to vec4 slots for
/// the uniform buffer (8 x vec4 = 32 floats; the quadratic map uses 30).
pub const MAX_COEFFICIENTS: usize = 32;

/// A vector field from the closed attractor catalog.
///
/// Ids are stable and match the original tuning tables; `Identity` (id -1)
/// produces a zero delta and exists so "just curl noise" can be selected
/// like any other field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttractorKind {
    #[default]
    Lorenz,
    LorenzMod2,
    Thomas,
    Dequan,
    Dradas,
    Arneodo,
    Aizawa,
    ChenLee,
    Rossler,
    SprottB,
    SprottLinzF,
    Halvorsen,
    QuadraticStrange,
    Identity,
}

/// Default coefficients for the 30-term quadratic map.
const QUADRATIC_DEFAULTS: [(&str, f32); 30] = [
    ("a0", -0.875),
    ("a1", -0.173),
    ("a2", 0.307),
    ("a3", -0.436),
    ("a4", 0.598),
    ("a5", 0.003),
    ("a6", -0.039),
    ("a7", 0.96),
    ("a8", -0.84),
    ("a9", 0.885),
    ("a10", 0.774),
    ("a11", 0.281),
    ("a12", -0.015),
    ("a13", 0.585),
    ("a14", 0.442),
    ("a15", -0.18),
    ("a16", -0.535),
    ("a17", -0.151),
    ("a18", -0.971),
    ("a19", -0.48),
    ("a20", 0.777),
    ("a21", 0.418),
    ("a22", 0.185),
    ("a23", 0.006),
    ("a24", 0.45),
    ("a25", -0.066),
    ("a26", 0.498),
    ("a27", 0.142),
    ("a28", -0.246),
    ("a29", -0.939),
];

impl AttractorKind {
    /// Every catalog entry, in id order (identity last).
    pub const ALL: [AttractorKind; 14] = [
        AttractorKind::Lorenz,
        AttractorKind::LorenzMod2,
        AttractorKind::Thomas,
        AttractorKind::Dequan,
        AttractorKind::Dradas,
        AttractorKind::Arneodo,
        AttractorKind::Aizawa,
        AttractorKind::ChenLee,
        AttractorKind::Rossler,
        AttractorKind::SprottB,
        AttractorKind::SprottLinzF,
        AttractorKind::Halvorsen,
        AttractorKind::QuadraticStrange,
        AttractorKind::Identity,
    ];

    /// Stable numeric selector for this field.
    pub fn id(self) -> i32 {
        match self {
            AttractorKind::Lorenz => 0,
            AttractorKind::LorenzMod2 => 1,
            AttractorKind::Thomas => 2,
            AttractorKind::Dequan => 3,
            AttractorKind::Dradas => 4,
            AttractorKind::Arneodo => 5,
            AttractorKind::Aizawa => 6,
            AttractorKind::ChenLee => 7,
            AttractorKind::Rossler => 8,
            AttractorKind::SprottB => 9,
            AttractorKind::SprottLinzF => 10,
            AttractorKind::Halvorsen => 11,
            AttractorKind::QuadraticStrange => 12,
            AttractorKind::Identity => IDENTITY_ID,
        }
    }

    /// Resolve a numeric selector.
    ///
    /// Unknown ids fail soft to the identity field: selection is normally
    /// constrained to the catalog by the control surface, so an unknown id
    /// is unexpected but never a fault.
    pub fn from_id(id: i32) -> Self {
        match id {
            0 => AttractorKind::Lorenz,
            1 => AttractorKind::LorenzMod2,
            2 => AttractorKind::Thomas,
            3 => AttractorKind::Dequan,
            4 => AttractorKind::Dradas,
            5 => AttractorKind::Arneodo,
            6 => AttractorKind::Aizawa,
            7 => AttractorKind::ChenLee,
            8 => AttractorKind::Rossler,
            9 => AttractorKind::SprottB,
            10 => AttractorKind::SprottLinzF,
            11 => AttractorKind::Halvorsen,
            12 => AttractorKind::QuadraticStrange,
            IDENTITY_ID => AttractorKind::Identity,
            other => {
                eprintln!("Unknown attractor id {}, falling back to identity field", other);
                AttractorKind::Identity
            }
        }
    }

    /// Display name, as shown in the selection dropdown.
    pub fn name(self) -> &'static str {
        match self {
            AttractorKind::Lorenz => "Lorenz",
            AttractorKind::LorenzMod2 => "Lorenz Mod2",
            AttractorKind::Thomas => "Thomas",
            AttractorKind::Dequan => "Dequan",
            AttractorKind::Dradas => "Dradas",
            AttractorKind::Arneodo => "Arneodo",
            AttractorKind::Aizawa => "Aizawa",
            AttractorKind::ChenLee => "Chen-Lee",
            AttractorKind::Rossler => "Rossler",
            AttractorKind::SprottB => "Sprott B",
            AttractorKind::SprottLinzF => "Sprott-Linz F",
            AttractorKind::Halvorsen => "Halvorsen",
            AttractorKind::QuadraticStrange => "Quadratic Strange",
            AttractorKind::Identity => "Just curl noise",
        }
    }

    /// Fixed internal timestep. Part of the field's tuning, not
    /// user-adjustable; each field is numerically stable under its own
    /// default coefficients at this step size.
    pub fn timestep(self) -> f32 {
        match self {
            AttractorKind::Lorenz => 0.02,
            AttractorKind::LorenzMod2 => 0.005,
            AttractorKind::Thomas => 0.1,
            AttractorKind::Dequan => 0.0005,
            AttractorKind::Dradas => 0.02,
            AttractorKind::Arneodo => 0.015,
            AttractorKind::Aizawa => 0.03,
            AttractorKind::ChenLee => 0.03,
            AttractorKind::Rossler => 0.05,
            AttractorKind::SprottB => 0.035,
            AttractorKind::SprottLinzF => 0.035,
            AttractorKind::Halvorsen => 0.01,
            AttractorKind::QuadraticStrange => 0.01,
            AttractorKind::Identity => 0.0,
        }
    }

    /// Named coefficient defaults, in uniform-slot order.
    pub fn coefficient_defaults(self) -> &'static [(&'static str, f32)] {
        match self {
            AttractorKind::Lorenz => &[("a", 5.0), ("b", 14.0), ("c", 1.33333)],
            AttractorKind::LorenzMod2 => &[("a", 0.9), ("b", 5.0), ("c", 9.9), ("d", 1.0)],
            AttractorKind::Thomas => &[("b", 0.19)],
            AttractorKind::Dequan => &[
                ("a", 40.0),
                ("b", 1.833),
                ("c", 0.16),
                ("d", 0.65),
                ("e", 55.0),
                ("f", 20.0),
            ],
            AttractorKind::Dradas => &[
                ("a", 3.0),
                ("b", 2.7),
                ("c", 1.7),
                ("d", 2.0),
                ("e", 9.0),
            ],
            AttractorKind::Arneodo => &[("a", -5.5), ("b", 3.5), ("d", -1.0)],
            // The classic Aizawa parameterization carries six constants;
            // `e` does not appear in the delta equations.
            AttractorKind::Aizawa => &[
                ("a", 0.95),
                ("b", 0.7),
                ("c", 0.6),
                ("d", 3.5),
                ("e", 0.25),
                ("f", 0.1),
            ],
            AttractorKind::ChenLee => &[("a", 1.66), ("b", -3.33), ("d", -0.126)],
            AttractorKind::Rossler => &[("a", 0.2), ("b", 0.2), ("c", 5.7)],
            AttractorKind::SprottB => &[("a", 0.4), ("b", 1.2), ("c", 1.0)],
            AttractorKind::SprottLinzF => &[("a", 0.5)],
            AttractorKind::Halvorsen => &[("a", 1.4)],
            AttractorKind::QuadraticStrange => &QUADRATIC_DEFAULTS,
            AttractorKind::Identity => &[],
        }
    }

    /// Number of coefficients this field consumes.
    pub fn coefficient_count(self) -> usize {
        self.coefficient_defaults().len()
    }

    /// Tuned multiplier applied to radial distance when blending the
    /// inner/outer point colors. A literal per-field table, no formula.
    pub fn distance_color_scale(self) -> f32 {
        match self {
            AttractorKind::Lorenz => 0.025,
            AttractorKind::LorenzMod2 => 0.055,
            AttractorKind::Thomas => 0.15,
            AttractorKind::Dequan => 0.005,
            AttractorKind::Dradas => 0.075,
            AttractorKind::Arneodo => 0.1,
            AttractorKind::Aizawa => 0.24,
            AttractorKind::ChenLee => 0.1,
            AttractorKind::Rossler => 0.04,
            AttractorKind::SprottB => 0.1,
            AttractorKind::SprottLinzF => 0.15,
            AttractorKind::Halvorsen => 0.05,
            AttractorKind::QuadraticStrange => 0.7,
            AttractorKind::Identity => 0.01,
        }
    }

    /// One integration step: the position delta for `pos` under the given
    /// coefficients. Missing entries fall back to the catalog defaults.
    ///
    /// Pure and deterministic: identical inputs produce identical outputs.
    /// Positions are not guarded against divergence; user-overridden
    /// coefficients may blow up, which is accepted rather than clamped so
    /// default-setting visuals stay untouched.
    pub fn integrate(self, pos: Vec3, coeffs: &[f32]) -> Vec3 {
        let k = |i: usize| -> f32 {
            match coeffs.get(i) {
                Some(v) => *v,
                None => self.coefficient_defaults()[i].1,
            }
        };
        let dt = self.timestep();
        let (x, y, z) = (pos.x, pos.y, pos.z);

        match self {
            AttractorKind::Lorenz => {
                let (a, b, c) = (k(0), k(1), k(2));
                Vec3::new(
                    dt * (a * (y - x)),
                    dt * (x * (b - z) - y),
                    dt * (x * y - c * z),
                )
            }
            AttractorKind::LorenzMod2 => {
                let (a, b, c, d) = (k(0), k(1), k(2), k(3));
                Vec3::new(
                    (-a * x + y * y - z * z + a * c) * dt,
                    (x * (y - b * z) + d) * dt,
                    (-z + x * (b * y + z)) * dt,
                )
            }
            AttractorKind::Thomas => {
                let b = k(0);
                Vec3::new(
                    (-b * x + y.sin()) * dt,
                    (-b * y + z.sin()) * dt,
                    (-b * z + x.sin()) * dt,
                )
            }
            AttractorKind::Dequan => {
                let (a, b, c, d, e, f) = (k(0), k(1), k(2), k(3), k(4), k(5));
                Vec3::new(
                    (a * (y - x) + c * x * z) * dt,
                    (e * x + f * y - x * z) * dt,
                    (b * z + x * y - d * x * x) * dt,
                )
            }
            AttractorKind::Dradas => {
                let (a, b, c, d, e) = (k(0), k(1), k(2), k(3), k(4));
                Vec3::new(
                    (y - a * x + b * y * z) * dt,
                    (c * y - x * z + z) * dt,
                    (d * x * y - e * z) * dt,
                )
            }
            AttractorKind::Arneodo => {
                let (a, b, d) = (k(0), k(1), k(2));
                Vec3::new(
                    y * dt,
                    z * dt,
                    (-a * x - b * y - z + d * x * x * x) * dt,
                )
            }
            AttractorKind::Aizawa => {
                let (a, b, c, d, f) = (k(0), k(1), k(2), k(3), k(5));
                Vec3::new(
                    ((z - b) * x - d * y) * dt,
                    (d * x + (z - b) * y) * dt,
                    (c + a * z - (z * z * z) / 3.0 - x * x + f * z * (x * x * x)) * dt,
                )
            }
            AttractorKind::ChenLee => {
                let (a, b, d) = (k(0), k(1), k(2));
                Vec3::new(
                    (a * x - y * z) * dt,
                    (b * y + x * z) * dt,
                    (d * z + (x * y) / 3.0) * dt,
                )
            }
            AttractorKind::Rossler => {
                let (a, b, c) = (k(0), k(1), k(2));
                Vec3::new(
                    (-y - z) * dt,
                    (x + a * y) * dt,
                    (b + z * (x - c)) * dt,
                )
            }
            AttractorKind::SprottB => {
                let (a, b, c) = (k(0), k(1), k(2));
                Vec3::new(
                    (a * y * z) * dt,
                    (x - b * y) * dt,
                    (c - x * y) * dt,
                )
            }
            AttractorKind::SprottLinzF => {
                let a = k(0);
                Vec3::new(
                    (y + z) * dt,
                    (-x + a * y) * dt,
                    (x * x - z) * dt,
                )
            }
            AttractorKind::Halvorsen => {
                let a = k(0);
                Vec3::new(
                    (-a * x - 4.0 * y - 4.0 * z - y * y) * dt,
                    (-a * y - 4.0 * z - 4.0 * x - z * z) * dt,
                    (-a * z - 4.0 * x - 4.0 * y - x * x) * dt,
                )
            }
            AttractorKind::QuadraticStrange => {
                let dx = (k(0)
                    + k(1) * x
                    + k(2) * y
                    + k(3) * z
                    + k(4) * x * y
                    + k(5) * x * z
                    + k(6) * y * z
                    + k(7) * x * x
                    + k(8) * y * y
                    + k(9) * z * z)
                    * dt;
                let dy = (k(10)
                    + k(11) * x
                    + k(12) * y
                    + k(13) * z
                    + k(14) * x * y
                    + k(15) * x * z
                    + k(16) * y * z
                    + k(17) * x * x
                    + k(18) * y * y
                    + k(19) * z * z)
                    * dt;
                let dz = (k(20)
                    + k(21) * x
                    + k(22) * y
                    + k(23) * z
                    + k(24) * x * y
                    + k(25) * x * z
                    + k(26) * y * z
                    + k(27) * x * x
                    + k(28) * y * y
                    + k(29) * z * z)
                    * dt;
                Vec3::new(dx, dy, dz)
            }
            AttractorKind::Identity => Vec3::ZERO,
        }
    }

    /// WGSL equations for this field, referencing the coefficient names
    /// emitted by [`wgsl_delta_fn`](Self::wgsl_delta_fn) plus `x`, `y`, `z`
    /// and `dt`.
    fn wgsl_equations(self) -> &'static str {
        match self {
            AttractorKind::Lorenz => {
                "    let dx = dt * (a * (y - x));
    let dy = dt * (x * (b - z) - y);
    let dz = dt * (x * y - c * z);
"
            }
            AttractorKind::LorenzMod2 => {
                "    let dx = (-a * x + y * y - z * z + a * c) * dt;
    let dy = (x * (y - b * z) + d) * dt;
    let dz = (-z + x * (b * y + z)) * dt;
"
            }
            AttractorKind::Thomas => {
                "    let dx = (-b * x + sin(y)) * dt;
    let dy = (-b * y + sin(z)) * dt;
    let dz = (-b * z + sin(x)) * dt;
"
            }
            AttractorKind::Dequan => {
                "    let dx = (a * (y - x) + c * x * z) * dt;
    let dy = (e * x + f * y - x * z) * dt;
    let dz = (b * z + x * y - d * x * x) * dt;
"
            }
            AttractorKind::Dradas => {
                "    let dx = (y - a * x + b * y * z) * dt;
    let dy = (c * y - x * z + z) * dt;
    let dz = (d * x * y - e * z) * dt;
"
            }
            AttractorKind::Arneodo => {
                "    let dx = y * dt;
    let dy = z * dt;
    let dz = (-a * x - b * y - z + d * x * x * x) * dt;
"
            }
            AttractorKind::Aizawa => {
                "    let dx = ((z - b) * x - d * y) * dt;
    let dy = (d * x + (z - b) * y) * dt;
    let dz = (c + a * z - (z * z * z) / 3.0 - x * x + f * z * (x * x * x)) * dt;
"
            }
            AttractorKind::ChenLee => {
                "    let dx = (a * x - y * z) * dt;
    let dy = (b * y + x * z) * dt;
    let dz = (d * z + (x * y) / 3.0) * dt;
"
            }
            AttractorKind::Rossler => {
                "    let dx = (-y - z) * dt;
    let dy = (x + a * y) * dt;
    let dz = (b + z * (x - c)) * dt;
"
            }
            AttractorKind::SprottB => {
                "    let dx = (a * y * z) * dt;
    let dy = (x - b * y) * dt;
    let dz = (c - x * y) * dt;
"
            }
            AttractorKind::SprottLinzF => {
                "    let dx = (y + z) * dt;
    let dy = (-x + a * y) * dt;
    let dz = (x * x - z) * dt;
"
            }
            AttractorKind::Halvorsen => {
                "    let dx = (-a * x - 4.0 * y - 4.0 * z - y * y) * dt;
    let dy = (-a * y - 4.0 * z - 4.0 * x - z * z) * dt;
    let dz = (-a * z - 4.0 * x - 4.0 * y - x * x) * dt;
"
            }
            AttractorKind::QuadraticStrange => {
                "    let dx = (a0 + a1 * x + a2 * y + a3 * z + a4 * x * y + a5 * x * z + a6 * y * z + a7 * x * x + a8 * y * y + a9 * z * z) * dt;
    let dy = (a10 + a11 * x + a12 * y + a13 * z + a14 * x * y + a15 * x * z + a16 * y * z + a17 * x * x + a18 * y * y + a19 * z * z) * dt;
    let dz = (a20 + a21 * x + a22 * y + a23 * z + a24 * x * y + a25 * x * z + a26 * y * z + a27 * x * x + a28 * y * y + a29 * z * z) * dt;
"
            }
            AttractorKind::Identity => "",
        }
    }

    /// Generate the WGSL `field_delta` function for this field.
    ///
    /// Coefficients are loaded from `sim.coeffs` by static slot index so
    /// runtime overrides apply without regenerating the shader; the
    /// timestep is emitted as a literal.
    pub fn wgsl_delta_fn(self) -> String {
        if self == AttractorKind::Identity {
            return "fn field_delta(p: vec3<f32>) -> vec3<f32> {\n    return vec3<f32>(0.0);\n}\n"
                .to_string();
        }

        const LANES: [&str; 4] = ["x", "y", "z", "w"];
        let mut body = String::new();
        for (i, (name, _)) in self.coefficient_defaults().iter().enumerate() {
            body.push_str(&format!(
                "    let {} = sim.coeffs[{}].{};\n",
                name,
                i / 4,
                LANES[i % 4]
            ));
        }
        body.push_str(&format!("    let dt = {:?};\n", self.timestep()));
        body.push_str("    let x = p.x;\n    let y = p.y;\n    let z = p.z;\n");
        body.push_str(self.wgsl_equations());
        body.push_str("    return vec3<f32>(dx, dy, dz);\n");

        format!("fn field_delta(p: vec3<f32>) -> vec3<f32> {{\n{}}}\n", body)
    }

    /// Default coefficient values as a plain vector, in slot order.
    pub fn default_values(self) -> Vec<f32> {
        self.coefficient_defaults().iter().map(|(_, v)| *v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lorenz_delta_at_unit_state() {
        let kind = AttractorKind::Lorenz;
        let delta = kind.integrate(Vec3::ONE, &kind.default_values());

        // dx = dt * a * (y - x) with x == y
        assert_eq!(delta.x, 0.0);
        // dy = dt * (x * (b - z) - y)
        let expected_dy = 0.02 * (1.0 * (14.0 - 1.0) - 1.0);
        assert!((delta.y - expected_dy).abs() < 1e-6);
        // dz = dt * (x * y - c * z)
        let expected_dz = 0.02 * (1.0 - 1.33333);
        assert!((delta.z - expected_dz).abs() < 1e-6);
    }

    #[test]
    fn test_identity_is_exactly_zero() {
        let kind = AttractorKind::Identity;
        for pos in [Vec3::ZERO, Vec3::ONE, Vec3::new(-4.2, 17.0, 0.003)] {
            assert_eq!(kind.integrate(pos, &[]), Vec3::ZERO);
        }
    }

    #[test]
    fn test_integrate_is_deterministic() {
        let pos = Vec3::new(0.3, -1.7, 2.4);
        for kind in AttractorKind::ALL {
            let coeffs = kind.default_values();
            let first = kind.integrate(pos, &coeffs);
            let second = kind.integrate(pos, &coeffs);
            assert_eq!(first, second, "{} not deterministic", kind.name());
        }
    }

    #[test]
    fn test_id_round_trip() {
        for kind in AttractorKind::ALL {
            assert_eq!(AttractorKind::from_id(kind.id()), kind);
        }
    }

    #[test]
    fn test_unknown_id_falls_back_to_identity() {
        assert_eq!(AttractorKind::from_id(99), AttractorKind::Identity);
        assert_eq!(AttractorKind::from_id(-7), AttractorKind::Identity);
    }

    #[test]
    fn test_coefficient_arity() {
        assert_eq!(AttractorKind::Thomas.coefficient_count(), 1);
        assert_eq!(AttractorKind::Lorenz.coefficient_count(), 3);
        assert_eq!(AttractorKind::Dequan.coefficient_count(), 6);
        assert_eq!(AttractorKind::QuadraticStrange.coefficient_count(), 30);
        assert_eq!(AttractorKind::Identity.coefficient_count(), 0);
        for kind in AttractorKind::ALL {
            assert!(kind.coefficient_count() <= MAX_COEFFICIENTS);
        }
    }

    #[test]
    fn test_missing_coefficients_use_defaults() {
        let kind = AttractorKind::Lorenz;
        let from_empty = kind.integrate(Vec3::new(2.0, 1.0, 3.0), &[]);
        let from_defaults = kind.integrate(Vec3::new(2.0, 1.0, 3.0), &kind.default_values());
        assert_eq!(from_empty, from_defaults);
    }

    #[test]
    fn test_override_changes_result() {
        let kind = AttractorKind::Thomas;
        let pos = Vec3::new(0.5, 0.5, 0.5);
        let default = kind.integrate(pos, &kind.default_values());
        let overridden = kind.integrate(pos, &[0.5]);
        assert_ne!(default, overridden);
    }

    #[test]
    fn test_distance_scale_table() {
        assert_eq!(AttractorKind::Lorenz.distance_color_scale(), 0.025);
        assert_eq!(AttractorKind::QuadraticStrange.distance_color_scale(), 0.7);
        assert_eq!(AttractorKind::Identity.distance_color_scale(), 0.01);
        for kind in AttractorKind::ALL {
            let scale = kind.distance_color_scale();
            assert!(scale >= 0.005 && scale <= 0.7, "{} out of tuned range", kind.name());
        }
    }

    #[test]
    fn test_wgsl_emits_static_slot_loads() {
        let wgsl = AttractorKind::Lorenz.wgsl_delta_fn();
        assert!(wgsl.contains("let a = sim.coeffs[0].x;"));
        assert!(wgsl.contains("let b = sim.coeffs[0].y;"));
        assert!(wgsl.contains("let c = sim.coeffs[0].z;"));
        assert!(wgsl.contains("let dt = 0.02;"));

        let quad = AttractorKind::QuadraticStrange.wgsl_delta_fn();
        assert!(quad.contains("let a29 = sim.coeffs[7].y;"));
    }

    #[test]
    fn test_identity_wgsl_has_no_coefficient_loads() {
        let wgsl = AttractorKind::Identity.wgsl_delta_fn();
        assert!(!wgsl.contains("sim.coeffs"));
        assert!(wgsl.contains("return vec3<f32>(0.0);"));
    }
}
