use nalgebra::{Vector2, Vector3};

/// Tracking-space vector. Serialized as a bare `[x, y, z]` array.
pub type Vec3 = Vector3<f64>;

/// Screen-plane vector in pixels. Serialized as `[x, y]`.
pub type Vec2 = Vector2<f64>;

/// Screen-plane projection: drops depth and flips Y, since tracking-space
/// Y grows upward while screen Y grows downward.
pub fn to_screen_plane(v: &Vec3) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

/// Unit vector in the same direction; the zero vector stays zero.
pub fn direction(v: &Vec3) -> Vec3 {
    v.try_normalize(0.0).unwrap_or_else(Vec3::zeros)
}
