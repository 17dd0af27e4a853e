//! Facet normals for written meshes

use glam::Vec3;

/// Unit normal of the triangle `a`, `b`, `c` wound counter-clockwise;
/// +Z for triangles with no area
pub fn facet_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let a = Vec3::from(a);
    (Vec3::from(b) - a)
        .cross(Vec3::from(c) - a)
        .normalize_or(Vec3::Z)
        .to_array()
}
