//! Plot data for the visualization tab
//!
//! Builds the 2D depth profile and the 3D pothole prism from the measured
//! heights. Drawing lives in the UI; [`raster`] renders the 3D scatter to an
//! image for export.

mod camera;
mod colormap;
pub mod raster;

pub use camera::{OrbitCamera, ProjectedPoint};
pub use colormap::{normalize, plasma};

use glam::Vec3;

/// Triangles of the prism surface, as indices into [`PrismMesh::vertices`]
pub const PRISM_TRIANGLES: [[usize; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [2, 3, 7],
    [2, 7, 6],
    [0, 3, 7],
    [0, 7, 4],
    [1, 2, 6],
    [1, 6, 5],
];

/// Sensor height, road height and hole depth as a labelled series
#[derive(Debug, Clone, PartialEq)]
pub struct DepthProfile {
    pub points: [(&'static str, f64); 3],
}

impl DepthProfile {
    pub fn new(sensor_height: f64, road_height: f64) -> Self {
        Self {
            points: [
                ("Sensor Height", sensor_height),
                ("Average Road", road_height),
                ("Hole Depth", sensor_height - road_height),
            ],
        }
    }

    /// Value range padded so flat or single-valued series still get an axis
    pub fn value_range(&self) -> (f64, f64) {
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
                (lo.min(*v), hi.max(*v))
            });
        let pad = ((max - min) * 0.1).max(0.1);
        (min - pad, max + pad)
    }
}

/// The eight points spanned by the hole depth and the road height
#[derive(Debug, Clone, PartialEq)]
pub struct PrismMesh {
    pub vertices: [Vec3; 8],
}

impl PrismMesh {
    pub fn new(sensor_height: f64, road_height: f64) -> Self {
        let d = (sensor_height - road_height) as f32;
        let r = road_height as f32;
        Self {
            vertices: [
                Vec3::new(d, -d, d),
                Vec3::new(-d, d, d),
                Vec3::new(d, d, d),
                Vec3::new(-d, -d, d),
                Vec3::new(d, d, r),
                Vec3::new(-d, -d, r),
                Vec3::new(d, -d, r),
                Vec3::new(-d, d, r),
            ],
        }
    }

    /// Axis-aligned bounds, never thinner than a small minimum on any axis
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let (mut min, mut max) = self
            .vertices
            .iter()
            .fold((Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        for axis in 0..3 {
            if max[axis] - min[axis] < 0.1 {
                min[axis] -= 0.05;
                max[axis] += 0.05;
            }
        }
        (min, max)
    }

    /// Range of the Z (depth) coordinate used for colouring
    pub fn depth_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            })
    }

    /// Plasma colour of a vertex by its depth
    pub fn vertex_color(&self, index: usize) -> [u8; 3] {
        let (min, max) = self.depth_range();
        plasma(normalize(self.vertices[index].z, min, max))
    }
}

/// The 12 edges of an axis-aligned box
pub fn box_edges(min: Vec3, max: Vec3) -> Vec<(Vec3, Vec3)> {
    let corner = |i: usize| {
        Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };
    let mut edges = Vec::with_capacity(12);
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                edges.push((corner(i), corner(i | bit)));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_profile_points() {
        let profile = DepthProfile::new(1.5, 1.0);
        assert_eq!(profile.points[0], ("Sensor Height", 1.5));
        assert_eq!(profile.points[1], ("Average Road", 1.0));
        assert_eq!(profile.points[2], ("Hole Depth", 0.5));

        let (lo, hi) = profile.value_range();
        assert!(lo < 0.5 && hi > 1.5);
    }

    #[test]
    fn test_flat_profile_gets_a_range() {
        let (lo, hi) = DepthProfile::new(0.0, 0.0).value_range();
        assert!(hi - lo > 0.0);
    }

    #[test]
    fn test_prism_layout() {
        let mesh = PrismMesh::new(1.5, 1.0);
        assert!(mesh.vertices[..4].iter().all(|v| v.z == 0.5));
        assert!(mesh.vertices[4..].iter().all(|v| v.z == 1.0));
        assert!(mesh.vertices.iter().all(|v| v.x.abs() == 0.5 && v.y.abs() == 0.5));
        assert_eq!(mesh.depth_range(), (0.5, 1.0));
    }

    #[test]
    fn test_triangles_index_vertices() {
        assert!(PRISM_TRIANGLES.iter().flatten().all(|&i| i < 8));
    }

    #[test]
    fn test_vertex_colors_follow_depth() {
        let mesh = PrismMesh::new(1.5, 1.0);
        assert_eq!(mesh.vertex_color(0), plasma(0.0));
        assert_eq!(mesh.vertex_color(4), plasma(1.0));
    }

    #[test]
    fn test_box_has_twelve_edges() {
        let edges = box_edges(Vec3::ZERO, Vec3::ONE);
        assert_eq!(edges.len(), 12);
        for (a, b) in edges {
            assert!(((a - b).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_bounds_are_padded() {
        let (min, max) = PrismMesh::new(1.0, 1.0).bounds();
        assert!((max - min).min_element() >= 0.1 - 1e-6);
    }
}
