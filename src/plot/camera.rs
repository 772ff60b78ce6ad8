//! Orbit camera for the 3D pothole view
//!
//! Spherical coordinate camera orbiting the centre of the plotted data. Plot
//! coordinates are Z-up; the camera works Y-up, so points are swapped on the
//! way in.

use glam::{Mat4, Vec3, Vec4};

/// Pitch limit in radians (~80 degrees)
const PITCH_LIMIT: f32 = 1.4;

/// Orbit camera for the 3D plot
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal angle (yaw) in radians
    yaw: f32,
    /// Vertical angle (pitch) in radians
    pitch: f32,
    /// Distance from target point
    distance: f32,
    /// Distance chosen by the last fit, zoom is bounded relative to it
    fit_distance: f32,
    /// Point the camera orbits around (camera space, Y-up)
    target: Vec3,
    /// Aspect ratio (width/height) for projection
    aspect: f32,
    /// Field of view in radians
    fov: f32,
}

/// A plot point projected to the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Horizontal position in pixels from the left edge
    pub x: f32,
    /// Vertical position in pixels from the top edge
    pub y: f32,
    /// Normalized depth, larger is farther away
    pub depth: f32,
}

impl OrbitCamera {
    /// Create a new orbit camera with default settings
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.45,
            distance: 5.0,
            fit_distance: 5.0,
            target: Vec3::ZERO,
            aspect: 4.0 / 3.0,
            fov: std::f32::consts::FRAC_PI_4,
        }
    }

    /// Aim at the centre of a Z-up bounding box and back off until it fits
    pub fn fit_to(&mut self, min: Vec3, max: Vec3) {
        let min = to_camera_space(min);
        let max = to_camera_space(max);
        self.target = (min + max) * 0.5;

        let radius = ((max - min).length() * 0.5).max(0.05);
        self.fit_distance = radius / (self.fov * 0.5).sin() * 1.1;
        self.distance = self.fit_distance;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let near = (self.distance * 0.01).max(1e-4);
        let far = self.distance * 10.0 + 1.0;
        Mat4::perspective_rh(self.fov, self.aspect, near, far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Calculate camera position from spherical coordinates
    pub fn eye_position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Project a Z-up plot point into a viewport of the given pixel size
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Option<ProjectedPoint> {
        let clip = self.view_projection_matrix() * to_camera_space(point).extend(1.0);
        project_clip(clip, width, height)
    }

    /// Handle mouse drag for orbit
    pub fn on_mouse_drag(&mut self, delta: (f32, f32), sensitivity: f32) {
        self.yaw -= delta.0 * sensitivity;
        self.pitch = (self.pitch + delta.1 * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Handle scroll for zoom
    pub fn on_scroll(&mut self, delta: f32) {
        let zoomed = self.distance * (1.0 - delta * 0.1);
        self.distance = zoomed.clamp(self.fit_distance * 0.2, self.fit_distance * 5.0);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Reset the viewing angles and zoom, keeping the fitted target
    pub fn reset(&mut self) {
        let fitted = self.fit_distance;
        *self = Self {
            target: self.target,
            aspect: self.aspect,
            fit_distance: fitted,
            distance: fitted,
            ..Self::new()
        };
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

fn to_camera_space(point: Vec3) -> Vec3 {
    Vec3::new(point.x, point.z, point.y)
}

fn project_clip(clip: Vec4, width: f32, height: f32) -> Option<ProjectedPoint> {
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(ProjectedPoint {
        x: (ndc.x * 0.5 + 0.5) * width,
        y: (0.5 - ndc.y * 0.5) * height,
        depth: ndc.z,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_centre() {
        let mut camera = OrbitCamera::new();
        camera.fit_to(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 2.0));

        let centre = camera.project(Vec3::new(0.0, 0.0, 1.0), 800.0, 600.0).unwrap();
        assert!((centre.x - 400.0).abs() < 0.01);
        assert!((centre.y - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_higher_points_appear_higher() {
        let mut camera = OrbitCamera::new();
        camera.fit_to(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 2.0));

        let low = camera.project(Vec3::new(0.0, 0.0, 0.0), 800.0, 600.0).unwrap();
        let high = camera.project(Vec3::new(0.0, 0.0, 2.0), 800.0, 600.0).unwrap();
        assert!(high.y < low.y);
    }

    #[test]
    fn test_fitted_box_stays_in_view() {
        let mut camera = OrbitCamera::new();
        let (min, max) = (Vec3::new(-0.5, -0.5, 0.5), Vec3::new(0.5, 0.5, 1.0));
        camera.fit_to(min, max);

        for x in [min.x, max.x] {
            for y in [min.y, max.y] {
                for z in [min.z, max.z] {
                    let p = camera.project(Vec3::new(x, y, z), 640.0, 480.0).unwrap();
                    assert!((0.0..=640.0).contains(&p.x));
                    assert!((0.0..=480.0).contains(&p.y));
                }
            }
        }
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut camera = OrbitCamera::new();
        camera.fit_to(Vec3::splat(-1.0), Vec3::splat(1.0));
        let fitted = camera.distance();

        for _ in 0..100 {
            camera.on_scroll(1.0);
        }
        assert!(camera.distance() >= fitted * 0.2 - 1e-4);

        camera.reset();
        assert_eq!(camera.distance(), fitted);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new();
        camera.on_mouse_drag((0.0, 10_000.0), 0.01);
        assert!(camera.eye_position().y <= camera.distance());
        assert!(camera.pitch <= PITCH_LIMIT);
    }
}
