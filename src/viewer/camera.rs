//! Orbit camera framing for the in-memory scene.

use glam::{Quat, Vec3};

use crate::options::CameraOptions;

/// Orbit camera around a focus point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    radius: f32,
    /// World-space eye position.
    pub eye: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    padding: f32,
}

impl Camera {
    /// Camera at the origin looking down -Z.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let mut camera = Self {
            orientation: Quat::IDENTITY,
            distance: 150.0,
            focus_point: Vec3::ZERO,
            radius: 0.0,
            eye: Vec3::ZERO,
            fovy: options.fovy,
            padding: options.fit_padding,
        };
        camera.update_camera_pos();
        camera
    }

    /// Point the camera orbits around.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    /// Distance from the focus point to the eye.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Bounding radius of the last framed set.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Frame `positions` so their bounding sphere fills the vertical field
    /// of view, padded. An empty set leaves the camera unchanged; a single
    /// point is framed at the minimum radius.
    pub fn fit_to_positions(&mut self, positions: &[Vec3]) {
        let Some((center, radius)) = bounding_sphere(positions) else {
            return;
        };
        self.focus_point = center;
        self.radius = radius;
        let half_fov = (self.fovy * 0.5).to_radians();
        self.distance = radius.max(MIN_FRAME_RADIUS) * self.padding / half_fov.tan();
        self.update_camera_pos();
    }

    fn update_camera_pos(&mut self) {
        self.eye = self.focus_point + self.orientation * Vec3::Z * self.distance;
    }
}

/// Smallest radius framed, in Angstroms.
const MIN_FRAME_RADIUS: f32 = 1.0;

/// Centroid of `points` and the largest distance from it.
fn bounding_sphere(points: &[Vec3]) -> Option<(Vec3, f32)> {
    if points.is_empty() {
        return None;
    }
    let center = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p) / points.len() as f32;
    let radius_sq = points
        .iter()
        .map(|p| p.distance_squared(center))
        .fold(0.0f32, f32::max);
    Some((center, radius_sq.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_centers_on_centroid() {
        let mut camera = Camera::new(&CameraOptions::default());
        camera.fit_to_positions(&[Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
        assert_eq!(camera.focus_point(), Vec3::ZERO);
        assert!((camera.radius() - 2.0).abs() < 1e-6);
        let expected = 2.0 / (22.5f32.to_radians()).tan() * 1.5;
        assert!((camera.distance() - expected).abs() < 1e-4);
        assert!((camera.eye - Vec3::new(0.0, 0.0, expected)).length() < 1e-4);
    }

    #[test]
    fn single_point_is_framed_at_minimum_radius() {
        let mut camera = Camera::new(&CameraOptions::default());
        camera.fit_to_positions(&[Vec3::new(3.0, 4.0, 5.0)]);
        assert_eq!(camera.focus_point(), Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(camera.radius(), 0.0);
        let expected = 1.0 / (22.5f32.to_radians()).tan() * 1.5;
        assert!((camera.distance() - expected).abs() < 1e-4);
    }

    #[test]
    fn empty_fit_is_a_no_op() {
        let mut camera = Camera::new(&CameraOptions::default());
        let before = camera.clone();
        camera.fit_to_positions(&[]);
        assert_eq!(camera, before);
    }
}
