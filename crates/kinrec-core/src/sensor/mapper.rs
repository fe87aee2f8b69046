use crate::sensor::{CameraPoint, ProjectedPoint};

/// Camera-space to projected-space transform supplied by the vendor driver.
///
/// This is a total function: every camera point maps to some projected point,
/// including points outside the camera frustum (the result is then simply
/// off-canvas). Implementations must never fail.
pub trait CoordinateMapper: Send + Sync {
    /// Map a 3D camera-space point onto the 2D color-aligned plane.
    fn map_camera_point_to_color_space(&self, point: CameraPoint) -> ProjectedPoint;
}
