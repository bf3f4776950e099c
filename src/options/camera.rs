use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera fitting parameters for the in-memory scene.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Multiplier applied to the fitted distance so the bounding sphere is
    /// not flush with the viewport edges.
    #[schemars(title = "Fit Padding", range(min = 1.0, max = 3.0), extend("step" = 0.05))]
    pub fit_padding: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            fit_padding: 1.5,
        }
    }
}
