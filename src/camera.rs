/*

    Declare Camera, the pinhole description a culling query
    can give instead of a raw view-projection matrix.

    Two ways to aim it, mirroring the scene files:
        - Gaze: direction the camera looks at
        - _type = "lookAt" with GazePoint: the gaze direction
          is computed as GazePoint - Position

    FovY is given in degrees. Depth range of the resulting
    projection is [0, 1] (right handed, looking down -z).

    @date: Oct, 2025
    @author: bartu
*/

use serde::Deserialize;
use smart_default::SmartDefault;

use crate::bounding_frustum::BoundingFrustum;
use crate::json_parser::{deser_float, deser_vec3};
use crate::prelude::*;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[derive(SmartDefault)]
#[serde(default)]
pub struct Camera {
    #[default = ""]
    #[serde(rename = "_type")]
    pub _type: String,

    #[serde(rename = "Position", deserialize_with = "deser_vec3")]
    pub position: Vector3,

    #[default(Vector3::NEG_Z)]
    #[serde(rename = "Gaze", deserialize_with = "deser_vec3")]
    pub gaze_dir: Vector3,

    #[serde(rename = "GazePoint", deserialize_with = "deser_vec3")]
    pub gaze_point: Vector3, // To be used if _type = "lookAt"

    #[default(Vector3::Y)]
    #[serde(rename = "Up", deserialize_with = "deser_vec3")]
    pub up: Vector3,

    #[default = 60.0]
    #[serde(rename = "FovY", deserialize_with = "deser_float")]
    pub fovy: Float,

    #[default = 1.0]
    #[serde(rename = "Aspect", deserialize_with = "deser_float")]
    pub aspect: Float,

    #[default = 0.1]
    #[serde(rename = "NearDistance", deserialize_with = "deser_float")]
    pub near_distance: Float,

    #[default = 1000.0]
    #[serde(rename = "FarDistance", deserialize_with = "deser_float")]
    pub far_distance: Float,
}

impl Camera {

    pub fn gaze(&self) -> Vector3 {
        if self._type == "lookAt" {
            self.gaze_point - self.position
        } else {
            self.gaze_dir
        }
    }

    pub fn view(&self) -> Matrix4 {
        Matrix4::look_to_rh(self.position, self.gaze().normalize(), self.up)
    }

    pub fn projection(&self) -> Matrix4 {
        Matrix4::perspective_rh(self.fovy.to_radians(), self.aspect, self.near_distance, self.far_distance)
    }

    /// Projection * view, ready to be handed to BoundingFrustum.
    pub fn view_projection(&self) -> Matrix4 {
        if self.up.cross(self.gaze()).length_squared() < 1e-12 {
            warn!("Camera up vector is parallel to gaze, view matrix will not be finite");
        }
        debug!("Camera position {:?}, gaze {:?}", self.position, self.gaze());
        self.projection() * self.view()
    }

    pub fn frustum(&self) -> BoundingFrustum {
        BoundingFrustum::new(self.view_projection())
    }
}
