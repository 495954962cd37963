/*

    Batch culling: classify many volumes against a single
    frustum and summarize the result.

    A culling query looks like:
        {
            "Name": "street",
            "Camera": { "Position": "0 2 10", "_type": "lookAt", "GazePoint": "0 0 0" },
            "Boxes": [ "-1 -1 -1 1 1 1", {"Min": [4, 0, 0], "Max": [5, 1, 1]} ],
            "Spheres": [ "0 0 -20 2" ]
        }
    A raw "Matrix" (16 numbers, M11..M44) can be given instead of
    the Camera, and takes precedence if both are present.

    @date: 26 Nov, 2025
    @author: bartu
*/

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::time::Instant;

use crate::bounding_box::BoundingBox;
use crate::bounding_frustum::BoundingFrustum;
use crate::bounding_sphere::BoundingSphere;
use crate::camera::Camera;
use crate::error::LoadError;
use crate::json_parser::{deser_opt_matrix, deser_vec_string_or_struct};
use crate::prelude::*;

#[derive(Debug, Deserialize, Clone)]
#[derive(SmartDefault)]
#[serde(default)]
pub struct CullingQuery {
    #[default = "unnamed"]
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Matrix", deserialize_with = "deser_opt_matrix")]
    pub matrix: Option<Matrix4>,

    #[serde(rename = "Camera")]
    pub camera: Option<Camera>,

    #[serde(rename = "Boxes", deserialize_with = "deser_vec_string_or_struct")]
    pub boxes: Vec<BoundingBox>,

    #[serde(rename = "Spheres", deserialize_with = "deser_vec_string_or_struct")]
    pub spheres: Vec<BoundingSphere>,
}

impl CullingQuery {

    pub fn frustum(&self) -> Result<BoundingFrustum, LoadError> {
        match (&self.matrix, &self.camera) {
            (Some(matrix), _) => Ok(BoundingFrustum::new(*matrix)),
            (None, Some(camera)) => Ok(camera.frustum()),
            (None, None) => Err(LoadError::MissingView { name: self.name.clone() }),
        }
    }

    pub fn run(&self) -> Result<CullReport, LoadError> {
        let frustum = self.frustum()?;
        if !frustum.has_finite_corners() {
            warn!("Query '{}' produced a degenerate frustum", self.name);
        }

        let start = Instant::now();
        let boxes = cull_boxes(&frustum, &self.boxes);
        let spheres = cull_spheres(&frustum, &self.spheres);
        debug!(
            "Culling {} boxes and {} spheres for '{}' took {:?}",
            boxes.len(), spheres.len(), self.name, start.elapsed()
        );

        let summary = CullSummary::from_results(boxes.iter().chain(spheres.iter()));
        Ok(CullReport {
            name: self.name.clone(),
            frustum,
            boxes,
            spheres,
            summary,
        })
    }
}

pub fn cull_boxes(frustum: &BoundingFrustum, boxes: &[BoundingBox]) -> Vec<ContainmentType> {
    boxes
        .par_iter()
        .map(|bbox| frustum.contains_box(bbox))
        .collect()
}

pub fn cull_spheres(frustum: &BoundingFrustum, spheres: &[BoundingSphere]) -> Vec<ContainmentType> {
    spheres
        .par_iter()
        .map(|sphere| frustum.contains_sphere(sphere))
        .collect()
}

/// Boxes that are at least partially inside the frustum, in input order.
pub fn visible_boxes(frustum: &BoundingFrustum, boxes: &[BoundingBox]) -> Vec<BoundingBox> {
    boxes
        .par_iter()
        .filter(|bbox| frustum.intersects_box(bbox))
        .copied()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CullSummary {
    #[serde(rename = "Inside")]
    pub inside: usize,
    #[serde(rename = "Intersecting")]
    pub intersecting: usize,
    #[serde(rename = "Outside")]
    pub outside: usize,
}

impl CullSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ContainmentType>,
    {
        let mut summary = CullSummary::default();
        for result in results {
            match result {
                ContainmentType::Contains => summary.inside += 1,
                ContainmentType::Intersects => summary.intersecting += 1,
                ContainmentType::Disjoint => summary.outside += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.inside + self.intersecting + self.outside
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CullReport {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Frustum")]
    pub frustum: BoundingFrustum,
    #[serde(rename = "Boxes")]
    pub boxes: Vec<ContainmentType>,
    #[serde(rename = "Spheres")]
    pub spheres: Vec<ContainmentType>,
    #[serde(rename = "Summary")]
    pub summary: CullSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const QUERY: &str = r#"{
        "Name": "street",
        "Camera": {
            "_type": "lookAt",
            "Position": "0 0 10",
            "GazePoint": "0 0 0",
            "FovY": 90,
            "NearDistance": 1,
            "FarDistance": 100
        },
        "Boxes": [
            "-1 -1 -1 1 1 1",
            {"Min": [-1, -1, 15], "Max": [1, 1, 20]},
            {"Min": {"x": -1, "y": -1, "z": -95}, "Max": {"x": 1, "y": 1, "z": -85}}
        ],
        "Spheres": [ "0 0 -20 2", {"Center": "0 0 50", "Radius": 1} ]
    }"#;

    #[test]
    fn test_query_from_json() {
        let query: CullingQuery = serde_json::from_str(QUERY).unwrap();
        assert_eq!(query.name, "street");
        assert!(query.matrix.is_none());
        assert_eq!(query.boxes.len(), 3);
        assert_eq!(query.boxes[0], BoundingBox::new(Vector3::splat(-1.0), Vector3::ONE));
        assert_eq!(query.spheres[1], BoundingSphere::new(Vector3::new(0.0, 0.0, 50.0), 1.0));

        let report = query.run().unwrap();
        assert_eq!(
            report.boxes,
            vec![ContainmentType::Contains, ContainmentType::Disjoint, ContainmentType::Intersects]
        );
        assert_eq!(report.spheres, vec![ContainmentType::Contains, ContainmentType::Disjoint]);
        assert_eq!(report.summary, CullSummary { inside: 2, intersecting: 1, outside: 2 });
        assert_eq!(report.summary.total(), 5);
    }

    #[test]
    fn test_matrix_takes_precedence_over_camera() {
        let matrix = Matrix4::perspective_rh(90f64.to_radians(), 1.0, 1.0, 100.0);
        let query = CullingQuery {
            matrix: Some(matrix),
            camera: Some(Camera { position: Vector3::new(0.0, 0.0, 500.0), ..Default::default() }),
            ..Default::default()
        };
        assert_eq!(*query.frustum().unwrap().matrix(), matrix);
    }

    #[test]
    fn test_missing_view_is_an_error() {
        let query: CullingQuery = serde_json::from_str(r#"{"Name": "empty", "Boxes": []}"#).unwrap();
        assert!(matches!(query.run(), Err(LoadError::MissingView { name }) if name == "empty"));
        assert_eq!(CullingQuery::default().name, "unnamed");
    }

    #[test]
    fn test_null_matrix_falls_back_to_camera() {
        let json = r#"{"Name": "cam", "Matrix": null, "Camera": {"Position": "0 0 5"}}"#;
        let query: CullingQuery = serde_json::from_str(json).unwrap();
        assert!(query.matrix.is_none());
        let frustum = query.frustum().unwrap();
        assert_eq!(frustum.contains_point(Vector3::ZERO), ContainmentType::Contains);
    }

    #[test]
    fn test_bad_volume_string_is_rejected() {
        let json = r#"{"Matrix": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1", "Boxes": ["1 2 3"]}"#;
        assert!(serde_json::from_str::<CullingQuery>(json).is_err());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let frustum = BoundingFrustum::new(
            Matrix4::perspective_rh(1.0, 1.5, 0.5, 200.0)
                * Matrix4::look_at_rh(Vector3::new(3.0, 4.0, 30.0), Vector3::ZERO, Vector3::Y),
        );

        let mut rng = rand::rng();
        let boxes: Vec<BoundingBox> = (0..500)
            .map(|_| {
                let min = Vector3::new(
                    rng.random_range(-100.0..100.0),
                    rng.random_range(-100.0..100.0),
                    rng.random_range(-100.0..100.0),
                );
                BoundingBox::new(min, min + Vector3::splat(rng.random_range(0.1..10.0)))
            })
            .collect();
        let spheres: Vec<BoundingSphere> = boxes.iter().map(BoundingSphere::create_from_box).collect();

        let serial: Vec<_> = boxes.iter().map(|b| frustum.contains_box(b)).collect();
        assert_eq!(cull_boxes(&frustum, &boxes), serial);

        let serial: Vec<_> = spheres.iter().map(|s| frustum.contains_sphere(s)).collect();
        assert_eq!(cull_spheres(&frustum, &spheres), serial);

        let visible = visible_boxes(&frustum, &boxes);
        let expected: Vec<_> = boxes.iter().filter(|b| frustum.intersects_box(b)).copied().collect();
        assert_eq!(visible, expected);
    }

    #[test]
    fn test_report_serializes() {
        let query: CullingQuery = serde_json::from_str(QUERY).unwrap();
        let json = serde_json::to_value(query.run().unwrap()).unwrap();
        assert_eq!(json["Name"], "street");
        assert_eq!(json["Boxes"][0], "Contains");
        assert_eq!(json["Summary"]["Outside"], 2);
        assert_eq!(json["Frustum"]["Matrix"].as_array().map(|m| m.len()), Some(16));
    }
}
