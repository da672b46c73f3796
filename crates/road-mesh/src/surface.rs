//! Asphalt surface tessellation.
//!
//! The spine is sampled at fixed distance steps. Every sample contributes one
//! vertex per boundary column, and consecutive samples are stitched into
//! quads between neighbouring columns.

use road_geometry::{distance_steps, ArcLengthCurve};
use road_math::{Transform, Vector3};
use road_profile::CrossSectionProfile;

use crate::triangle::{stitch_strip, Triangle};
use crate::vertex::{Vertex, VertexBuffer};

/// Columns and triangles of one surface build. Inner columns are empty when
/// the profile has no green lane.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    pub sample_distances: Vec<f64>,
    pub left_outer: Vec<Vertex>,
    pub left_inner: Vec<Vertex>,
    pub right_inner: Vec<Vertex>,
    pub right_outer: Vec<Vertex>,
    /// Slope-following up vector per sample, in local space.
    pub ups: Vec<Vector3>,
    pub triangles: Vec<Triangle>,
}

impl SurfaceMesh {
    pub fn sample_count(&self) -> usize {
        self.sample_distances.len()
    }

    pub fn has_green_lane(&self) -> bool {
        !self.left_inner.is_empty()
    }
}

/// Builds the asphalt surface of one road segment.
///
/// The spine lives in world space; emitted vertices are converted into the
/// segment's local space through `transform`.
pub struct SurfaceMeshBuilder<'a> {
    curve: &'a ArcLengthCurve,
    profile: &'a CrossSectionProfile,
    transform: &'a Transform,
}

impl<'a> SurfaceMeshBuilder<'a> {
    pub fn new(
        curve: &'a ArcLengthCurve,
        profile: &'a CrossSectionProfile,
        transform: &'a Transform,
    ) -> Self {
        Self {
            curve,
            profile,
            transform,
        }
    }

    /// Append the surface vertices to `buffer` and triangulate them.
    pub fn build(&self, buffer: &mut VertexBuffer) -> SurfaceMesh {
        let total = self.curve.total_distance();
        let section = self.profile.at_length(total);
        let green = self.profile.green_lane;
        let mut mesh = SurfaceMesh::default();

        for d in distance_steps(total, self.profile.curve_accuracy) {
            let frame = self.curve.frame_at(d);
            let mut place =
                |lateral: f64| buffer.push(self.transform.inverse_transform_point(frame.offset(lateral)));

            mesh.left_outer.push(place(section.left_outer_offset(d)));
            if green {
                mesh.left_inner.push(place(section.left_green_offset(d)));
                mesh.right_inner.push(place(section.right_green_offset(d)));
            }
            mesh.right_outer.push(place(section.right_outer_offset(d)));

            let up = self.curve.sloped_frame_at(d).up;
            mesh.ups
                .push(self.transform.inverse_transform_vector(up).normalize_or(Vector3::Y));
            mesh.sample_distances.push(d);
        }

        if green {
            stitch_strip(&mesh.left_outer, &mesh.left_inner, &mesh.ups, &mut mesh.triangles);
            stitch_strip(&mesh.right_inner, &mesh.right_outer, &mesh.ups, &mut mesh.triangles);
        } else {
            stitch_strip(&mesh.left_outer, &mesh.right_outer, &mesh.ups, &mut mesh.triangles);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_math::DVec3;

    fn straight() -> ArcLengthCurve {
        ArcLengthCurve::from_points(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(7.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
        )
    }

    fn build(curve: &ArcLengthCurve, profile: &CrossSectionProfile) -> (SurfaceMesh, VertexBuffer) {
        let transform = Transform::identity();
        let mut buffer = VertexBuffer::new();
        let mesh = SurfaceMeshBuilder::new(curve, profile, &transform).build(&mut buffer);
        (mesh, buffer)
    }

    #[test]
    fn test_plain_surface_counts() {
        let curve = straight();
        let mut profile = CrossSectionProfile::with_lanes(1, 1);
        profile.normalize(curve.total_distance());
        let (mesh, buffer) = build(&curve, &profile);
        assert_eq!(mesh.sample_count(), 11);
        assert_eq!(buffer.len(), 22);
        assert_eq!(mesh.triangles.len(), 20);
        assert!(!mesh.has_green_lane());
    }

    #[test]
    fn test_green_lane_doubles_columns() {
        let curve = straight();
        let mut profile = CrossSectionProfile::with_lanes(1, 1);
        profile.green_lane = true;
        profile.normalize(curve.total_distance());
        let (mesh, buffer) = build(&curve, &profile);
        assert_eq!(buffer.len(), 44);
        assert_eq!(mesh.triangles.len(), 40);
        assert!(mesh.has_green_lane());
    }

    #[test]
    fn test_surface_is_wound_clockwise() {
        let curve = ArcLengthCurve::from_points(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 8.0),
            DVec3::new(2.0, 2.0, 10.0),
            DVec3::new(10.0, 3.0, 10.0),
        );
        let mut profile = CrossSectionProfile::with_lanes(2, 1);
        profile.green_lane = true;
        profile.normalize(curve.total_distance());
        let (mesh, buffer) = build(&curve, &profile);
        let positions = buffer.positions();
        assert!(mesh.triangles.iter().all(|t| t.is_clockwise(&positions)));
    }

    #[test]
    fn test_vertices_are_local_to_transform() {
        let curve = straight();
        let profile = CrossSectionProfile::with_lanes(1, 1);
        let transform = Transform::from_translation(DVec3::new(100.0, 0.0, 0.0));
        let mut buffer = VertexBuffer::new();
        SurfaceMeshBuilder::new(&curve, &profile, &transform).build(&mut buffer);
        assert!(buffer.positions().iter().all(|p| p.x < -89.0));
    }
}
