//! Painted lane markings.
//!
//! Each marking lane is measured along its own offset path, so dash lengths
//! and gaps stay true on curves. Path distances are mapped back to the spine
//! through an [`OffsetDistanceRemapper`] before any geometry is placed.

use road_geometry::{distance_steps, ArcLengthCurve, OffsetDistanceRemapper};
use road_math::{Transform, Vector3};
use road_profile::{CrossSection, CrossSectionProfile, LineSpec, LineType, RoadSettings};
use tracing::trace;

use crate::triangle::{stitch_strip, Triangle};
use crate::vertex::{Vertex, VertexBuffer};

/// One separately triangulated ribbon of paint.
#[derive(Debug, Clone)]
pub struct MarkingStroke {
    /// Index of the marking lane this stroke belongs to.
    pub marking: usize,
    pub left: Vec<Vertex>,
    pub right: Vec<Vertex>,
    /// Slope-following up vector per sample, in local space.
    pub ups: Vec<Vector3>,
}

impl MarkingStroke {
    pub fn sample_count(&self) -> usize {
        self.left.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkingMesh {
    pub strokes: Vec<MarkingStroke>,
    pub triangles: Vec<Triangle>,
}

impl MarkingMesh {
    pub fn strokes_for(&self, marking: usize) -> impl Iterator<Item = &MarkingStroke> {
        self.strokes.iter().filter(move |s| s.marking == marking)
    }
}

pub struct LineMarkingGenerator<'a> {
    curve: &'a ArcLengthCurve,
    profile: &'a CrossSectionProfile,
    lines: &'a LineSpec,
    settings: &'a RoadSettings,
    transform: &'a Transform,
}

impl<'a> LineMarkingGenerator<'a> {
    pub fn new(
        curve: &'a ArcLengthCurve,
        profile: &'a CrossSectionProfile,
        lines: &'a LineSpec,
        settings: &'a RoadSettings,
        transform: &'a Transform,
    ) -> Self {
        Self {
            curve,
            profile,
            lines,
            settings,
            transform,
        }
    }

    /// Append marking vertices to `buffer` and triangulate every stroke.
    pub fn generate(&self, buffer: &mut VertexBuffer) -> MarkingMesh {
        let section = self.profile.at_length(self.curve.total_distance());
        let count = self.profile.marking_count();
        let mut mesh = MarkingMesh::default();

        for (index, &line) in self.lines.types.iter().enumerate().take(count) {
            if line == LineType::None {
                continue;
            }
            for spine in self.stroke_spans(&section, index, line) {
                self.emit_style(buffer, &section, index, count, line, &spine, &mut mesh);
            }
        }

        for stroke in &mesh.strokes {
            stitch_strip(&stroke.left, &stroke.right, &stroke.ups, &mut mesh.triangles);
        }
        mesh
    }

    /// Spine distances of every run of paint for one marking lane. Solid
    /// styles have a single run; dashed lines one run per dash.
    fn stroke_spans(&self, section: &CrossSection<'_>, index: usize, line: LineType) -> Vec<Vec<f64>> {
        let offset = section.marking_base_offset(index);
        let step = self.lines.line_accuracy;
        let path_length =
            OffsetDistanceRemapper::with_step(self.curve, offset, self.settings.remap_step).path_length();
        let mut remapper = OffsetDistanceRemapper::with_step(self.curve, offset, self.settings.remap_step);

        if line != LineType::Dashed {
            let spine = distance_steps(path_length, step)
                .into_iter()
                .map(|s| remapper.spine_distance(s))
                .collect();
            return vec![distinct(spine)];
        }

        let dash = self.lines.dash_length;
        let mut spans = Vec::new();
        let mut start = dash * 0.5;
        while start < path_length {
            let end = (start + dash).min(path_length);
            let spine = distance_steps(end - start, step)
                .into_iter()
                .map(|s| remapper.spine_distance(start + s))
                .collect();
            spans.push(distinct(spine));
            start += 2.0 * dash;
        }
        trace!(index, dashes = spans.len(), path_length, "dashed marking");
        spans
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_style(
        &self,
        buffer: &mut VertexBuffer,
        section: &CrossSection<'_>,
        index: usize,
        count: usize,
        line: LineType,
        spine: &[f64],
        mesh: &mut MarkingMesh,
    ) {
        let centers: Vec<f64> = spine
            .iter()
            .map(|&d| section.marking_offset(index, count, d))
            .collect();
        match line {
            LineType::Double => {
                let space = self.settings.double_line_half_space;
                for shift in [-space, space] {
                    mesh.strokes
                        .push(self.emit_stroke(buffer, index, spine, &centers, shift));
                }
            }
            LineType::Single | LineType::Dashed => {
                mesh.strokes.push(self.emit_stroke(buffer, index, spine, &centers, 0.0));
            }
            LineType::None => {}
        }
    }

    fn emit_stroke(
        &self,
        buffer: &mut VertexBuffer,
        marking: usize,
        spine: &[f64],
        centers: &[f64],
        shift: f64,
    ) -> MarkingStroke {
        let half = self.settings.line_half_width;
        let lift = self.settings.marking_lift;
        let mut stroke = MarkingStroke {
            marking,
            left: Vec::with_capacity(spine.len()),
            right: Vec::with_capacity(spine.len()),
            ups: Vec::with_capacity(spine.len()),
        };
        for (&d, &center) in spine.iter().zip(centers) {
            let frame = self.curve.frame_at(d);
            let center = center + shift;
            let left = frame.offset_lifted(center - half, lift);
            let right = frame.offset_lifted(center + half, lift);
            stroke
                .left
                .push(buffer.push(self.transform.inverse_transform_point(left)));
            stroke
                .right
                .push(buffer.push(self.transform.inverse_transform_point(right)));
            let up = self.curve.sloped_frame_at(d).up;
            stroke
                .ups
                .push(self.transform.inverse_transform_vector(up).normalize_or(Vector3::Y));
        }
        stroke
    }
}

/// Path targets closer than one remapper sub-step land on the same spine
/// distance; repeated samples would produce zero-area triangles.
fn distinct(mut spine: Vec<f64>) -> Vec<f64> {
    spine.dedup_by(|next, prev| (*next - *prev).abs() <= 1e-9);
    spine
}
