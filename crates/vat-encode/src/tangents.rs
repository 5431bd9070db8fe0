//! Per-vertex tangent averaging.

use glam::Vec4;
use tracing::warn;

use crate::LoopTangent;

/// Average face-corner tangents into one tangent per vertex.
///
/// Each loop contributes `(tangent.xyz, bitangent_sign)`. The contributions of
/// every loop touching a vertex are summed and divided by their count. The
/// result is not renormalized, so `xyz` can be shorter than unit length where
/// corners disagree; consumers normalize before use.
///
/// # Arguments
///
/// * `loops` - Host-computed tangents, one per face corner
/// * `vertex_count` - Number of vertices in the rest pose
///
/// # Returns
///
/// `vertex_count` tangents. Vertices without any loop get [`Vec4::ZERO`].
#[must_use]
pub fn average_vertex_tangents(loops: &[LoopTangent], vertex_count: usize) -> Vec<Vec4> {
    let mut sums = vec![Vec4::ZERO; vertex_count];
    let mut counts = vec![0u32; vertex_count];

    for corner in loops {
        let Some(sum) = sums.get_mut(corner.vertex_index) else {
            warn!(
                vertex_index = corner.vertex_index,
                vertex_count, "loop references a vertex outside the mesh, skipping"
            );
            continue;
        };
        *sum += corner.tangent.extend(corner.bitangent_sign);
        counts[corner.vertex_index] += 1;
    }

    let mut loose = 0usize;
    let averaged: Vec<Vec4> = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count == 0 {
                loose += 1;
                Vec4::ZERO
            } else {
                #[allow(clippy::cast_precision_loss)]
                let count = count as f32;
                sum / count
            }
        })
        .collect();

    if loose > 0 {
        warn!(loose, "vertices without face corners have no tangent");
    }
    averaged
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn corner(vertex_index: usize, tangent: Vec3, bitangent_sign: f32) -> LoopTangent {
        LoopTangent {
            vertex_index,
            tangent,
            bitangent_sign,
        }
    }

    #[test]
    fn averages_all_incident_corners() {
        let loops = [
            corner(0, Vec3::X, 1.0),
            corner(0, Vec3::Y, 1.0),
            corner(1, Vec3::Z, -1.0),
        ];
        let tangents = average_vertex_tangents(&loops, 2);
        assert_eq!(
            tangents,
            vec![
                Vec4::new(0.5, 0.5, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, -1.0)
            ]
        );
    }

    #[test]
    fn average_is_not_renormalized() {
        let loops = [corner(0, Vec3::X, 1.0), corner(0, Vec3::NEG_X, 1.0)];
        let tangents = average_vertex_tangents(&loops, 1);
        assert_eq!(tangents[0], Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn loose_vertices_get_zero() {
        let tangents = average_vertex_tangents(&[corner(1, Vec3::X, 1.0)], 3);
        assert_eq!(tangents[0], Vec4::ZERO);
        assert_eq!(tangents[1], Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tangents[2], Vec4::ZERO);
    }

    #[test]
    fn out_of_range_corners_are_ignored() {
        let tangents = average_vertex_tangents(&[corner(5, Vec3::X, 1.0)], 1);
        assert_eq!(tangents, vec![Vec4::ZERO]);
    }
}
