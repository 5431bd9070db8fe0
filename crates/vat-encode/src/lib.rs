//! Encode per-vertex animation into a vertex animation texture (VAT) buffer.
//!
//! This crate provides the synchronous core of a VAT bake: the packing codec
//! that squeezes a normal into one float channel, the frame sampler that
//! validates host snapshots, and the builder that lays out the final buffer.
//! Nothing here touches the filesystem - the caller owns texture emission.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives beyond cancellation
//! - **Host-agnostic**: The animated mesh is reached only through [`FrameEvaluator`]
//! - **Deterministic**: Identical snapshots produce bit-identical buffers
//!
//! # Key functions
//!
//! - [`pack3`] / [`unpack3`]: 10/10/10 normal packing into a float bit pattern
//! - [`pack2`] / [`unpack2`]: 16/16 packing used by the tangent-space path
//! - [`average_vertex_tangents`]: Per-vertex mean of face-corner tangents
//! - [`bake`]: Sample a frame range and assemble the texel buffer

mod builder;
mod cancel;
mod error;

pub mod normals;
pub mod pack;
pub mod sampler;
pub mod tangents;

pub use builder::{BakeOptions, VatBuffer, bake, bake_with_cancel, frame_count};
pub use cancel::CancelToken;
pub use error::{BakeError, BakeResult, SampleError, SampleResult};
pub use normals::{NormalEncoding, NormalSpace, ObjectSpace, TangentSpace};
pub use pack::{pack2, pack3, unpack2, unpack3};
pub use sampler::{FrameEvaluator, FrameSampler};
pub use tangents::average_vertex_tangents;

use glam::{Vec3, Vec4};

/// Frame the rest pose is always captured at, whatever the bake range is.
pub const REST_FRAME: i32 = 0;

/// Float channels per texel: position delta XYZ followed by the packed normal.
pub const CHANNELS: usize = 4;

/// A single vertex as reported by the host at one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexSample {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Every vertex of the mesh at one frame, ordered by stable vertex index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSample {
    /// Frame the snapshot was taken at.
    pub frame: i32,
    /// Vertex `i` of this list is the vertex whose stable index is `i`.
    pub vertices: Vec<VertexSample>,
}

impl FrameSample {
    #[must_use]
    pub fn new(frame: i32, vertices: Vec<VertexSample>) -> Self {
        Self { frame, vertices }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Tangent frame of one face corner (loop), as computed by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTangent {
    /// Stable index of the vertex this corner belongs to.
    pub vertex_index: usize,
    pub tangent: Vec3,
    /// Handedness of the bitangent, `1.0` or `-1.0`.
    pub bitangent_sign: f32,
}

/// Rest-pose data for one vertex.
///
/// `tangent.w` carries the averaged bitangent sign.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RestVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec4,
}

/// Reference pose that every frame's offsets are measured against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestPose {
    /// Frame the pose was captured at (always [`REST_FRAME`] for a bake).
    pub frame: i32,
    pub vertices: Vec<RestVertex>,
}

impl RestPose {
    /// Build a rest pose from a sample, attaching per-vertex tangents when given.
    ///
    /// Vertices beyond the end of `tangents` get a zero tangent.
    #[must_use]
    pub fn from_sample(sample: &FrameSample, tangents: Option<&[Vec4]>) -> Self {
        let vertices = sample
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| RestVertex {
                position: v.position,
                normal: v.normal,
                tangent: tangents
                    .and_then(|t| t.get(i).copied())
                    .unwrap_or(Vec4::ZERO),
            })
            .collect();
        Self {
            frame: sample.frame,
            vertices,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}
