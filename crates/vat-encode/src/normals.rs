//! Normal encoding strategies for the fourth texel channel.
//!
//! Two strategies exist:
//!
//! - [`ObjectSpace`]: packs the sampled normal directly with [`pack3`]. This is
//!   what a bake uses unless told otherwise.
//! - [`TangentSpace`]: expresses the sampled normal in the rest pose's tangent
//!   frame and packs its XY with [`pack2`]. Experimental; the shader side has
//!   to rebuild Z and the rest tangent frame itself.

use glam::{Vec3, Vec4, Vec4Swizzles};

use crate::RestVertex;
use crate::pack::{normalize_or_self, pack2, pack3};

/// Turns one vertex's sampled normal into a carrier float.
pub trait NormalEncoding {
    /// Encode `normal` for the vertex whose rest data is `rest`.
    fn encode(&self, rest: &RestVertex, normal: Vec3) -> f32;
}

/// Packs the object-space normal as 10/10/10 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSpace;

impl NormalEncoding for ObjectSpace {
    fn encode(&self, _rest: &RestVertex, normal: Vec3) -> f32 {
        pack3(normal)
    }
}

/// Packs the tangent-space XY of the normal as 16/16 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TangentSpace;

impl NormalEncoding for TangentSpace {
    fn encode(&self, rest: &RestVertex, normal: Vec3) -> f32 {
        pack2(to_tangent_space(rest.normal, rest.tangent, normal).truncate())
    }
}

/// Express `v` in the tangent frame built from a rest normal and tangent.
///
/// The tangent's `w` is the bitangent sign. Both frame axes are normalized
/// first and so is the result; zero-length vectors pass through unchanged.
#[must_use]
pub fn to_tangent_space(rest_normal: Vec3, rest_tangent: Vec4, v: Vec3) -> Vec3 {
    let normal = normalize_or_self(rest_normal);
    let tangent = normalize_or_self(rest_tangent.xyz());
    let bitangent = normal.cross(tangent) * rest_tangent.w;

    normalize_or_self(Vec3::new(v.dot(tangent), v.dot(bitangent), v.dot(normal)))
}

/// Which [`NormalEncoding`] a bake uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalSpace {
    #[default]
    Object,
    Tangent,
}

impl NormalSpace {
    /// Whether rest-pose tangents must be computed for this strategy.
    #[must_use]
    pub fn requires_tangents(self) -> bool {
        matches!(self, Self::Tangent)
    }

    #[must_use]
    pub fn encoding(self) -> &'static dyn NormalEncoding {
        match self {
            Self::Object => &ObjectSpace,
            Self::Tangent => &TangentSpace,
        }
    }
}
