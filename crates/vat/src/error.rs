//! Error types for exporting a texture.

use thiserror::Error;
use vat_encode::BakeError;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Something the scene must satisfy before a bake can start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    #[error("active object '{name}' is not a mesh (it is a {kind})")]
    NotAMesh { name: String, kind: String },

    #[error("object '{name}' has no \"VertexIndex\" UV map to identify its vertices")]
    MissingUvLayer { name: String },
}

/// Errors that can occur while exporting a texture.
///
/// Whatever the variant, no texture file is left behind.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    PreconditionFailed(#[from] Precondition),

    #[error(transparent)]
    Bake(#[from] BakeError),

    #[error("nothing to write: the mesh has no vertices")]
    EmptyTexture,

    #[error("texture of {width}x{height} texels is too large for an image")]
    TextureTooLarge { width: usize, height: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("written texture does not match the baked buffer: {0}")]
    VerifyMismatch(String),
}
