//! The export operation: check the scene, bake it, write the texture.

use std::path::{Path, PathBuf};

use tracing::info;
use vat_encode::{BakeOptions, CancelToken, VatBuffer, bake_with_cancel};

use crate::emit::{with_exr_extension, write_exr};
use crate::error::Result;
use crate::scene::SceneDump;

/// Export settings on top of the bake options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSettings {
    pub bake: BakeOptions,
    /// Overrides the scene's first frame.
    pub start: Option<i32>,
    /// Overrides the scene's last frame.
    pub end: Option<i32>,
}

impl ExportSettings {
    /// Frame range to bake for `scene`, inclusive.
    #[must_use]
    pub fn frame_range(&self, scene: &SceneDump) -> (i32, i32) {
        (
            self.start.unwrap_or(scene.frame_start),
            self.end.unwrap_or(scene.frame_end),
        )
    }
}

/// What an export produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Where the texture was written, extension included.
    pub path: PathBuf,
    pub buffer: VatBuffer,
}

/// Bake `scene` and write the texture to `output`.
///
/// `.exr` is appended to `output` when missing. Nothing is written unless
/// every step succeeds.
pub fn export(
    scene: &SceneDump,
    output: &Path,
    settings: &ExportSettings,
    cancel: &CancelToken,
) -> Result<ExportSummary> {
    scene.check_preconditions()?;

    let (start, end) = settings.frame_range(scene);
    info!(object = %scene.object.name, start, end, "baking vertex animation texture");

    let mut evaluator = scene.evaluator();
    let buffer = bake_with_cancel(&mut evaluator, start, end, &settings.bake, cancel)?;

    let path = with_exr_extension(output);
    write_exr(&buffer, &path)?;
    info!(path = %path.display(), "VAT exported");

    Ok(ExportSummary { path, buffer })
}
