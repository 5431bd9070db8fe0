//! OpenEXR texture emission.
//!
//! The texture is 32-bit float RGBA with no transfer function: EXR stores
//! linear scene data, which is what a VAT must be read as. Engines that
//! import it need sRGB conversion turned off (the equivalent of tagging it
//! "Non-Color"), otherwise the packed normal bits are destroyed.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba32FImage};
use tracing::{debug, info};
use vat_encode::VatBuffer;

use crate::error::{Error, Result};

/// File extension of the emitted texture.
pub const EXTENSION: &str = "exr";

/// Append `.exr` to `path` unless it already ends with it.
#[must_use]
pub fn with_exr_extension(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
    if has_extension {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(EXTENSION);
        PathBuf::from(name)
    }
}

/// Texture dimensions of `buffer` as image dimensions.
fn dimensions(buffer: &VatBuffer) -> Result<(u32, u32)> {
    if buffer.width() == 0 {
        return Err(Error::EmptyTexture);
    }
    let too_large = || Error::TextureTooLarge {
        width: buffer.width(),
        height: buffer.height(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| too_large())?;
    let height = u32::try_from(buffer.height()).map_err(|_| too_large())?;
    Ok((width, height))
}

/// Write `buffer` to `path` as an RGBA float EXR.
///
/// Pixel `(x, y)` is vertex `x` at frame `start + y`, with row 0 at the top.
/// The image is written next to `path` first and renamed into place, so an
/// existing file is only replaced by a complete texture.
pub fn write_exr(buffer: &VatBuffer, path: &Path) -> Result<()> {
    let (width, height) = dimensions(buffer)?;
    let image = Rgba32FImage::from_raw(width, height, buffer.as_slice().to_vec())
        .ok_or(Error::TextureTooLarge {
            width: buffer.width(),
            height: buffer.height(),
        })?;

    let partial = partial_path(path);
    debug!(path = %partial.display(), width, height, "encoding texture");
    if let Err(err) = image.save_with_format(&partial, ImageFormat::OpenExr) {
        let _ = fs::remove_file(&partial);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(err.into());
    }

    info!(path = %path.display(), width, height, "texture written");
    Ok(())
}

/// Read an RGBA float EXR back.
///
/// # Returns
///
/// `(width, height, texels)` with texels in the same layout as [`VatBuffer`].
pub fn read_exr(path: &Path) -> Result<(u32, u32, Vec<f32>)> {
    let image = image::open(path)?.into_rgba32f();
    let (width, height) = image.dimensions();
    Ok((width, height, image.into_raw()))
}

/// Check that the texture at `path` holds exactly the bits of `buffer`.
pub fn verify_exr(buffer: &VatBuffer, path: &Path) -> Result<()> {
    let (expected_width, expected_height) = dimensions(buffer)?;
    let (width, height, texels) = read_exr(path)?;
    if (width, height) != (expected_width, expected_height) {
        return Err(Error::VerifyMismatch(format!(
            "expected {expected_width}x{expected_height}, found {width}x{height}"
        )));
    }

    let mismatch = texels
        .iter()
        .zip(buffer.as_slice())
        .position(|(read, baked)| read.to_bits() != baked.to_bits());
    if let Some(index) = mismatch {
        let channels = vat_encode::CHANNELS;
        let texel = index / channels;
        return Err(Error::VerifyMismatch(format!(
            "vertex {} frame row {} channel {} differs",
            texel % buffer.width(),
            texel / buffer.width(),
            index % channels
        )));
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}
