//! VAT buffer assembly.
//!
//! The buffer is row-major: one row per frame, one texel per vertex, four
//! floats per texel. Row `y` holds frame `start + y`, texel `x` holds the
//! vertex with stable index `x`.

use tracing::{debug, info, warn};

use crate::error::{BakeError, BakeResult};
use crate::normals::NormalSpace;
use crate::sampler::{FrameEvaluator, FrameSampler};
use crate::tangents::average_vertex_tangents;
use crate::{CHANNELS, CancelToken, FrameSample, REST_FRAME, RestPose};

/// Settings for a single bake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BakeOptions {
    /// Write a packed normal into the fourth channel. When off it is zero.
    pub export_normal: bool,
    /// Log every vertex of every frame at info level.
    pub print_diagnostics: bool,
    /// Strategy used to encode normals.
    pub normal_space: NormalSpace,
}

impl Default for BakeOptions {
    fn default() -> Self {
        Self {
            export_normal: true,
            print_diagnostics: false,
            normal_space: NormalSpace::Object,
        }
    }
}

/// Finished texel data plus its texture dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct VatBuffer {
    texels: Vec<f32>,
    width: usize,
    height: usize,
    start_frame: i32,
}

impl VatBuffer {
    /// Texture width, one column per vertex.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Texture height, one row per frame.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Frame stored in row 0.
    #[must_use]
    pub fn start_frame(&self) -> i32 {
        self.start_frame
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.texels
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.texels
    }

    /// All texels of row `y`.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        let row_len = self.width * CHANNELS;
        (y < self.height).then(|| &self.texels[y * row_len..(y + 1) * row_len])
    }

    /// The texel of vertex `x` in row `y`.
    #[must_use]
    pub fn texel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x * CHANNELS;
        Some([row[start], row[start + 1], row[start + 2], row[start + 3]])
    }
}

/// Number of rows a bake of `start..=end` produces.
pub fn frame_count(start: i32, end: i32) -> BakeResult<usize> {
    if end < start {
        return Err(BakeError::InvalidRange { start, end });
    }
    let span = usize::try_from(end.abs_diff(start)).unwrap_or(usize::MAX);
    Ok(span.saturating_add(1))
}

/// Bake `start..=end` into a VAT buffer.
///
/// See [`bake_with_cancel`].
pub fn bake<E: FrameEvaluator + ?Sized>(
    evaluator: &mut E,
    start: i32,
    end: i32,
    options: &BakeOptions,
) -> BakeResult<VatBuffer> {
    bake_with_cancel(evaluator, start, end, options, &CancelToken::new())
}

/// Bake `start..=end` into a VAT buffer, checking `cancel` before each frame.
///
/// The rest pose is captured at [`REST_FRAME`] regardless of `start`, so
/// offsets are always relative to frame 0. Frames are sampled strictly in
/// order. Once sampling has begun the evaluator is moved back to
/// [`REST_FRAME`], whether or not the bake succeeded.
///
/// # Errors
///
/// - [`BakeError::InvalidRange`] if `end < start`, before anything is sampled
/// - [`BakeError::BakeFailed`] if a frame cannot be sampled or its vertex
///   count differs from the rest pose
/// - [`BakeError::Cancelled`] if `cancel` fires
///
/// No buffer is returned on error.
pub fn bake_with_cancel<E: FrameEvaluator + ?Sized>(
    evaluator: &mut E,
    start: i32,
    end: i32,
    options: &BakeOptions,
    cancel: &CancelToken,
) -> BakeResult<VatBuffer> {
    let frames = frame_count(start, end)?;

    let result = FrameSampler::capture_rest(&mut *evaluator, REST_FRAME)
        .map_err(BakeError::from)
        .and_then(|(mut sampler, rest)| {
            fill(&mut sampler, &rest, start, end, frames, options, cancel)
        });

    if let Err(err) = evaluator.restore(REST_FRAME) {
        warn!(%err, "could not return host to the rest frame");
    }
    result
}

fn fill<E: FrameEvaluator>(
    sampler: &mut FrameSampler<E>,
    rest_sample: &FrameSample,
    start: i32,
    end: i32,
    frames: usize,
    options: &BakeOptions,
    cancel: &CancelToken,
) -> BakeResult<VatBuffer> {
    let vertex_count = sampler.vertex_count();

    let tangents = if options.export_normal && options.normal_space.requires_tangents() {
        let loops = sampler.loop_tangents()?;
        Some(average_vertex_tangents(&loops, vertex_count))
    } else {
        None
    };
    let rest = RestPose::from_sample(rest_sample, tangents.as_deref());

    let too_large = BakeError::BufferTooLarge {
        frames,
        vertices: vertex_count,
    };
    let row_len = vertex_count.checked_mul(CHANNELS).ok_or(too_large.clone())?;
    let len = frames.checked_mul(row_len).ok_or(too_large)?;

    if options.print_diagnostics {
        info!("Vertex Count {vertex_count} Frame Count {frames}");
    }

    let encoding = options
        .export_normal
        .then(|| options.normal_space.encoding());
    let mut texels = vec![0.0f32; len];

    for (row, frame) in (start..=end).enumerate() {
        if cancel.is_cancelled() {
            info!(frame, "bake cancelled");
            return Err(BakeError::Cancelled { frame });
        }

        let sample = sampler.sample(frame)?;
        debug!(frame, row, "sampled frame");
        if options.print_diagnostics {
            info!("Frame {frame}:");
        }

        let row_texels = &mut texels[row * row_len..(row + 1) * row_len];
        let vertices = sample.vertices.iter().zip(&rest.vertices);
        for (i, (texel, (current, rest_vertex))) in
            row_texels.chunks_exact_mut(CHANNELS).zip(vertices).enumerate()
        {
            let offset = current.position - rest_vertex.position;
            let packed = encoding.map_or(0.0, |e| e.encode(rest_vertex, current.normal));
            texel.copy_from_slice(&[offset.x, offset.y, offset.z, packed]);

            if options.print_diagnostics {
                info!(
                    "Vertex {i} Position Delta {offset} Normal {} Packed {:#010x}",
                    current.normal,
                    packed.to_bits()
                );
            }
        }
    }

    info!(
        width = vertex_count,
        height = frames,
        start,
        end,
        "baked vertex animation texture"
    );

    Ok(VatBuffer {
        texels,
        width: vertex_count,
        height: frames,
        start_frame: start,
    })
}
