//! Frame sampling from the host's deformation pipeline.

use tracing::debug;

use crate::error::{SampleError, SampleResult};
use crate::{FrameSample, LoopTangent};

/// Access to an animated mesh owned by the host application.
///
/// Sampling moves a cursor that lives in the host (the "current frame"), so
/// an evaluator is driven from one thread, one frame at a time.
pub trait FrameEvaluator {
    /// Advance the host to `frame` and report every vertex, ordered by
    /// stable vertex index.
    fn sample_at(&mut self, frame: i32) -> SampleResult<FrameSample>;

    /// Face-corner tangents of the mesh at the current frame.
    ///
    /// Only needed by tangent-space normal encoding. Hosts that cannot
    /// provide tangents return an empty list.
    fn loop_tangents(&mut self) -> SampleResult<Vec<LoopTangent>> {
        Ok(Vec::new())
    }

    /// Put the host cursor back on `frame` once a bake is over.
    fn restore(&mut self, frame: i32) -> SampleResult<()> {
        let _ = frame;
        Ok(())
    }
}

impl<E: FrameEvaluator + ?Sized> FrameEvaluator for &mut E {
    fn sample_at(&mut self, frame: i32) -> SampleResult<FrameSample> {
        (**self).sample_at(frame)
    }

    fn loop_tangents(&mut self) -> SampleResult<Vec<LoopTangent>> {
        (**self).loop_tangents()
    }

    fn restore(&mut self, frame: i32) -> SampleResult<()> {
        (**self).restore(frame)
    }
}

/// Samples frames and checks each one against the rest pose's topology.
pub struct FrameSampler<E> {
    evaluator: E,
    vertex_count: usize,
}

impl<E: FrameEvaluator> FrameSampler<E> {
    /// Capture the rest pose at `rest_frame` and fix the expected vertex count.
    ///
    /// # Returns
    ///
    /// The sampler together with the rest sample.
    pub fn capture_rest(mut evaluator: E, rest_frame: i32) -> SampleResult<(Self, FrameSample)> {
        let rest = evaluator.sample_at(rest_frame)?;
        debug!(
            frame = rest_frame,
            vertices = rest.vertex_count(),
            "captured rest pose"
        );
        let sampler = Self {
            evaluator,
            vertex_count: rest.vertex_count(),
        };
        Ok((sampler, rest))
    }

    /// Sample `frame`, failing if its vertex count differs from the rest pose.
    pub fn sample(&mut self, frame: i32) -> SampleResult<FrameSample> {
        let sample = self.evaluator.sample_at(frame)?;
        if sample.vertex_count() != self.vertex_count {
            return Err(SampleError::InvalidFrame {
                frame,
                expected: self.vertex_count,
                actual: sample.vertex_count(),
            });
        }
        Ok(sample)
    }

    pub fn loop_tangents(&mut self) -> SampleResult<Vec<LoopTangent>> {
        self.evaluator.loop_tangents()
    }

    pub fn restore(&mut self, frame: i32) -> SampleResult<()> {
        self.evaluator.restore(frame)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
